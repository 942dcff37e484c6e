//! Protein consequence of in-frame edits.
//!
//! The wild-type and mutant residues of the affected codon window are
//! compared after trimming what they share. Both sides are cut after their
//! first stop. When the wild-type stop is lost, the mutant frame is followed
//! through the unchanged downstream sequence to its next stop.

use super::notation::residue_at;
use crate::reference::TranscriptContext;
use crate::translate::{residues_to_hgvs, translate_codon, AminoAcid};
use crate::Result;

/// Effect of an in-frame edit on the protein.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InFrameEffect {
    Synonymous,
    StopGain,
    StopLoss,
    Changed,
}

/// Compare the residues of a codon window starting at residue `first`.
///
/// `wild_type` and `mutant` are the translations of the window before and
/// after the edit. The window ends on a codon boundary of the ORF.
pub(crate) fn in_frame_change(
    ctx: &dyn TranscriptContext,
    first: u64,
    wild_type: &[AminoAcid],
    mutant: &[AminoAcid],
) -> Result<(InFrameEffect, String)> {
    let wt = through_first_stop(wild_type);
    let mut mt = through_first_stop(mutant);
    let continued: Vec<AminoAcid>;
    if wt.iter().any(AminoAcid::is_stop) && !mt.iter().any(AminoAcid::is_stop) {
        continued = continue_frame(ctx, first + wild_type.len() as u64, mt);
        mt = continued.as_slice();
    }
    let wt_stop = wt.iter().position(AminoAcid::is_stop);
    let mt_stop = mt.iter().position(AminoAcid::is_stop);

    if first == 1 && wt.first() == Some(&AminoAcid::Met) && mt.first() != Some(&AminoAcid::Met) {
        return Ok((InFrameEffect::Changed, "p.Met1?".to_string()));
    }

    match (wt_stop, mt_stop) {
        (Some(i), None) => {
            let alt = mt.get(i).or(mt.last()).map_or("", |aa| aa.hgvs_code());
            return Ok((
                InFrameEffect::StopLoss,
                format!("p.*{}{}ext*?", first + i as u64, alt),
            ));
        }
        (Some(i), Some(j)) if j > i => {
            return Ok((
                InFrameEffect::StopLoss,
                format!(
                    "p.*{}{}ext*{}",
                    first + i as u64,
                    mt[i].hgvs_code(),
                    j - i
                ),
            ));
        }
        _ => {}
    }

    let prefix = wt.iter().zip(mt).take_while(|(a, b)| a == b).count();
    let gains_stop = match (wt_stop, mt_stop) {
        (None, Some(_)) => true,
        (Some(i), Some(j)) => j < i,
        _ => false,
    };
    let suffix = if gains_stop {
        0
    } else {
        wt[prefix..]
            .iter()
            .rev()
            .zip(mt[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count()
    };

    let wt_rest = &wt[prefix..wt.len() - suffix];
    let mt_rest = &mt[prefix..mt.len() - suffix];
    let x = first + prefix as u64;

    if wt_rest.is_empty() && mt_rest.is_empty() {
        let aa = wt.first().map_or("", |aa| aa.hgvs_code());
        return Ok((InFrameEffect::Synonymous, format!("p.{}{}=", aa, first)));
    }

    if gains_stop {
        let notation = if wt_rest.is_empty() {
            insertion_between(ctx, x, mt_rest)?
        } else if mt_rest.len() == 1 {
            format!("p.{}{}*", wt_rest[0].hgvs_code(), x)
        } else {
            format!("{}delins{}", residue_span(wt_rest, x), residues_to_hgvs(mt_rest))
        };
        return Ok((InFrameEffect::StopGain, notation));
    }

    let notation = match (wt_rest.len(), mt_rest.len()) {
        (0, _) => match duplication_of(ctx, x, mt_rest)? {
            Some(dup) => dup,
            None => insertion_between(ctx, x, mt_rest)?,
        },
        (_, 0) => format!("{}del", residue_span(wt_rest, x)),
        (1, 1) => format!("p.{}{}{}", wt_rest[0].hgvs_code(), x, mt_rest[0].hgvs_code()),
        _ => format!("{}delins{}", residue_span(wt_rest, x), residues_to_hgvs(mt_rest)),
    };
    Ok((InFrameEffect::Changed, notation))
}

/// `mutant` followed by the residues of the ORF from residue `next` up to
/// and including the first stop.
///
/// Translation stops at the end of the transcript or at an unreadable codon.
fn continue_frame(
    ctx: &dyn TranscriptContext,
    next: u64,
    mutant: &[AminoAcid],
) -> Vec<AminoAcid> {
    let tail = ctx
        .coding_sequence_plus_3utr()
        .get(3 * (next - 1) as usize..)
        .unwrap_or_default();
    let mut residues = mutant.to_vec();
    for codon in tail.chunks_exact(3) {
        match translate_codon(codon) {
            Ok(aa) => {
                residues.push(aa);
                if aa.is_stop() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
    residues
}

fn through_first_stop(residues: &[AminoAcid]) -> &[AminoAcid] {
    match residues.iter().position(AminoAcid::is_stop) {
        Some(i) => &residues[..=i],
        None => residues,
    }
}

/// `p.Lys3` or `p.Lys3_Trp5` for residues starting at `x`.
fn residue_span(residues: &[AminoAcid], x: u64) -> String {
    match residues {
        [] => String::new(),
        [only] => format!("p.{}{}", only.hgvs_code(), x),
        [first, .., last] => format!(
            "p.{}{}_{}{}",
            first.hgvs_code(),
            x,
            last.hgvs_code(),
            x + residues.len() as u64 - 1
        ),
    }
}

/// `p.<A><x-1>_<B><x>ins<residues>`.
///
/// An insertion before residue 1 has no left flank and is written as a
/// `delins` of residue 1.
fn insertion_between(ctx: &dyn TranscriptContext, x: u64, inserted: &[AminoAcid]) -> Result<String> {
    let right = residue_at(ctx, x)?;
    if x < 2 {
        return Ok(format!(
            "p.{}1delins{}{}",
            right.hgvs_code(),
            residues_to_hgvs(inserted),
            right.hgvs_code()
        ));
    }
    let left = residue_at(ctx, x - 1)?;
    Ok(format!(
        "p.{}{}_{}{}ins{}",
        left.hgvs_code(),
        x - 1,
        right.hgvs_code(),
        x,
        residues_to_hgvs(inserted)
    ))
}

/// Duplication notation when `inserted` repeats the residues right before
/// residue `x`.
fn duplication_of(
    ctx: &dyn TranscriptContext,
    x: u64,
    inserted: &[AminoAcid],
) -> Result<Option<String>> {
    let n = inserted.len() as u64;
    if n == 0 || x <= n {
        return Ok(None);
    }
    let start = x - n;
    let preceding = (start..x)
        .map(|r| residue_at(ctx, r))
        .collect::<Result<Vec<_>>>()?;
    if preceding != inserted {
        return Ok(None);
    }
    Ok(Some(format!("{}dup", residue_span(&preceding, start))))
}
