//! Deletion annotation.
//!
//! The deletion is first moved to its most 3' position in the cDNA. The
//! frame offset and the codons are then read at the shifted position.
//!
//! | Case | Class | Protein notation |
//! |------|-------|------------------|
//! | 1 bp, next codon unavailable | `FS_DELETION` | none (degraded) |
//! | 1 bp at a stop, stop kept | `NON_FS_DELETION` | `p.*110=` |
//! | 1 bp at a stop, stop lost | `STOPLOSS` | `p.*110Glnext*17` |
//! | 1 bp, new stop in the codon | `STOPGAIN` | `p.Gln40*` |
//! | 1 bp otherwise | `FS_DELETION` | `p.Gly1172Glufs*34` |
//! | overlaps `c.1` or the stop codon | `FS_SUBSTITUTION` | `p.1_12del` |
//! | in-frame interior | `NON_FS_DELETION` | `p.Lys3del`, `p.Lys3_Trp5del`, `p.Lys3_Trp5delinsArg` |
//! | frame-changing interior | `FS_DELETION` | scanner result |
//! | frame-changing, starting in the stop codon | `STOPLOSS` | `p.*110Thrext*?` |

use super::class::VariantClass;
use super::frameshift::FrameshiftScanner;
use super::notation::{check_coding, check_reference, codon_containing, cds_position, cds_range, residue_at};
use super::{residue_number, Annotation};
use crate::error::AnnotationError;
use crate::normalize::{shuffle_deletion, Boundaries};
use crate::reference::TranscriptContext;
use crate::translate::{translate_codon, AminoAcid};
use crate::Result;

/// Annotate the deletion of `deleted` starting at transcript position
/// `tx_start` (1-based) in exon `exon` of a coding transcript.
pub fn annotate_deletion(
    ctx: &dyn TranscriptContext,
    exon: u32,
    tx_start: u64,
    deleted: &[u8],
    lookahead_codons: usize,
) -> Result<Annotation> {
    check_coding(ctx)?;
    check_reference(ctx, tx_start, deleted)?;

    let seq = ctx.cdna_sequence();
    let shifted = shuffle_deletion(
        seq,
        tx_start - 1,
        tx_start - 1 + deleted.len() as u64,
        &Boundaries::whole(seq.len()),
    );
    if shifted.shifted() {
        log::debug!(
            "{}: deletion at {} shifted 3' by {}",
            ctx.accession(),
            tx_start,
            shifted.shift
        );
    }
    let start = shifted.start + 1;
    let end = shifted.end;
    let len = end - start + 1;

    let coding = format!("c.{}del", cds_range(ctx, start, end));
    let position = cds_position(ctx, start);

    if end < ctx.cds_start() {
        return Ok(Annotation::exonic(ctx, exon, VariantClass::Utr5, coding, None, position));
    }
    if start > ctx.cds_end() {
        return Ok(Annotation::exonic(ctx, exon, VariantClass::Utr3, coding, None, position));
    }

    if len == 1 {
        single_base(ctx, exon, start, coding, lookahead_codons)
    } else {
        multi_base(ctx, exon, start, end, coding, lookahead_codons)
    }
}

fn single_base(
    ctx: &dyn TranscriptContext,
    exon: u32,
    start: u64,
    coding: String,
    lookahead_codons: usize,
) -> Result<Annotation> {
    let c_pos = start - ctx.cds_start() + 1;
    let residue = residue_number(c_pos);
    let position = c_pos as i64;

    let (wt, frame) = codon_containing(ctx, start)?;
    let after = match ctx.codon_at(start - frame + 3, 0) {
        Some(codon) => codon,
        None => {
            return Ok(
                Annotation::exonic(ctx, exon, VariantClass::FsDeletion, coding, None, position)
                    .degraded(),
            )
        }
    };

    let mutant = match frame {
        0 => [wt[1], wt[2], after[0]],
        1 => [wt[0], wt[2], after[0]],
        _ => [wt[0], wt[1], after[0]],
    };
    let wt_aa = translate_codon(wt)?;
    let mt_aa = translate_codon(&mutant)?;

    if wt_aa.is_stop() && mt_aa.is_stop() {
        let protein = format!("p.*{}=", residue);
        return Ok(Annotation::exonic(
            ctx,
            exon,
            VariantClass::NonFsDeletion,
            coding,
            Some(protein),
            position,
        ));
    }
    if mt_aa.is_stop() {
        let protein = format!("p.{}{}*", wt_aa.hgvs_code(), residue);
        return Ok(Annotation::exonic(
            ctx,
            exon,
            VariantClass::StopGain,
            coding,
            Some(protein),
            position,
        ));
    }

    // Frameshift, or an extension when the stop codon itself is hit
    let (class, fallback) = if wt_aa.is_stop() {
        (
            VariantClass::StopLoss,
            format!("p.*{}{}ext*?", residue, mt_aa.hgvs_code()),
        )
    } else {
        (
            VariantClass::FsDeletion,
            format!("p.{}{}fs", wt_aa.hgvs_code(), residue),
        )
    };
    let scanner = FrameshiftScanner::new(ctx, lookahead_codons);
    let protein = match scanner.scan(c_pos, 1, b"") {
        Ok(outcome) => outcome.notation(),
        Err(err) => {
            log::warn!(
                "{}: frameshift scan failed for {}: {}",
                ctx.accession(),
                coding,
                err
            );
            fallback
        }
    };

    Ok(Annotation::exonic(ctx, exon, class, coding, Some(protein), position))
}

fn multi_base(
    ctx: &dyn TranscriptContext,
    exon: u32,
    start: u64,
    end: u64,
    coding: String,
    lookahead_codons: usize,
) -> Result<Annotation> {
    let cds_start = ctx.cds_start();
    let cds_end = ctx.cds_end();
    let terminal = (ctx.cds_length() / 3).max(1);
    let position = cds_position(ctx, start);
    let len = end - start + 1;

    if start <= cds_start || end >= cds_end {
        let first = if start <= cds_start {
            1
        } else {
            residue_number(start - cds_start + 1).clamp(1, terminal)
        };
        let last = if end >= cds_end {
            terminal
        } else {
            residue_number(end - cds_start + 1).clamp(1, terminal)
        };
        let protein = format!("p.{}_{}del", first, last);
        return Ok(Annotation::exonic(
            ctx,
            exon,
            VariantClass::FsSubstitution,
            coding,
            Some(protein),
            position,
        ));
    }

    let c_start = start - cds_start + 1;
    if len % 3 == 0 {
        let (class, protein) = in_frame(ctx, start, end)?;
        return Ok(Annotation::exonic(ctx, exon, class, coding, Some(protein), position));
    }

    let scanner = FrameshiftScanner::new(ctx, lookahead_codons);
    match scanner.scan(c_start, len as usize, b"") {
        Ok(outcome) => {
            let class = if outcome.is_stop_loss() {
                VariantClass::StopLoss
            } else {
                VariantClass::FsDeletion
            };
            Ok(Annotation::exonic(ctx, exon, class, coding, Some(outcome.notation()), position))
        }
        Err(err) => {
            log::warn!(
                "{}: frameshift scan failed for {}, reporting coding change only: {}",
                ctx.accession(),
                coding,
                err
            );
            Ok(
                Annotation::exonic(ctx, exon, VariantClass::FsDeletion, coding, None, position)
                    .degraded(),
            )
        }
    }
}

/// Protein notation of an in-frame interior deletion of `start..=end`.
fn in_frame(ctx: &dyn TranscriptContext, start: u64, end: u64) -> Result<(VariantClass, String)> {
    let cds_start = ctx.cds_start();
    let first = residue_number(start - cds_start + 1);
    let last = residue_number(end - cds_start + 1);
    let (start_codon, frame) = codon_containing(ctx, start)?;
    let start_aa = translate_codon(start_codon)?;

    if first == last {
        let protein = if frame == 0 {
            format!("p.{}{}del", start_aa.hgvs_code(), first)
        } else {
            format!("p.{}del", first)
        };
        return Ok((VariantClass::NonFsDeletion, protein));
    }

    let end_aa = residue_at(ctx, last)?;
    if frame == 0 {
        return Ok((
            VariantClass::NonFsDeletion,
            format!(
                "p.{}{}_{}{}del",
                start_aa.hgvs_code(),
                first,
                end_aa.hgvs_code(),
                last
            ),
        ));
    }

    // The bases before the deletion in the first codon join the bases after
    // it in the last codon.
    let seq = ctx.cdna_sequence();
    let prefix = &seq[(start - 1 - frame) as usize..(start - 1) as usize];
    let suffix = seq
        .get(end as usize..(end + 3 - frame) as usize)
        .ok_or_else(|| {
            AnnotationError::sequence_context(ctx.accession(), "deletion runs off the transcript")
        })?;
    let hybrid: Vec<u8> = prefix.iter().chain(suffix).copied().collect();
    let hybrid_aa = translate_codon(&hybrid)?;

    if hybrid_aa.is_stop() {
        return Ok((
            VariantClass::StopGain,
            format!(
                "p.{}{}_{}{}delins*",
                start_aa.hgvs_code(),
                first,
                end_aa.hgvs_code(),
                last
            ),
        ));
    }

    let (from, to) = if hybrid_aa == start_aa {
        (first + 1, last)
    } else if hybrid_aa == end_aa {
        (first, last - 1)
    } else {
        return Ok((
            VariantClass::NonFsDeletion,
            format!(
                "p.{}{}_{}{}delins{}",
                start_aa.hgvs_code(),
                first,
                end_aa.hgvs_code(),
                last,
                hybrid_aa.hgvs_code()
            ),
        ));
    };

    Ok((VariantClass::NonFsDeletion, residue_range_del(ctx, from, to)?))
}

/// `p.<AA><n>del` or `p.<AA1><a>_<AA2><b>del` for residues `from..=to`.
fn residue_range_del(ctx: &dyn TranscriptContext, from: u64, to: u64) -> Result<String> {
    let from_aa: AminoAcid = residue_at(ctx, from)?;
    if from == to {
        return Ok(format!("p.{}{}del", from_aa.hgvs_code(), from));
    }
    let to_aa = residue_at(ctx, to)?;
    Ok(format!(
        "p.{}{}_{}{}del",
        from_aa.hgvs_code(),
        from,
        to_aa.hgvs_code(),
        to
    ))
}
