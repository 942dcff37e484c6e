//! Insertion and duplication annotation.
//!
//! Inserted bases are moved to their most 3' position first. An insertion
//! whose bases repeat the sequence just before it is reported as a
//! duplication (`c.4_6dup`), otherwise as `c.6_7insGGC`.

use super::class::VariantClass;
use super::frameshift::FrameshiftScanner;
use super::inframe::{in_frame_change, InFrameEffect};
use super::notation::{check_coding, cds_coordinate, cds_position, cds_range, upper};
use super::Annotation;
use crate::error::AnnotationError;
use crate::normalize::{shuffle_insertion, Boundaries};
use crate::reference::TranscriptContext;
use crate::translate::translate;
use crate::Result;

/// Annotate the insertion of `inserted` right after transcript position
/// `tx_after` (1-based) in exon `exon` of a coding transcript.
pub fn annotate_insertion(
    ctx: &dyn TranscriptContext,
    exon: u32,
    tx_after: u64,
    inserted: &[u8],
    lookahead_codons: usize,
) -> Result<Annotation> {
    check_coding(ctx)?;
    if inserted.is_empty() {
        return Err(AnnotationError::InconsistentInput {
            msg: format!("empty insertion at {}:{}", ctx.accession(), tx_after),
        });
    }
    let seq = ctx.cdna_sequence();
    if tx_after > seq.len() as u64 {
        return Err(AnnotationError::sequence_context(
            ctx.accession(),
            format!("insertion after {} is outside the transcript", tx_after),
        ));
    }

    let shifted = shuffle_insertion(seq, tx_after, inserted, &Boundaries::whole(seq.len()));
    if shifted.shifted() {
        log::debug!(
            "{}: insertion after {} shifted 3' by {}",
            ctx.accession(),
            tx_after,
            shifted.shift
        );
    }
    let left = shifted.start;
    let allele = shifted.allele;
    let n = allele.len() as u64;

    let is_dup =
        left >= n && seq[(left - n) as usize..left as usize].eq_ignore_ascii_case(&allele);
    let coding = if is_dup {
        format!("c.{}dup", cds_range(ctx, left - n + 1, left))
    } else {
        format!(
            "c.{}_{}ins{}",
            cds_coordinate(ctx, left),
            cds_coordinate(ctx, left + 1),
            upper(&allele)
        )
    };
    let position = cds_position(ctx, left + 1);

    if left < ctx.cds_start() {
        return Ok(Annotation::exonic(ctx, exon, VariantClass::Utr5, coding, None, position));
    }
    if left >= ctx.cds_end() {
        return Ok(Annotation::exonic(ctx, exon, VariantClass::Utr3, coding, None, position));
    }

    // CDS bases before the insertion point
    let k = left - ctx.cds_start() + 1;
    let (class, protein) = if n % 3 == 0 {
        in_frame(ctx, k, &allele, is_dup)?
    } else {
        let scanner = FrameshiftScanner::new(ctx, lookahead_codons);
        match scanner.scan(k + 1, 0, &allele) {
            Ok(outcome) => {
                let class = if outcome.is_nonsense() {
                    VariantClass::StopGain
                } else if outcome.is_stop_loss() {
                    VariantClass::StopLoss
                } else if is_dup {
                    VariantClass::FsDuplication
                } else {
                    VariantClass::FsInsertion
                };
                (class, Some(outcome.notation()))
            }
            Err(err) => {
                log::warn!(
                    "{}: frameshift scan failed for {}: {}",
                    ctx.accession(),
                    coding,
                    err
                );
                let class = if is_dup {
                    VariantClass::FsDuplication
                } else {
                    VariantClass::FsInsertion
                };
                return Ok(Annotation::exonic(ctx, exon, class, coding, None, position).degraded());
            }
        }
    };

    Ok(Annotation::exonic(ctx, exon, class, coding, protein, position))
}

/// Class and protein notation of an in-frame insertion after CDS base `k`.
fn in_frame(
    ctx: &dyn TranscriptContext,
    k: u64,
    allele: &[u8],
    is_dup: bool,
) -> Result<(VariantClass, Option<String>)> {
    let orf = ctx.coding_sequence_plus_3utr();
    let frame = (k % 3) as usize;
    let k = k as usize;
    let window = k - frame;
    let wt_codon = orf.get(window..window + 3).ok_or_else(|| {
        AnnotationError::sequence_context(ctx.accession(), format!("no codon after c.{}", k))
    })?;

    let mut mutant = Vec::with_capacity(allele.len() + 3);
    mutant.extend_from_slice(&orf[window..k]);
    mutant.extend_from_slice(allele);
    mutant.extend_from_slice(&orf[k..window + 3]);

    let wild_type = translate(wt_codon)?;
    let mutant = translate(&mutant)?;
    let (effect, notation) = in_frame_change(ctx, (window / 3) as u64 + 1, &wild_type, &mutant)?;

    let class = match effect {
        InFrameEffect::StopGain => VariantClass::StopGain,
        InFrameEffect::StopLoss => VariantClass::StopLoss,
        InFrameEffect::Synonymous | InFrameEffect::Changed if is_dup => {
            VariantClass::NonFsDuplication
        }
        InFrameEffect::Synonymous | InFrameEffect::Changed => VariantClass::NonFsInsertion,
    };
    Ok((class, Some(notation)))
}
