//! Shared helpers for coding and protein notation.

use crate::error::AnnotationError;
use crate::reference::TranscriptContext;
use crate::translate::{translate_codon, AminoAcid};
use crate::Result;

/// `c.` coordinate of a transcript position: `-N` in the 5' UTR, `N` in
/// the CDS, `*N` in the 3' UTR.
pub(crate) fn cds_coordinate(ctx: &dyn TranscriptContext, tx_pos: u64) -> String {
    let cds_start = ctx.cds_start();
    let cds_end = ctx.cds_end();
    if tx_pos < cds_start {
        format!("-{}", cds_start - tx_pos)
    } else if tx_pos > cds_end {
        format!("*{}", tx_pos - cds_end)
    } else {
        (tx_pos - cds_start + 1).to_string()
    }
}

/// `c.` range `a_b`, or `a` for a single base.
pub(crate) fn cds_range(ctx: &dyn TranscriptContext, start: u64, end: u64) -> String {
    if start == end {
        cds_coordinate(ctx, start)
    } else {
        format!(
            "{}_{}",
            cds_coordinate(ctx, start),
            cds_coordinate(ctx, end)
        )
    }
}

/// Signed CDS position of a transcript position (`c.-3` is -3).
pub(crate) fn cds_position(ctx: &dyn TranscriptContext, tx_pos: u64) -> i64 {
    tx_pos as i64 - ctx.cds_start() as i64 + 1
}

/// Amino acid encoded at residue `residue` (1-based) of the CDS.
pub(crate) fn residue_at(ctx: &dyn TranscriptContext, residue: u64) -> Result<AminoAcid> {
    let pos = ctx.cds_start() + 3 * (residue.saturating_sub(1));
    let codon = ctx.codon_at(pos, 0).ok_or_else(|| {
        AnnotationError::sequence_context(
            ctx.accession(),
            format!("no codon for residue {}", residue),
        )
    })?;
    translate_codon(codon)
}

/// Codon containing transcript position `tx_pos`, with the frame offset
/// of `tx_pos` inside it.
pub(crate) fn codon_containing<'a>(
    ctx: &'a dyn TranscriptContext,
    tx_pos: u64,
) -> Result<(&'a [u8], u64)> {
    let frame = (tx_pos - ctx.cds_start()) % 3;
    let codon = ctx.codon_at(tx_pos, frame).ok_or_else(|| {
        AnnotationError::sequence_context(
            ctx.accession(),
            format!("no codon at transcript position {}", tx_pos),
        )
    })?;
    Ok((codon, frame))
}

/// Fail unless the transcript has a CDS.
pub(crate) fn check_coding(ctx: &dyn TranscriptContext) -> Result<()> {
    if ctx.is_coding() {
        Ok(())
    } else {
        Err(AnnotationError::InconsistentInput {
            msg: format!("{} has no CDS", ctx.accession()),
        })
    }
}

/// Check that the cDNA holds `expected` starting at `tx_start` (1-based),
/// ignoring case.
pub(crate) fn check_reference(ctx: &dyn TranscriptContext, tx_start: u64, expected: &[u8]) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }
    let end = tx_start + expected.len() as u64 - 1;
    match ctx.cdna_slice(tx_start, end) {
        Some(actual) if actual.eq_ignore_ascii_case(expected) => Ok(()),
        Some(actual) => Err(AnnotationError::InconsistentInput {
            msg: format!(
                "reference {} does not match {} at {}:{}",
                upper(expected),
                upper(actual),
                ctx.accession(),
                tx_start
            ),
        }),
        None => Err(AnnotationError::sequence_context(
            ctx.accession(),
            format!("{}..{} is outside the transcript", tx_start, end),
        )),
    }
}

/// Uppercase copy of a nucleotide string.
pub(crate) fn upper(seq: &[u8]) -> String {
    String::from_utf8_lossy(seq).to_ascii_uppercase()
}
