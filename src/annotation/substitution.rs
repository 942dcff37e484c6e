//! Single-nucleotide and block substitution annotation.

use super::class::VariantClass;
use super::frameshift::FrameshiftScanner;
use super::inframe::{in_frame_change, InFrameEffect};
use super::notation::{check_coding, check_reference, cds_coordinate, cds_position, cds_range, upper};
use super::{residue_number, Annotation};
use crate::error::AnnotationError;
use crate::reference::TranscriptContext;
use crate::translate::translate;
use crate::Result;

/// Annotate the replacement of `reference` at transcript position
/// `tx_start` (1-based) by `alternate` in exon `exon` of a coding transcript.
///
/// Both alleles must be non-empty. Alleles of different length are written
/// as `delins`; the frame is judged by the net length change.
pub fn annotate_substitution(
    ctx: &dyn TranscriptContext,
    exon: u32,
    tx_start: u64,
    reference: &[u8],
    alternate: &[u8],
    lookahead_codons: usize,
) -> Result<Annotation> {
    check_coding(ctx)?;
    if reference.is_empty() || alternate.is_empty() {
        return Err(AnnotationError::InconsistentInput {
            msg: format!("substitution at {}:{} needs both alleles", ctx.accession(), tx_start),
        });
    }
    check_reference(ctx, tx_start, reference)?;

    let end = tx_start + reference.len() as u64 - 1;
    let snv = reference.len() == 1 && alternate.len() == 1;
    let coding = if snv {
        format!(
            "c.{}{}>{}",
            cds_coordinate(ctx, tx_start),
            upper(reference),
            upper(alternate)
        )
    } else {
        format!("c.{}delins{}", cds_range(ctx, tx_start, end), upper(alternate))
    };
    let position = cds_position(ctx, tx_start);
    let cds_start = ctx.cds_start();
    let cds_end = ctx.cds_end();

    if end < cds_start {
        return Ok(Annotation::exonic(ctx, exon, VariantClass::Utr5, coding, None, position));
    }
    if tx_start > cds_end {
        return Ok(Annotation::exonic(ctx, exon, VariantClass::Utr3, coding, None, position));
    }

    let in_frame = (reference.len() as i64 - alternate.len() as i64) % 3 == 0;
    if tx_start < cds_start || end > cds_end {
        let class = if in_frame {
            VariantClass::NonFsSubstitution
        } else {
            VariantClass::FsSubstitution
        };
        return Ok(Annotation::exonic(ctx, exon, class, coding, Some("p.?".to_string()), position));
    }

    let c_start = tx_start - cds_start + 1;
    let c_end = end - cds_start + 1;

    if in_frame {
        let (effect, notation) = in_frame_window(ctx, c_start, c_end, alternate)?;
        let class = match effect {
            InFrameEffect::Synonymous => VariantClass::Synonymous,
            InFrameEffect::StopGain => VariantClass::StopGain,
            InFrameEffect::StopLoss => VariantClass::StopLoss,
            InFrameEffect::Changed if snv => VariantClass::Missense,
            InFrameEffect::Changed => VariantClass::NonFsSubstitution,
        };
        return Ok(Annotation::exonic(ctx, exon, class, coding, Some(notation), position));
    }

    let scanner = FrameshiftScanner::new(ctx, lookahead_codons);
    match scanner.scan(c_start, reference.len(), alternate) {
        Ok(outcome) => {
            let class = if outcome.is_nonsense() {
                VariantClass::StopGain
            } else if outcome.is_stop_loss() {
                VariantClass::StopLoss
            } else {
                VariantClass::FsSubstitution
            };
            Ok(Annotation::exonic(ctx, exon, class, coding, Some(outcome.notation()), position))
        }
        Err(err) => {
            log::warn!(
                "{}: frameshift scan failed for {}: {}",
                ctx.accession(),
                coding,
                err
            );
            Ok(
                Annotation::exonic(ctx, exon, VariantClass::FsSubstitution, coding, None, position)
                    .degraded(),
            )
        }
    }
}

/// Translate the codons covering `c_start..=c_end` before and after the
/// replacement and compare them.
fn in_frame_window(
    ctx: &dyn TranscriptContext,
    c_start: u64,
    c_end: u64,
    alternate: &[u8],
) -> Result<(InFrameEffect, String)> {
    let orf = ctx.coding_sequence_plus_3utr();
    let first = residue_number(c_start);
    let last = residue_number(c_end);
    let window_start = ((first - 1) * 3) as usize;
    let window_end = (last * 3) as usize;

    let wt_window = orf.get(window_start..window_end).ok_or_else(|| {
        AnnotationError::sequence_context(
            ctx.accession(),
            format!("codons {}..{} run off the transcript", first, last),
        )
    })?;
    let mut mutant = Vec::with_capacity(wt_window.len() + alternate.len());
    mutant.extend_from_slice(&orf[window_start..(c_start - 1) as usize]);
    mutant.extend_from_slice(alternate);
    mutant.extend_from_slice(&orf[c_end as usize..window_end]);

    let wild_type = translate(wt_window)?;
    let mutant = translate(&mutant)?;
    in_frame_change(ctx, first, &wild_type, &mutant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{Strand, Transcript};
    use rstest::rstest;

    /// `GGC` + ATG AAA TGG GCC TGA + `CCC`
    fn tx() -> Transcript {
        let seq = "GGCATGAAATGGGCCTGACCC";
        Transcript::from_genomic_exons("NM_SUB.1", "chr1", Strand::Plus, seq, &[(1, 21)])
            .unwrap()
            .with_gene("SUB")
            .with_cds(4, 18)
            .unwrap()
    }

    fn sub(c_start: u64, reference: &str, alternate: &str) -> Annotation {
        annotate_substitution(
            &tx(),
            1,
            c_start + 3,
            reference.as_bytes(),
            alternate.as_bytes(),
            30,
        )
        .unwrap()
    }

    // =========================================================================
    // Single-nucleotide variants
    // =========================================================================

    #[rstest]
    #[case(4, "A", "G", VariantClass::Missense, "c.4A>G", "p.Lys2Glu")]
    #[case(6, "A", "G", VariantClass::Synonymous, "c.6A>G", "p.Lys2=")]
    #[case(9, "G", "A", VariantClass::StopGain, "c.9G>A", "p.Trp3*")]
    #[case(13, "T", "C", VariantClass::StopLoss, "c.13T>C", "p.*5Argext*?")]
    #[case(1, "A", "G", VariantClass::Missense, "c.1A>G", "p.Met1?")]
    fn test_snv(
        #[case] c_start: u64,
        #[case] reference: &str,
        #[case] alternate: &str,
        #[case] class: VariantClass,
        #[case] coding: &str,
        #[case] protein: &str,
    ) {
        let ann = sub(c_start, reference, alternate);
        assert_eq!(ann.class, class);
        assert_eq!(ann.coding, coding);
        assert_eq!(ann.protein.as_deref(), Some(protein));
    }

    #[test]
    fn test_stop_loss_counts_to_utr_stop() {
        // TGA -> CGA, then CCC TAG in the 3' UTR
        let seq = "ATGGCCTGACCCTAG";
        let tx = Transcript::from_genomic_exons("NM_EXT.1", "chr1", Strand::Plus, seq, &[(1, 15)])
            .unwrap()
            .with_cds(1, 9)
            .unwrap();
        let ann = annotate_substitution(&tx, 1, 7, b"T", b"C", 30).unwrap();
        assert_eq!(ann.class, VariantClass::StopLoss);
        assert_eq!(ann.coding, "c.7T>C");
        assert_eq!(ann.protein.as_deref(), Some("p.*3Argext*2"));
    }

    #[test]
    fn test_snv_in_utr5() {
        let ann = annotate_substitution(&tx(), 1, 2, b"G", b"A", 30).unwrap();
        assert_eq!(ann.class, VariantClass::Utr5);
        assert_eq!(ann.coding, "c.-2G>A");
        assert_eq!(ann.display, "NM_SUB.1:exon1:c.-2G>A");
    }

    // =========================================================================
    // Block substitutions
    // =========================================================================

    #[test]
    fn test_mnv_in_frame() {
        let ann = sub(4, "AA", "GG");
        assert_eq!(ann.class, VariantClass::NonFsSubstitution);
        assert_eq!(ann.coding, "c.4_5delinsGG");
        assert_eq!(ann.protein.as_deref(), Some("p.Lys2Gly"));
    }

    #[test]
    fn test_mnv_in_frame_length_change() {
        let ann = sub(4, "AAA", "GGCTTT");
        assert_eq!(ann.class, VariantClass::NonFsSubstitution);
        assert_eq!(ann.coding, "c.4_6delinsGGCTTT");
        assert_eq!(ann.protein.as_deref(), Some("p.Lys2delinsGlyPhe"));
    }

    #[test]
    fn test_mnv_frameshift() {
        // ATG GAT GGG CCT GAC CC
        let ann = sub(4, "AA", "G");
        assert_eq!(ann.class, VariantClass::FsSubstitution);
        assert_eq!(ann.coding, "c.4_5delinsG");
        assert_eq!(ann.protein.as_deref(), Some("p.Lys2Aspfs*?"));
    }

    #[test]
    fn test_mnv_across_cds_start() {
        let ann = annotate_substitution(&tx(), 1, 3, b"CA", b"GG", 30).unwrap();
        assert_eq!(ann.class, VariantClass::NonFsSubstitution);
        assert_eq!(ann.coding, "c.-1_1delinsGG");
        assert_eq!(ann.protein.as_deref(), Some("p.?"));
    }

    #[test]
    fn test_reference_mismatch() {
        let err = annotate_substitution(&tx(), 1, 4, b"C", b"G", 30).unwrap_err();
        assert!(matches!(err, AnnotationError::InconsistentInput { .. }));
    }
}
