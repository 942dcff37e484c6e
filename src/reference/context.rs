//! Transcript context accessor
//!
//! Annotators read transcript sequence through this trait rather than the
//! concrete [`Transcript`] model, so callers with their own gene model
//! storage only need to expose the cDNA and CDS bounds.

use crate::reference::transcript::{Strand, Transcript};

/// Sequence-level view of one transcript
///
/// Positions are 1-based transcript (cDNA) coordinates.
pub trait TranscriptContext {
    /// Transcript accession
    fn accession(&self) -> &str;

    /// Gene symbol, or the accession when no symbol is known
    fn gene_label(&self) -> &str;

    /// Full spliced cDNA in transcript orientation, in either case
    fn cdna_sequence(&self) -> &[u8];

    /// Transcript position of `c.1`, or 0 for non-coding transcripts
    fn cds_start(&self) -> u64;

    /// CDS length including the stop codon, or 0 for non-coding transcripts
    fn cds_length(&self) -> u64;

    /// Whether the transcript is on the plus strand
    fn is_plus_strand(&self) -> bool;

    /// Whether the transcript has a CDS
    fn is_coding(&self) -> bool {
        self.cds_start() > 0 && self.cds_length() > 0
    }

    /// Transcript position of the last CDS base
    fn cds_end(&self) -> u64 {
        (self.cds_start() + self.cds_length()).saturating_sub(1)
    }

    /// Codon that contains `pos`, where `frame` is the offset of `pos`
    /// within that codon (0, 1 or 2).
    ///
    /// Returns `None` when the codon runs off either end of the cDNA.
    fn codon_at(&self, pos: u64, frame: u64) -> Option<&[u8]> {
        let start = pos.checked_sub(1 + frame)? as usize;
        self.cdna_sequence().get(start..start + 3)
    }

    /// Coding sequence from `c.1` to the end of the 3' UTR
    fn coding_sequence_plus_3utr(&self) -> &[u8] {
        if !self.is_coding() {
            return &[];
        }
        let start = (self.cds_start() - 1) as usize;
        self.cdna_sequence().get(start..).unwrap_or(&[])
    }

    /// cDNA bases `start..=end` (1-based, inclusive)
    fn cdna_slice(&self, start: u64, end: u64) -> Option<&[u8]> {
        if start == 0 || end < start {
            return None;
        }
        self.cdna_sequence()
            .get((start - 1) as usize..end as usize)
    }
}

impl TranscriptContext for Transcript {
    fn accession(&self) -> &str {
        &self.id
    }

    fn gene_label(&self) -> &str {
        Transcript::gene_label(self)
    }

    fn cdna_sequence(&self) -> &[u8] {
        self.sequence.as_bytes()
    }

    fn cds_start(&self) -> u64 {
        self.cds_start.unwrap_or(0)
    }

    fn cds_length(&self) -> u64 {
        Transcript::cds_length(self).unwrap_or(0)
    }

    fn is_plus_strand(&self) -> bool {
        self.strand == Strand::Plus
    }
}

impl<T: TranscriptContext + ?Sized> TranscriptContext for Box<T> {
    fn accession(&self) -> &str {
        (**self).accession()
    }

    fn gene_label(&self) -> &str {
        (**self).gene_label()
    }

    fn cdna_sequence(&self) -> &[u8] {
        (**self).cdna_sequence()
    }

    fn cds_start(&self) -> u64 {
        (**self).cds_start()
    }

    fn cds_length(&self) -> u64 {
        (**self).cds_length()
    }

    fn is_plus_strand(&self) -> bool {
        (**self).is_plus_strand()
    }
}
