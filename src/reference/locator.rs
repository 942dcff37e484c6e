//! Transcript lookup by genomic position
//!
//! [`TranscriptStore`] keeps transcripts per chromosome sorted by start and
//! scans them linearly. It is meant for tests and small gene sets; callers
//! with a large gene model plug in their own [`TranscriptLocator`].

use crate::error::AnnotationError;
use crate::reference::transcript::Transcript;
use crate::Result;
use std::collections::HashMap;
use std::path::Path;

/// Trait for finding transcripts near a genomic interval
pub trait TranscriptLocator {
    /// Transcripts on `chrom` whose span, widened by `padding` on both
    /// sides, overlaps `start..=end` (1-based, inclusive).
    fn transcripts_near(&self, chrom: &str, start: u64, end: u64, padding: u64) -> Vec<&Transcript>;

    /// Closest transcript on `chrom` to `start..=end` with its distance in
    /// bases, used to name intergenic variants. `None` when unsupported or
    /// the chromosome has no transcripts.
    fn nearest(&self, _chrom: &str, _start: u64, _end: u64) -> Option<(&Transcript, u64)> {
        None
    }
}

/// Bases between `start..=end` and the span of `tx` (0 when they overlap).
pub fn distance_to(tx: &Transcript, start: u64, end: u64) -> u64 {
    if end < tx.genomic_start() {
        tx.genomic_start() - end
    } else if start > tx.genomic_end() {
        start - tx.genomic_end()
    } else {
        0
    }
}

/// In-memory transcript collection keyed by chromosome
#[derive(Debug, Clone, Default)]
pub struct TranscriptStore {
    by_chrom: HashMap<String, Vec<Transcript>>,
}

impl TranscriptStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from transcripts, validating each one
    pub fn from_transcripts(transcripts: impl IntoIterator<Item = Transcript>) -> Result<Self> {
        let mut store = Self::new();
        for tx in transcripts {
            store.add_transcript(tx)?;
        }
        Ok(store)
    }

    /// Load transcripts from a JSON file holding an array of transcript models
    pub fn from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse transcripts from a JSON array
    pub fn from_json_str(content: &str) -> Result<Self> {
        let transcripts: Vec<Transcript> = serde_json::from_str(content)?;
        Self::from_transcripts(transcripts)
    }

    /// Add a transcript to the store
    ///
    /// The sequence is stored uppercase.
    pub fn add_transcript(&mut self, mut transcript: Transcript) -> Result<()> {
        transcript.validate()?;
        transcript.sequence.make_ascii_uppercase();
        if transcript.exons.is_empty() {
            return Err(AnnotationError::InconsistentInput {
                msg: format!("transcript {} has no exons", transcript.id),
            });
        }
        let list = self
            .by_chrom
            .entry(transcript.chromosome.clone())
            .or_default();
        let at = list.partition_point(|t| t.genomic_start() <= transcript.genomic_start());
        list.insert(at, transcript);
        Ok(())
    }

    /// Get a transcript by accession
    pub fn get(&self, id: &str) -> Option<&Transcript> {
        self.by_chrom.values().flatten().find(|t| t.id == id)
    }

    /// Total number of transcripts
    pub fn len(&self) -> usize {
        self.by_chrom.values().map(Vec::len).sum()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TranscriptLocator for TranscriptStore {
    fn transcripts_near(&self, chrom: &str, start: u64, end: u64, padding: u64) -> Vec<&Transcript> {
        let Some(list) = self.by_chrom.get(chrom) else {
            return Vec::new();
        };
        let window_end = end.saturating_add(padding);
        let window_start = start.saturating_sub(padding);
        list.iter()
            .take_while(|t| t.genomic_start() <= window_end)
            .filter(|t| t.genomic_end() >= window_start)
            .collect()
    }

    fn nearest(&self, chrom: &str, start: u64, end: u64) -> Option<(&Transcript, u64)> {
        self.by_chrom
            .get(chrom)?
            .iter()
            .map(|t| (t, distance_to(t, start, end)))
            .min_by_key(|&(_, d)| d)
    }
}

impl<L: TranscriptLocator + ?Sized> TranscriptLocator for Box<L> {
    fn transcripts_near(&self, chrom: &str, start: u64, end: u64, padding: u64) -> Vec<&Transcript> {
        (**self).transcripts_near(chrom, start, end, padding)
    }

    fn nearest(&self, chrom: &str, start: u64, end: u64) -> Option<(&Transcript, u64)> {
        (**self).nearest(chrom, start, end)
    }
}
