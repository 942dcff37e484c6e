//! Transcript and exon models
//!
//! # Coordinate System
//!
//! All coordinates in this module are **1-based inclusive**:
//!
//! | Field | Basis | Notes |
//! |-------|-------|-------|
//! | `Exon.start`, `Exon.end` | 1-based | Transcript (cDNA) coordinates |
//! | `Exon.genomic_start`, `Exon.genomic_end` | 1-based | Genomic coordinates, `start <= end` on both strands |
//! | `Intron.genomic_start`, `Intron.genomic_end` | 1-based | First/last intronic base |
//! | `Transcript.cds_start`, `Transcript.cds_end` | 1-based | CDS boundaries in transcript space |
//!
//! Exons are stored in transcript order, so exon 1 of a minus-strand
//! transcript is the one with the highest genomic coordinates.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::AnnotationError;
use crate::Result;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Strand {
    #[serde(rename = "+")]
    #[default]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strand::Plus => write!(f, "+"),
            Strand::Minus => write!(f, "-"),
        }
    }
}

/// An exon in a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exon {
    /// Exon number (1-based, counted 5' to 3' along the transcript)
    pub number: u32,
    /// Start position in transcript coordinates (1-based, inclusive)
    pub start: u64,
    /// End position in transcript coordinates (1-based, inclusive)
    pub end: u64,
    /// Genomic start position (1-based, inclusive)
    pub genomic_start: u64,
    /// Genomic end position (1-based, inclusive)
    pub genomic_end: u64,
}

impl Exon {
    /// Get the exon length
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Check if the exon is empty (always false for valid exons)
    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Check if a genomic position falls inside this exon
    pub fn contains_genomic(&self, pos: u64) -> bool {
        pos >= self.genomic_start && pos <= self.genomic_end
    }
}

/// An intron between two exons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intron {
    /// Intron number (1-based, intron 1 is between exon 1 and exon 2)
    pub number: u32,
    /// Genomic start position (1-based, first intronic base)
    pub genomic_start: u64,
    /// Genomic end position (1-based, last intronic base)
    pub genomic_end: u64,
    /// Transcript position of last exonic base before intron (5' boundary)
    pub tx_5prime_boundary: u64,
    /// Transcript position of first exonic base after intron (3' boundary)
    pub tx_3prime_boundary: u64,
}

impl Intron {
    /// Check if a genomic position is within this intron
    pub fn contains_genomic(&self, pos: u64) -> bool {
        pos >= self.genomic_start && pos <= self.genomic_end
    }
}

/// Which exon boundary an intronic position is expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntronBoundary {
    /// After the upstream exon (`N+offset`)
    FivePrime,
    /// Before the downstream exon (`N-offset`)
    ThreePrime,
}

/// Position within an intron
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntronPosition {
    /// Intron number (1-based)
    pub intron_number: u32,
    /// Which exon boundary this position is relative to
    pub boundary: IntronBoundary,
    /// Offset from the boundary (positive for 5' boundary, negative for 3')
    pub offset: i64,
    /// Transcript position of the exon boundary
    pub tx_boundary_pos: u64,
}

impl IntronPosition {
    /// Distance in bases to the nearest exon
    pub fn distance_to_exon(&self) -> u64 {
        self.offset.unsigned_abs()
    }
}

/// Where a genomic position falls relative to a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenomicLocation {
    /// Inside an exon
    Exonic { exon: u32, tx_pos: u64 },
    /// Inside an intron
    Intronic(IntronPosition),
    /// 5' of the transcript, `distance` bases from its first base
    Upstream { distance: u64 },
    /// 3' of the transcript, `distance` bases from its last base
    Downstream { distance: u64 },
}

/// A transcript model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Transcript accession (e.g., "NM_000088.3")
    pub id: String,

    /// Gene symbol (e.g., "COL1A1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gene_symbol: Option<String>,

    /// Chromosome name
    pub chromosome: String,

    /// Strand orientation
    pub strand: Strand,

    /// cDNA sequence in transcript orientation
    pub sequence: String,

    /// CDS start position (1-based, in transcript coordinates)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cds_start: Option<u64>,

    /// CDS end position (1-based, inclusive, last base of the stop codon)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cds_end: Option<u64>,

    /// Exons in transcript order
    pub exons: Vec<Exon>,
}

impl Transcript {
    /// Build a transcript from genomic exon intervals.
    ///
    /// `genomic_exons` are 1-based inclusive `(start, end)` pairs in ascending
    /// genomic order, as gene model tables list them. Exon numbers and
    /// transcript coordinates are derived from the strand.
    pub fn from_genomic_exons(
        id: impl Into<String>,
        chromosome: impl Into<String>,
        strand: Strand,
        sequence: impl Into<String>,
        genomic_exons: &[(u64, u64)],
    ) -> Result<Self> {
        let mut ordered: Vec<(u64, u64)> = genomic_exons.to_vec();
        if strand == Strand::Minus {
            ordered.reverse();
        }

        let mut exons = Vec::with_capacity(ordered.len());
        let mut tx_pos = 1u64;
        for (i, &(g_start, g_end)) in ordered.iter().enumerate() {
            if g_end < g_start {
                return Err(AnnotationError::InvalidCoordinates {
                    msg: format!("exon {}-{} ends before it starts", g_start, g_end),
                });
            }
            let len = g_end - g_start + 1;
            exons.push(Exon {
                number: i as u32 + 1,
                start: tx_pos,
                end: tx_pos + len - 1,
                genomic_start: g_start,
                genomic_end: g_end,
            });
            tx_pos += len;
        }

        let transcript = Self {
            id: id.into(),
            gene_symbol: None,
            chromosome: chromosome.into(),
            strand,
            sequence: sequence.into(),
            cds_start: None,
            cds_end: None,
            exons,
        };
        transcript.validate()?;
        Ok(transcript)
    }

    /// Set the gene symbol
    pub fn with_gene(mut self, symbol: impl Into<String>) -> Self {
        self.gene_symbol = Some(symbol.into());
        self
    }

    /// Set the CDS in transcript coordinates (1-based, inclusive)
    pub fn with_cds(mut self, cds_start: u64, cds_end: u64) -> Result<Self> {
        if cds_start == 0 || cds_end < cds_start || cds_end > self.sequence_length() {
            return Err(AnnotationError::InvalidCoordinates {
                msg: format!(
                    "CDS {}-{} does not fit {} ({} bp)",
                    cds_start,
                    cds_end,
                    self.id,
                    self.sequence_length()
                ),
            });
        }
        self.cds_start = Some(cds_start);
        self.cds_end = Some(cds_end);
        Ok(self)
    }

    /// Set the CDS from genomic coordinates (1-based, inclusive, ascending)
    pub fn with_genomic_cds(self, genomic_start: u64, genomic_end: u64) -> Result<Self> {
        let (a, b) = match (
            self.genomic_to_tx(genomic_start),
            self.genomic_to_tx(genomic_end),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(AnnotationError::InvalidCoordinates {
                    msg: format!(
                        "CDS {}-{} is not exonic in {}",
                        genomic_start, genomic_end, self.id
                    ),
                })
            }
        };
        self.with_cds(a.min(b), a.max(b))
    }

    /// Check that exons are ordered, contiguous in transcript space and
    /// cover the sequence exactly.
    pub fn validate(&self) -> Result<()> {
        let mut expected = 1u64;
        for pair in self.exons.windows(2) {
            let ordered = match self.strand {
                Strand::Plus => pair[0].genomic_end < pair[1].genomic_start,
                Strand::Minus => pair[1].genomic_end < pair[0].genomic_start,
            };
            if !ordered {
                return Err(AnnotationError::InvalidCoordinates {
                    msg: format!(
                        "exons {} and {} of {} overlap or are out of order",
                        pair[0].number, pair[1].number, self.id
                    ),
                });
            }
        }
        for exon in &self.exons {
            if exon.start != expected
                || exon.is_empty()
                || exon.len() != exon.genomic_end + 1 - exon.genomic_start
            {
                return Err(AnnotationError::InvalidCoordinates {
                    msg: format!("exon {} of {} is malformed", exon.number, self.id),
                });
            }
            expected = exon.end + 1;
        }
        if expected - 1 != self.sequence_length() {
            return Err(AnnotationError::InconsistentInput {
                msg: format!(
                    "exons of {} cover {} bp but the sequence has {} bp",
                    self.id,
                    expected - 1,
                    self.sequence_length()
                ),
            });
        }
        Ok(())
    }

    /// Get the length of the transcript sequence
    pub fn sequence_length(&self) -> u64 {
        self.sequence.len() as u64
    }

    /// Check if this is a coding transcript
    pub fn is_coding(&self) -> bool {
        self.cds_start.is_some() && self.cds_end.is_some()
    }

    /// Get the CDS length
    pub fn cds_length(&self) -> Option<u64> {
        match (self.cds_start, self.cds_end) {
            (Some(start), Some(end)) if end >= start => Some(end - start + 1),
            _ => None,
        }
    }

    /// Gene symbol, falling back to the accession
    pub fn gene_label(&self) -> &str {
        self.gene_symbol.as_deref().unwrap_or(&self.id)
    }

    /// Lowest genomic coordinate covered by the transcript
    pub fn genomic_start(&self) -> u64 {
        self.exons
            .iter()
            .map(|e| e.genomic_start)
            .min()
            .unwrap_or(0)
    }

    /// Highest genomic coordinate covered by the transcript
    pub fn genomic_end(&self) -> u64 {
        self.exons.iter().map(|e| e.genomic_end).max().unwrap_or(0)
    }

    /// Check if a genomic position is within the transcribed span
    pub fn contains_genomic_pos(&self, pos: u64) -> bool {
        pos >= self.genomic_start() && pos <= self.genomic_end()
    }

    /// Find which exon contains a transcript position using binary search
    pub fn exon_at(&self, pos: u64) -> Option<&Exon> {
        self.exons
            .binary_search_by(|e| {
                if pos < e.start {
                    Ordering::Greater
                } else if pos > e.end {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|i| &self.exons[i])
    }

    /// Find which exon contains a genomic position
    pub fn exon_at_genomic(&self, pos: u64) -> Option<&Exon> {
        self.exons.iter().find(|e| e.contains_genomic(pos))
    }

    /// Map an exonic genomic position to its transcript position
    pub fn genomic_to_tx(&self, pos: u64) -> Option<u64> {
        let exon = self.exon_at_genomic(pos)?;
        Some(match self.strand {
            Strand::Plus => exon.start + (pos - exon.genomic_start),
            Strand::Minus => exon.start + (exon.genomic_end - pos),
        })
    }

    /// Introns between consecutive exons, in transcript order
    pub fn introns(&self) -> Vec<Intron> {
        self.exons
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (up, down) = (&pair[0], &pair[1]);
                let (genomic_start, genomic_end) = match self.strand {
                    Strand::Plus => (up.genomic_end + 1, down.genomic_start - 1),
                    Strand::Minus => (down.genomic_end + 1, up.genomic_start - 1),
                };
                Intron {
                    number: i as u32 + 1,
                    genomic_start,
                    genomic_end,
                    tx_5prime_boundary: up.end,
                    tx_3prime_boundary: down.start,
                }
            })
            .collect()
    }

    /// Find which intron contains a genomic position
    ///
    /// The offset is taken from the nearest exon boundary; ties go to the
    /// 5' boundary.
    pub fn find_intron_at_genomic(&self, pos: u64) -> Option<IntronPosition> {
        let intron = self
            .introns()
            .into_iter()
            .find(|intron| intron.contains_genomic(pos))?;

        let (from_5prime, from_3prime) = match self.strand {
            Strand::Plus => (pos - intron.genomic_start + 1, intron.genomic_end - pos + 1),
            Strand::Minus => (intron.genomic_end - pos + 1, pos - intron.genomic_start + 1),
        };

        Some(if from_5prime <= from_3prime {
            IntronPosition {
                intron_number: intron.number,
                boundary: IntronBoundary::FivePrime,
                offset: from_5prime as i64,
                tx_boundary_pos: intron.tx_5prime_boundary,
            }
        } else {
            IntronPosition {
                intron_number: intron.number,
                boundary: IntronBoundary::ThreePrime,
                offset: -(from_3prime as i64),
                tx_boundary_pos: intron.tx_3prime_boundary,
            }
        })
    }

    /// Classify a genomic position against this transcript
    pub fn locate_genomic(&self, pos: u64) -> GenomicLocation {
        let (start, end) = (self.genomic_start(), self.genomic_end());
        if pos < start {
            let distance = start - pos;
            return match self.strand {
                Strand::Plus => GenomicLocation::Upstream { distance },
                Strand::Minus => GenomicLocation::Downstream { distance },
            };
        }
        if pos > end {
            let distance = pos - end;
            return match self.strand {
                Strand::Plus => GenomicLocation::Downstream { distance },
                Strand::Minus => GenomicLocation::Upstream { distance },
            };
        }
        if let Some(exon) = self.exon_at_genomic(pos) {
            let tx_pos = match self.strand {
                Strand::Plus => exon.start + (pos - exon.genomic_start),
                Strand::Minus => exon.start + (exon.genomic_end - pos),
            };
            return GenomicLocation::Exonic {
                exon: exon.number,
                tx_pos,
            };
        }
        match self.find_intron_at_genomic(pos) {
            Some(intron) => GenomicLocation::Intronic(intron),
            // Unreachable for validated transcripts: a position inside the
            // span is either exonic or intronic.
            None => GenomicLocation::Downstream { distance: 0 },
        }
    }

    /// Format a transcript position in `c.` coordinates (`-N`, `N`, `*N`).
    ///
    /// Non-coding transcripts use plain transcript (`n.`) coordinates.
    pub fn format_position(&self, tx_pos: u64) -> String {
        match (self.cds_start, self.cds_end) {
            (Some(cds_start), Some(cds_end)) => {
                if tx_pos < cds_start {
                    format!("-{}", cds_start - tx_pos)
                } else if tx_pos > cds_end {
                    format!("*{}", tx_pos - cds_end)
                } else {
                    (tx_pos - cds_start + 1).to_string()
                }
            }
            _ => tx_pos.to_string(),
        }
    }

    /// Format an intronic position, e.g. `100+5` or `-20-3`.
    pub fn format_intronic(&self, pos: &IntronPosition) -> String {
        format!("{}{:+}", self.format_position(pos.tx_boundary_pos), pos.offset)
    }

    /// Notation prefix for this transcript (`c.` or `n.`)
    pub fn notation_prefix(&self) -> &'static str {
        if self.is_coding() {
            "c."
        } else {
            "n."
        }
    }
}
