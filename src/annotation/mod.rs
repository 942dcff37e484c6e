//! Candidate annotations and their resolution.
//!
//! One [`Annotation`] is produced per (variant, transcript) pair by the
//! annotators in this module. The [`AnnotationCollection`] gathers the
//! candidates of one variant and resolves the single most informative
//! bucket.
//!
//! # Example
//!
//! ```
//! use ferro_anno::annotation::{Annotation, AnnotationCollection, VariantClass};
//!
//! let mut collection = AnnotationCollection::with_capacity(4);
//! collection
//!     .add(Annotation::gene_level("NM_1.1", "GENE1", VariantClass::Downstream, "", 0))
//!     .unwrap();
//! collection
//!     .add(Annotation::gene_level("NM_2.1", "GENE2", VariantClass::Downstream, "", 0))
//!     .unwrap();
//!
//! let resolution = collection.resolve().unwrap();
//! assert_eq!(resolution.annotations[0].display, "GENE1,GENE2");
//! ```

pub mod class;
pub mod collection;
pub mod deletion;
pub mod frameshift;
mod inframe;
pub mod insertion;
mod notation;
pub mod substitution;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::AnnotationError;
use crate::reference::TranscriptContext;

pub use class::{AnnotationBucket, Impact, VariantClass};
pub use collection::{AnnotationCollection, Resolution};
pub use deletion::annotate_deletion;
pub use frameshift::{FrameshiftScanner, ScanOutcome};
pub use insertion::annotate_insertion;
pub use substitution::annotate_substitution;

/// A candidate annotation of one variant against one transcript.
///
/// Equality and hashing consider only the transcript, the class and the
/// display string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annotation {
    /// Transcript accession (empty for intergenic candidates)
    pub transcript: String,
    /// Gene symbol or label
    pub gene: String,
    /// Classification
    pub class: VariantClass,
    /// Exon number, when the variant touches an exon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exon: Option<u32>,
    /// Coding (or non-coding) notation, e.g. `c.3515_3536del`
    pub coding: String,
    /// Protein notation, e.g. `p.Gly1172Glufs*34`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    /// Protein notation was expected but could not be derived
    #[serde(default)]
    pub degraded: bool,
    /// CDS-relative position of the first affected base, used for ordering
    pub cds_position: i64,
    /// Reported text, e.g. `NM_001127179:exon3:c.3515_3536del:p.Gly1172Glufs*34`
    pub display: String,
}

impl Annotation {
    /// Candidate for an edit inside an exon of a transcript.
    pub fn exonic(
        ctx: &dyn TranscriptContext,
        exon: u32,
        class: VariantClass,
        coding: impl Into<String>,
        protein: Option<String>,
        cds_position: i64,
    ) -> Self {
        let coding = coding.into();
        let display = match &protein {
            Some(p) => format!("{}:exon{}:{}:{}", ctx.accession(), exon, coding, p),
            None => format!("{}:exon{}:{}", ctx.accession(), exon, coding),
        };
        Self {
            transcript: ctx.accession().to_string(),
            gene: ctx.gene_label().to_string(),
            class,
            exon: Some(exon),
            coding,
            protein,
            degraded: false,
            cds_position,
            display,
        }
    }

    /// Candidate reported by gene label only (intronic, upstream, downstream).
    pub fn gene_level(
        transcript: impl Into<String>,
        gene: impl Into<String>,
        class: VariantClass,
        coding: impl Into<String>,
        cds_position: i64,
    ) -> Self {
        let gene = gene.into();
        Self {
            transcript: transcript.into(),
            display: gene.clone(),
            gene,
            class,
            exon: None,
            coding: coding.into(),
            protein: None,
            degraded: false,
            cds_position,
        }
    }

    /// Candidate for an edit at an exon-intron junction, reported with its
    /// coding notation (`NM_1.1:c.100+1G>A`).
    pub fn splicing(
        transcript: impl Into<String>,
        gene: impl Into<String>,
        class: VariantClass,
        coding: impl Into<String>,
        cds_position: i64,
    ) -> Self {
        let transcript = transcript.into();
        let coding = coding.into();
        Self {
            display: format!("{}:{}", transcript, coding),
            transcript,
            gene: gene.into(),
            class,
            exon: None,
            coding,
            protein: None,
            degraded: false,
            cds_position,
        }
    }

    /// Intergenic candidate naming the nearest gene, or `NONE` when there is
    /// no transcript on the chromosome.
    pub fn intergenic(nearest: Option<(&str, u64)>) -> Self {
        let (gene, display) = match nearest {
            Some((gene, dist)) => (gene.to_string(), format!("{}(dist={})", gene, dist)),
            None => ("NONE".to_string(), "NONE(dist=NONE)".to_string()),
        };
        Self {
            transcript: String::new(),
            gene,
            class: VariantClass::Intergenic,
            exon: None,
            coding: String::new(),
            protein: None,
            degraded: false,
            cds_position: 0,
            display,
        }
    }

    /// Candidate recording that annotation against a transcript failed.
    pub fn error(transcript: &str, gene: &str, err: &AnnotationError) -> Self {
        Self {
            transcript: transcript.to_string(),
            gene: gene.to_string(),
            class: VariantClass::Error,
            exon: None,
            coding: String::new(),
            protein: None,
            degraded: false,
            cds_position: 0,
            display: format!("{}({}: {})", transcript, err.code(), err),
        }
    }

    /// Mark the protein notation as unavailable.
    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    /// Precedence bucket of this candidate.
    pub fn bucket(&self) -> AnnotationBucket {
        self.class.bucket()
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.transcript == other.transcript
            && self.class == other.class
            && self.display == other.display
    }
}

impl Eq for Annotation {}

impl Hash for Annotation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.transcript.hash(state);
        self.class.hash(state);
        self.display.hash(state);
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// 1-based amino acid position of a 1-based CDS position.
pub(crate) fn residue_number(cds_pos: u64) -> u64 {
    cds_pos.div_ceil(3)
}
