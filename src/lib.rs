// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-anno: transcript-level variant annotation
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! A genomic variant is annotated against every nearby transcript. Each
//! transcript yields one candidate (an HGVS `c.`/`p.` description for
//! coding exonic edits, or a region class such as intronic or upstream),
//! and the candidates are resolved to the most informative category.
//!
//! # Example
//!
//! ```
//! use ferro_anno::{Annotator, Strand, Transcript, TranscriptStore, Variant, VariantClass};
//!
//! // 3 bp 5' UTR, a five-codon CDS and a 3 bp 3' UTR in one exon
//! let tx = Transcript::from_genomic_exons(
//!     "NM_000001.1", "chr1", Strand::Plus, "GGCATGAAATGGGCCTGACCC", &[(1001, 1021)],
//! )
//! .unwrap()
//! .with_gene("GENE1")
//! .with_cds(4, 18)
//! .unwrap();
//!
//! let annotator = Annotator::with_defaults(TranscriptStore::from_transcripts(vec![tx]).unwrap());
//!
//! // Delete the lysine codon
//! let resolution = annotator.annotate(&Variant::new("chr1", 1006, "GAAA", "G")).unwrap();
//! assert_eq!(resolution.class(), Some(VariantClass::NonFsDeletion));
//! assert_eq!(resolution.display(), "NM_000001.1:exon1:c.4_6del:p.Lys2del");
//! ```

pub mod annotation;
pub mod annotator;
pub mod config;
pub mod error;
pub mod normalize;
#[cfg(feature = "parallel")]
pub mod parallel;
pub mod reference;
pub mod translate;
pub mod variant;

// Re-export commonly used types
pub use annotation::{
    Annotation, AnnotationBucket, AnnotationCollection, Impact, Resolution, VariantClass,
};
pub use annotator::Annotator;
pub use config::AnnotatorConfig;
pub use error::{AnnotationError, ErrorCode};
pub use reference::{Strand, Transcript, TranscriptContext, TranscriptLocator, TranscriptStore};
pub use variant::{Variant, VariantShape};

/// Result type alias for ferro-anno operations
pub type Result<T> = std::result::Result<T, AnnotationError>;
