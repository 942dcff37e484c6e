//! Reference data abstraction
//!
//! Transcript models, the sequence accessor annotators read through, and
//! lookup of transcripts by genomic position.

pub mod context;
pub mod locator;
pub mod transcript;

pub use context::TranscriptContext;
pub use locator::{TranscriptLocator, TranscriptStore};
pub use transcript::{Exon, GenomicLocation, Intron, IntronPosition, Strand, Transcript};
