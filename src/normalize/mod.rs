//! Position normalization (3' rule)
//!
//! Ambiguous deletions, duplications and insertions inside repeats are
//! moved to the most 3' position of the transcript sequence before any
//! notation is generated.
//!
//! # Coordinate Systems
//!
//! | Context | Basis | Type/Notes |
//! |---------|-------|------------|
//! | Shuffle input/output | 0-based | Uses array indices into the cDNA |
//! | Annotator positions | 1-based | `pos - 1` converts to an index |
//!
//! Shifting is bounded by the end of the cDNA, so a deletion near the stop
//! codon may move into the 3' UTR. Callers re-derive the frame offset from
//! the shifted start.

pub mod boundary;
pub mod shuffle;

pub use boundary::Boundaries;
pub use shuffle::{shuffle_deletion, shuffle_insertion, ShuffleResult};
