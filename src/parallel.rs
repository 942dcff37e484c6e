//! Parallel annotation of many variants
//!
//! Variants are independent, so a batch is annotated on the rayon pool with
//! one [`AnnotationCollection`](crate::AnnotationCollection) per variant.
//! Enable with the `parallel` feature.
//!
//! # Example
//!
//! ```
//! # #[cfg(feature = "parallel")]
//! # fn main() {
//! use ferro_anno::parallel::annotate_parallel;
//! use ferro_anno::{Annotator, Strand, Transcript, TranscriptStore, Variant};
//!
//! let tx = Transcript::from_genomic_exons(
//!     "NM_TEST.1", "chr1", Strand::Plus, "ATGAAATGGGCCTGA", &[(101, 115)],
//! )
//! .unwrap()
//! .with_cds(1, 15)
//! .unwrap();
//! let annotator = Annotator::with_defaults(TranscriptStore::from_transcripts(vec![tx]).unwrap());
//!
//! let variants = vec![
//!     Variant::new("chr1", 104, "A", "G"),
//!     Variant::new("chr1", 109, "G", "A"),
//! ];
//! let results = annotate_parallel(&annotator, &variants);
//! assert_eq!(results.len(), 2);
//! # }
//! # #[cfg(not(feature = "parallel"))]
//! # fn main() {}
//! ```

use rayon::prelude::*;

use crate::annotation::Resolution;
use crate::annotator::Annotator;
use crate::error::AnnotationError;
use crate::reference::TranscriptLocator;
use crate::variant::Variant;
use crate::Result;

/// Annotate multiple variants in parallel
///
/// Returns one result per input variant. Order is preserved.
pub fn annotate_parallel<L: TranscriptLocator + Sync>(
    annotator: &Annotator<L>,
    variants: &[Variant],
) -> Vec<Result<Resolution>> {
    variants.par_iter().map(|v| annotator.annotate(v)).collect()
}

/// Annotate multiple variants in parallel, dropping failures
pub fn annotate_parallel_ok<L: TranscriptLocator + Sync>(
    annotator: &Annotator<L>,
    variants: &[Variant],
) -> Vec<Resolution> {
    variants
        .par_iter()
        .filter_map(|v| annotator.annotate(v).ok())
        .collect()
}

/// Annotate a batch in chunks, reusing one collection per chunk
///
/// With `num_threads > 0` the work runs on a dedicated pool of that size.
/// Results keep input order.
pub fn annotate_batch<L: TranscriptLocator + Sync>(
    annotator: &Annotator<L>,
    variants: &[Variant],
    config: &ParallelConfig,
) -> Result<(Vec<Result<Resolution>>, ParallelStats)> {
    let chunk_size = config.chunk_size.max(1);
    let run = || -> Vec<Result<Resolution>> {
        variants
            .par_chunks(chunk_size)
            .flat_map_iter(|chunk| {
                let mut collection = annotator.new_collection();
                chunk
                    .iter()
                    .map(|v| annotator.annotate_into(v, &mut collection))
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    let results = if config.num_threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .map_err(|e| AnnotationError::Config { msg: e.to_string() })?;
        pool.install(run)
    } else {
        run()
    };

    let stats = ParallelStats::from_results(&results);
    log::debug!(
        "annotated {} variant(s), {} failed",
        stats.total,
        stats.errors
    );
    Ok((results, stats))
}

/// Configuration for parallel batch processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Variants handled per task
    pub chunk_size: usize,
    /// Number of threads (0 = use rayon default)
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            num_threads: 0,
        }
    }
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chunk size for batched processing
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the number of threads
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}

/// Statistics from parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelStats {
    /// Total variants processed
    pub total: usize,
    /// Variants resolved
    pub success: usize,
    /// Variants that failed before resolution
    pub errors: usize,
}

impl ParallelStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally a batch of results
    pub fn from_results(results: &[Result<Resolution>]) -> Self {
        let success = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            success,
            errors: results.len() - success,
        }
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationBucket;
    use crate::reference::{Strand, Transcript, TranscriptStore};

    fn annotator() -> Annotator<TranscriptStore> {
        let tx = Transcript::from_genomic_exons(
            "NM_PAR.1",
            "chr1",
            Strand::Plus,
            "ATGAAATGGGCCTGA",
            &[(101, 115)],
        )
        .unwrap()
        .with_gene("PAR")
        .with_cds(1, 15)
        .unwrap();
        Annotator::with_defaults(TranscriptStore::from_transcripts(vec![tx]).unwrap())
    }

    fn variants() -> Vec<Variant> {
        vec![
            Variant::new("chr1", 104, "A", "G"),
            Variant::new("chr1", 104, "A", "A"),
            Variant::new("chr1", 50, "C", "T"),
            Variant::new("chr1", 9000, "C", "T"),
        ]
    }

    #[test]
    fn test_annotate_parallel_preserves_order() {
        let a = annotator();
        let results = annotate_parallel(&a, &variants());
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().bucket, AnnotationBucket::Exonic);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().bucket, AnnotationBucket::Upstream);
        assert_eq!(results[3].as_ref().unwrap().bucket, AnnotationBucket::Intergenic);
    }

    #[test]
    fn test_annotate_parallel_ok() {
        let a = annotator();
        assert_eq!(annotate_parallel_ok(&a, &variants()).len(), 3);
    }

    #[test]
    fn test_annotate_batch_matches_sequential() {
        let a = annotator();
        let config = ParallelConfig::new().with_chunk_size(1).with_num_threads(2);
        let (results, stats) = annotate_batch(&a, &variants(), &config).unwrap();

        let sequential: Vec<_> = variants().iter().map(|v| a.annotate(v)).collect();
        assert_eq!(results, sequential);
        assert_eq!(
            stats,
            ParallelStats {
                total: 4,
                success: 3,
                errors: 1
            }
        );
        assert!((stats.success_rate() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_config() {
        let config = ParallelConfig::new().with_chunk_size(500).with_num_threads(4);
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.num_threads, 4);
        assert_eq!(ParallelStats::new().success_rate(), 0.0);
    }
}
