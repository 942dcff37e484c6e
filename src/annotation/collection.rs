//! Annotation collection and precedence resolution.
//!
//! Candidates are sorted into ten buckets. Resolution returns the first
//! non-empty bucket in this order:
//!
//! | Rank | Bucket | Merge on resolution |
//! |------|--------|---------------------|
//! | 1 | Exonic (incl. splicing) | none |
//! | 2 | ncRNA exonic | none |
//! | 3 | UTR5 | none |
//! | 4 | UTR3 | none |
//! | 5 | Intronic | gene labels joined into one candidate |
//! | 6 | ncRNA intronic | none |
//! | 7 | Upstream | none, unless `merge_upstream` is set |
//! | 8 | Downstream | distinct texts joined into one candidate |
//! | 9 | Intergenic | none |
//! | 10 | Error | none |

use serde::{Deserialize, Serialize};

use super::class::{AnnotationBucket, VariantClass};
use super::Annotation;
use crate::error::AnnotationError;
use crate::Result;

/// Default per-bucket capacity.
pub const DEFAULT_CAPACITY: usize = 20;

/// Final annotation set for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Bucket the annotations were taken from
    pub bucket: AnnotationBucket,
    /// Reported annotations, in insertion order
    pub annotations: Vec<Annotation>,
}

impl Resolution {
    /// First reported annotation.
    pub fn primary(&self) -> Option<&Annotation> {
        self.annotations.first()
    }

    /// Class of the first reported annotation.
    pub fn class(&self) -> Option<VariantClass> {
        self.primary().map(|a| a.class)
    }

    /// All display strings joined with `;`.
    pub fn display(&self) -> String {
        self.annotations
            .iter()
            .map(|a| a.display.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}

/// Per-variant accumulator of candidate annotations.
#[derive(Debug, Clone)]
pub struct AnnotationCollection {
    buckets: [Vec<Annotation>; AnnotationBucket::COUNT],
    count: usize,
    merge_upstream: bool,
}

impl Default for AnnotationCollection {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl AnnotationCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty collection with a per-bucket capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::with_capacity(capacity)),
            count: 0,
            merge_upstream: false,
        }
    }

    /// Merge upstream candidates on resolution the same way downstream
    /// candidates are merged.
    pub fn with_upstream_merge(mut self, merge: bool) -> Self {
        self.merge_upstream = merge;
        self
    }

    /// Drop all candidates, keeping allocations for the next variant.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.count = 0;
    }

    /// Number of candidates accepted since the last clear.
    pub fn annotation_count(&self) -> usize {
        self.count
    }

    /// Whether no candidate has been accepted.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether a bucket holds at least one candidate.
    pub fn has(&self, bucket: AnnotationBucket) -> bool {
        !self.buckets[bucket.index()].is_empty()
    }

    /// Whether any exonic, ncRNA exonic, UTR or intronic candidate is present.
    pub fn has_genic(&self) -> bool {
        AnnotationBucket::PRECEDENCE
            .iter()
            .any(|b| b.is_genic() && self.has(*b))
    }

    /// Candidates currently held in a bucket.
    pub fn bucket(&self, bucket: AnnotationBucket) -> &[Annotation] {
        &self.buckets[bucket.index()]
    }

    /// Add a candidate to the bucket its class belongs to.
    pub fn add(&mut self, annotation: Annotation) -> Result<()> {
        match annotation.bucket() {
            AnnotationBucket::Intronic | AnnotationBucket::NcRnaIntronic => {
                self.add_intronic(annotation)
            }
            AnnotationBucket::Upstream | AnnotationBucket::Downstream => {
                self.add_up_downstream(annotation)
            }
            bucket => self.push(bucket, annotation),
        }
    }

    /// Add an exonic or splicing candidate.
    pub fn add_exonic(&mut self, annotation: Annotation) -> Result<()> {
        self.push_checked(AnnotationBucket::Exonic, annotation)
    }

    /// Add an ncRNA exonic or ncRNA splicing candidate.
    pub fn add_nc_rna_exonic(&mut self, annotation: Annotation) -> Result<()> {
        self.push_checked(AnnotationBucket::NcRnaExonic, annotation)
    }

    /// Add a 5' UTR candidate.
    pub fn add_utr5(&mut self, annotation: Annotation) -> Result<()> {
        self.push_checked(AnnotationBucket::Utr5, annotation)
    }

    /// Add a 3' UTR candidate.
    pub fn add_utr3(&mut self, annotation: Annotation) -> Result<()> {
        self.push_checked(AnnotationBucket::Utr3, annotation)
    }

    /// Add an intergenic candidate.
    pub fn add_intergenic(&mut self, annotation: Annotation) -> Result<()> {
        self.push_checked(AnnotationBucket::Intergenic, annotation)
    }

    /// Add an error candidate.
    pub fn add_error(&mut self, annotation: Annotation) -> Result<()> {
        self.push_checked(AnnotationBucket::Error, annotation)
    }

    /// Add an intronic or ncRNA intronic candidate.
    ///
    /// Exact duplicates are ignored and not counted. A coding intronic
    /// candidate displaces ncRNA intronic candidates of the same gene, and an
    /// ncRNA intronic candidate is ignored when the gene already has a coding
    /// one.
    pub fn add_intronic(&mut self, annotation: Annotation) -> Result<()> {
        let bucket = match annotation.class {
            VariantClass::Intronic => AnnotationBucket::Intronic,
            VariantClass::NcRnaIntronic => AnnotationBucket::NcRnaIntronic,
            other => return Err(misrouted(other, "INTRONIC or ncRNA_INTRONIC")),
        };

        if self.buckets[bucket.index()].contains(&annotation) {
            return Ok(());
        }

        match bucket {
            AnnotationBucket::Intronic => {
                let nc = &mut self.buckets[AnnotationBucket::NcRnaIntronic.index()];
                let before = nc.len();
                nc.retain(|a| a.gene != annotation.gene);
                self.count -= before - nc.len();
            }
            _ => {
                let coding_same_gene = self.buckets[AnnotationBucket::Intronic.index()]
                    .iter()
                    .any(|a| a.gene == annotation.gene);
                if coding_same_gene {
                    return Ok(());
                }
            }
        }

        self.push(bucket, annotation)
    }

    /// Add an upstream or downstream candidate.
    ///
    /// Any other class is an [`AnnotationError::InconsistentInput`].
    pub fn add_up_downstream(&mut self, annotation: Annotation) -> Result<()> {
        match annotation.class {
            VariantClass::Upstream => self.push(AnnotationBucket::Upstream, annotation),
            VariantClass::Downstream => self.push(AnnotationBucket::Downstream, annotation),
            other => Err(misrouted(other, "UPSTREAM or DOWNSTREAM")),
        }
    }

    /// Select the highest-precedence non-empty bucket and return its
    /// candidates, merged where the bucket calls for it.
    ///
    /// The collection is drained and ready for the next variant afterwards.
    pub fn resolve(&mut self) -> Result<Resolution> {
        let Some(bucket) = AnnotationBucket::PRECEDENCE
            .iter()
            .copied()
            .find(|b| self.has(*b))
        else {
            return Err(AnnotationError::NoAnnotation {
                msg: "collection is empty".to_string(),
            });
        };

        let candidates = std::mem::take(&mut self.buckets[bucket.index()]);
        let annotations = match bucket {
            AnnotationBucket::Intronic => merge_by_display(candidates, VariantClass::Intronic),
            AnnotationBucket::Downstream => merge_by_display(candidates, VariantClass::Downstream),
            AnnotationBucket::Upstream if self.merge_upstream => {
                merge_by_display(candidates, VariantClass::Upstream)
            }
            _ => candidates,
        };

        log::debug!(
            "Resolved {} candidate(s) to {:?} ({} reported)",
            self.count,
            bucket,
            annotations.len()
        );
        self.clear();

        Ok(Resolution {
            bucket,
            annotations,
        })
    }

    fn push_checked(&mut self, expected: AnnotationBucket, annotation: Annotation) -> Result<()> {
        if annotation.bucket() != expected {
            return Err(misrouted(annotation.class, &format!("{:?}", expected)));
        }
        self.push(expected, annotation)
    }

    fn push(&mut self, bucket: AnnotationBucket, annotation: Annotation) -> Result<()> {
        self.buckets[bucket.index()].push(annotation);
        self.count += 1;
        Ok(())
    }
}

fn misrouted(class: VariantClass, expected: &str) -> AnnotationError {
    AnnotationError::InconsistentInput {
        msg: format!("expected a {} annotation but got {}", expected, class),
    }
}

/// Collapse candidates into one whose display joins the distinct display
/// texts with commas, in first-seen order.
fn merge_by_display(candidates: Vec<Annotation>, class: VariantClass) -> Vec<Annotation> {
    if candidates.len() <= 1 {
        return candidates;
    }

    let mut texts: Vec<&str> = Vec::with_capacity(candidates.len());
    let mut transcripts: Vec<&str> = Vec::with_capacity(candidates.len());
    for ann in &candidates {
        if !texts.contains(&ann.display.as_str()) {
            texts.push(&ann.display);
        }
        if !transcripts.contains(&ann.transcript.as_str()) {
            transcripts.push(&ann.transcript);
        }
    }

    let first = &candidates[0];
    let merged = Annotation::gene_level(
        transcripts.join(","),
        texts.join(","),
        class,
        first.coding.clone(),
        first.cds_position,
    );
    vec![merged]
}
