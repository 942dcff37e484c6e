//! Variant annotation against located transcripts
//!
//! [`Annotator`] turns one genomic [`Variant`] into a [`Resolution`]:
//!
//! 1. trim the alleles to the bases that change
//! 2. ask the [`TranscriptLocator`] for transcripts within `neargene`
//! 3. build one candidate per transcript (location first, then the
//!    shape-specific annotator for coding exonic edits)
//! 4. add every candidate to a fresh [`AnnotationCollection`] and resolve it
//!
//! A failure against one transcript becomes an `ERROR` candidate for that
//! transcript; the other transcripts are still annotated.
//!
//! # Example
//!
//! ```
//! use ferro_anno::{Annotator, AnnotatorConfig, Strand, Transcript, TranscriptStore, Variant};
//!
//! let tx = Transcript::from_genomic_exons(
//!     "NM_TEST.1", "chr1", Strand::Plus, "ATGAAATGGGCCTGA", &[(101, 115)],
//! )
//! .unwrap()
//! .with_gene("TEST")
//! .with_cds(1, 15)
//! .unwrap();
//!
//! let store = TranscriptStore::from_transcripts(vec![tx]).unwrap();
//! let annotator = Annotator::new(store, AnnotatorConfig::default());
//!
//! let resolution = annotator.annotate(&Variant::new("chr1", 104, "A", "G")).unwrap();
//! assert_eq!(resolution.display(), "NM_TEST.1:exon1:c.4A>G:p.Lys2Glu");
//! ```

use crate::annotation::{
    annotate_deletion, annotate_insertion, annotate_substitution, Annotation,
    AnnotationCollection, Resolution, VariantClass,
};
use crate::config::AnnotatorConfig;
use crate::reference::{GenomicLocation, Strand, Transcript, TranscriptLocator};
use crate::translate::reverse_complement;
use crate::variant::{TrimmedVariant, Variant, VariantShape};
use crate::Result;

/// Annotates variants against the transcripts of a locator
#[derive(Debug, Clone)]
pub struct Annotator<L> {
    locator: L,
    config: AnnotatorConfig,
}

impl<L: TranscriptLocator> Annotator<L> {
    /// Create an annotator
    pub fn new(locator: L, config: AnnotatorConfig) -> Self {
        Self { locator, config }
    }

    /// Create an annotator with the default configuration
    pub fn with_defaults(locator: L) -> Self {
        Self::new(locator, AnnotatorConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    /// Underlying transcript locator
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Empty collection sized and configured for this annotator
    pub fn new_collection(&self) -> AnnotationCollection {
        AnnotationCollection::with_capacity(self.config.collection_capacity)
            .with_upstream_merge(self.config.merge_upstream)
    }

    /// Annotate a variant and resolve its most informative annotation.
    pub fn annotate(&self, variant: &Variant) -> Result<Resolution> {
        let mut collection = self.new_collection();
        self.annotate_into(variant, &mut collection)
    }

    /// Annotate a variant using a caller-owned collection.
    ///
    /// The collection is cleared first and left empty after resolution, so
    /// one collection can be reused across variants.
    pub fn annotate_into(
        &self,
        variant: &Variant,
        collection: &mut AnnotationCollection,
    ) -> Result<Resolution> {
        collection.clear();
        for candidate in self.candidates(variant)? {
            collection.add(candidate)?;
        }
        collection.resolve()
    }

    /// One candidate per nearby transcript, or a single intergenic
    /// candidate when there is none.
    pub fn candidates(&self, variant: &Variant) -> Result<Vec<Annotation>> {
        let trimmed = variant.trimmed()?;
        let transcripts = self.nearby(&trimmed);
        if transcripts.is_empty() {
            return Ok(vec![self.intergenic(&trimmed)]);
        }
        Ok(transcripts
            .into_iter()
            .map(|tx| self.annotate_transcript(&trimmed, tx))
            .collect())
    }

    /// Candidate annotation of a trimmed variant against one transcript.
    ///
    /// Never fails: errors are reported as an `ERROR` candidate.
    pub fn annotate_transcript(&self, variant: &TrimmedVariant, tx: &Transcript) -> Annotation {
        log::trace!("{}:{} against {}", variant.chrom, variant.start, tx.id);
        match self.classify(variant, tx) {
            Ok(annotation) => annotation,
            Err(err) => {
                log::warn!(
                    "annotation of {}:{} against {} failed: {}",
                    variant.chrom,
                    variant.start,
                    tx.id,
                    err
                );
                Annotation::error(&tx.id, tx.gene_label(), &err)
            }
        }
    }

    fn nearby(&self, variant: &TrimmedVariant) -> Vec<&Transcript> {
        self.locator.transcripts_near(
            &variant.chrom,
            variant.span_start(),
            variant.end(),
            self.config.neargene,
        )
    }

    fn intergenic(&self, variant: &TrimmedVariant) -> Annotation {
        let nearest = self
            .locator
            .nearest(&variant.chrom, variant.span_start(), variant.end());
        Annotation::intergenic(nearest.map(|(tx, dist)| (tx.gene_label(), dist)))
    }

    fn classify(&self, variant: &TrimmedVariant, tx: &Transcript) -> Result<Annotation> {
        let (five, three) = {
            let a = tx.locate_genomic(variant.span_start());
            let b = tx.locate_genomic(variant.end());
            match tx.strand {
                Strand::Plus => (a, b),
                Strand::Minus => (b, a),
            }
        };
        let edit = TranscriptEdit::new(variant, tx.strand);

        match (&five, &three) {
            (GenomicLocation::Upstream { .. }, GenomicLocation::Upstream { distance })
            | (GenomicLocation::Downstream { distance }, GenomicLocation::Downstream { .. }) => {
                Ok(self.flanking(tx, &five, *distance))
            }
            (GenomicLocation::Upstream { .. }, _) => Ok(self.transcript_edge(tx, true)),
            (_, GenomicLocation::Downstream { .. }) => Ok(self.transcript_edge(tx, false)),
            (
                GenomicLocation::Exonic { exon: e1, tx_pos: p1 },
                GenomicLocation::Exonic { exon: e2, tx_pos: p2 },
            ) if e1 == e2 => self.exonic(tx, *e1, *p1, *p2, &edit),
            (GenomicLocation::Intronic(a), GenomicLocation::Intronic(b))
                if a.intron_number == b.intron_number =>
            {
                let near_exon = a.distance_to_exon().min(b.distance_to_exon());
                let coding = edit.describe(tx, &five, &three);
                let class = match (near_exon <= self.config.splice_window, tx.is_coding()) {
                    (true, true) => VariantClass::Splicing,
                    (true, false) => VariantClass::NcRnaSplicing,
                    (false, true) => VariantClass::Intronic,
                    (false, false) => VariantClass::NcRnaIntronic,
                };
                let position = cds_order(tx, a.tx_boundary_pos);
                match class {
                    VariantClass::Splicing | VariantClass::NcRnaSplicing => {
                        Ok(Annotation::splicing(&tx.id, tx.gene_label(), class, coding, position))
                    }
                    _ => Ok(Annotation::gene_level(&tx.id, tx.gene_label(), class, coding, position)),
                }
            }
            _ => {
                // Spans an exon-intron junction
                let class = if tx.is_coding() {
                    VariantClass::Splicing
                } else {
                    VariantClass::NcRnaSplicing
                };
                let coding = edit.describe(tx, &five, &three);
                let position = match &five {
                    GenomicLocation::Exonic { tx_pos, .. } => cds_order(tx, *tx_pos),
                    GenomicLocation::Intronic(p) => cds_order(tx, p.tx_boundary_pos),
                    _ => 0,
                };
                Ok(Annotation::splicing(&tx.id, tx.gene_label(), class, coding, position))
            }
        }
    }

    /// Up/downstream candidate, or intergenic beyond `neargene`.
    fn flanking(&self, tx: &Transcript, location: &GenomicLocation, distance: u64) -> Annotation {
        if distance > self.config.neargene {
            return Annotation::intergenic(Some((tx.gene_label(), distance)));
        }
        let class = match location {
            GenomicLocation::Upstream { .. } => VariantClass::Upstream,
            _ => VariantClass::Downstream,
        };
        Annotation::gene_level(&tx.id, tx.gene_label(), class, "", 0)
    }

    /// Edit that runs past the first or last base of the transcript.
    fn transcript_edge(&self, tx: &Transcript, five_prime: bool) -> Annotation {
        let class = match (tx.is_coding(), five_prime) {
            (false, _) => VariantClass::NcRnaExonic,
            (true, true) => VariantClass::Utr5,
            (true, false) => VariantClass::Utr3,
        };
        Annotation::gene_level(&tx.id, tx.gene_label(), class, "", 0)
    }

    fn exonic(
        &self,
        tx: &Transcript,
        exon: u32,
        p1: u64,
        p2: u64,
        edit: &TranscriptEdit,
    ) -> Result<Annotation> {
        let first = p1.min(p2);
        let last = p1.max(p2);

        if !tx.is_coding() {
            let coding = format!("n.{}{}", position_range(tx, first, last, edit.shape), edit.suffix());
            return Ok(Annotation::exonic(tx, exon, VariantClass::NcRnaExonic, coding, None, first as i64));
        }

        let lookahead = self.config.frameshift_lookahead_codons;
        match edit.shape {
            VariantShape::Deletion => annotate_deletion(tx, exon, first, &edit.reference, lookahead),
            VariantShape::Insertion => annotate_insertion(tx, exon, first, &edit.alternate, lookahead),
            VariantShape::Snv | VariantShape::Mnv | VariantShape::Delins => annotate_substitution(
                tx,
                exon,
                first,
                &edit.reference,
                &edit.alternate,
                lookahead,
            ),
        }
    }
}

#[cfg(feature = "parallel")]
impl<L: TranscriptLocator + Sync> Annotator<L> {
    /// Like [`Annotator::annotate`], building the per-transcript candidates
    /// on the rayon pool. Candidates are added to the collection in
    /// transcript order after all of them are built.
    pub fn annotate_with_parallel_transcripts(&self, variant: &Variant) -> Result<Resolution> {
        use rayon::prelude::*;

        let trimmed = variant.trimmed()?;
        let transcripts = self.nearby(&trimmed);
        let candidates: Vec<Annotation> = if transcripts.is_empty() {
            vec![self.intergenic(&trimmed)]
        } else {
            transcripts
                .par_iter()
                .map(|tx| self.annotate_transcript(&trimmed, tx))
                .collect()
        };

        let mut collection = self.new_collection();
        for candidate in candidates {
            collection.add(candidate)?;
        }
        collection.resolve()
    }
}

/// Alleles of a trimmed variant in transcript orientation
struct TranscriptEdit {
    shape: VariantShape,
    reference: Vec<u8>,
    alternate: Vec<u8>,
}

impl TranscriptEdit {
    fn new(variant: &TrimmedVariant, strand: Strand) -> Self {
        let (reference, alternate) = match strand {
            Strand::Plus => (variant.reference.clone(), variant.alternate.clone()),
            Strand::Minus => (
                reverse_complement(&variant.reference),
                reverse_complement(&variant.alternate),
            ),
        };
        Self {
            shape: variant.shape,
            reference,
            alternate,
        }
    }

    /// Edit part of the notation: `A>G`, `del`, `insT` or `delinsTT`.
    fn suffix(&self) -> String {
        let alt = String::from_utf8_lossy(&self.alternate);
        match self.shape {
            VariantShape::Snv => format!("{}>{}", String::from_utf8_lossy(&self.reference), alt),
            VariantShape::Deletion => "del".to_string(),
            VariantShape::Insertion => format!("ins{}", alt),
            VariantShape::Mnv | VariantShape::Delins => format!("delins{}", alt),
        }
    }

    /// Full notation for an edit located by its two ends, e.g. `c.100+1G>A`
    /// or `c.99_100+2del`.
    fn describe(&self, tx: &Transcript, five: &GenomicLocation, three: &GenomicLocation) -> String {
        let a = location_text(tx, five);
        let b = location_text(tx, three);
        let range = if a == b && self.shape != VariantShape::Insertion {
            a
        } else {
            format!("{}_{}", a, b)
        };
        format!("{}{}{}", tx.notation_prefix(), range, self.suffix())
    }
}

fn location_text(tx: &Transcript, location: &GenomicLocation) -> String {
    match location {
        GenomicLocation::Exonic { tx_pos, .. } => tx.format_position(*tx_pos),
        GenomicLocation::Intronic(pos) => tx.format_intronic(pos),
        GenomicLocation::Upstream { distance } => format!("-{}", distance),
        GenomicLocation::Downstream { distance } => format!("*{}", distance),
    }
}

fn position_range(tx: &Transcript, first: u64, last: u64, shape: VariantShape) -> String {
    if first == last && shape != VariantShape::Insertion {
        tx.format_position(first)
    } else {
        format!("{}_{}", tx.format_position(first), tx.format_position(last))
    }
}

/// CDS-relative ordering position of a transcript position.
fn cds_order(tx: &Transcript, tx_pos: u64) -> i64 {
    match tx.cds_start {
        Some(cds_start) => tx_pos as i64 - cds_start as i64 + 1,
        None => tx_pos as i64,
    }
}
