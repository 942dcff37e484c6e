//! Genomic variant representation
//!
//! A [`Variant`] is one VCF-style allele pair on the forward strand. Before
//! annotation it is [trimmed](Variant::trimmed) to its minimal form so that
//! an anchored insertion `A>AT` and a bare `->T` describe the same event.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnnotationError;
use crate::Result;

/// A variant on the forward strand of a chromosome
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    /// Chromosome name (e.g., "chr11")
    pub chrom: String,

    /// 1-based position of the first reference base. With an empty
    /// reference allele, the base right after the insertion point.
    pub pos: u64,

    /// Reference allele; `-`, `.` or empty for a pure insertion
    pub reference: String,

    /// Alternate allele; `-`, `.` or empty for a pure deletion
    pub alternate: String,
}

/// Kind of edit left after trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantShape {
    /// One base replaced by one base
    Snv,
    /// Several bases replaced by as many bases
    Mnv,
    /// Bases added, none removed
    Insertion,
    /// Bases removed, none added
    Deletion,
    /// Bases removed and a different number added
    Delins,
}

/// A variant reduced to the bases that actually change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedVariant {
    pub chrom: String,
    /// 1-based first changed reference base. For insertions this is the
    /// base right after the insertion point.
    pub start: u64,
    /// Removed bases, uppercase
    pub reference: Vec<u8>,
    /// Added bases, uppercase
    pub alternate: Vec<u8>,
    pub shape: VariantShape,
}

impl TrimmedVariant {
    /// 1-based last reference base touched by the edit.
    ///
    /// An insertion touches the bases on both sides of its insertion point,
    /// `start - 1` and `start`.
    pub fn end(&self) -> u64 {
        match self.shape {
            VariantShape::Insertion => self.start,
            _ => self.start + self.reference.len() as u64 - 1,
        }
    }

    /// 1-based first reference base touched by the edit.
    pub fn span_start(&self) -> u64 {
        match self.shape {
            VariantShape::Insertion => self.start.saturating_sub(1).max(1),
            _ => self.start,
        }
    }
}

impl Variant {
    /// Create a new variant
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        reference: impl Into<String>,
        alternate: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            reference: reference.into(),
            alternate: alternate.into(),
        }
    }

    /// Strip the shared prefix, then the shared suffix, of both alleles.
    pub fn trimmed(&self) -> Result<TrimmedVariant> {
        let mut reference = allele_bases(&self.reference);
        let mut alternate = allele_bases(&self.alternate);

        if reference == alternate {
            return Err(AnnotationError::UnsupportedVariant {
                variant_type: format!("no change at {}", self),
            });
        }
        if self.pos == 0 {
            return Err(AnnotationError::InvalidCoordinates {
                msg: format!("position 0 in {}", self),
            });
        }

        let prefix = reference
            .iter()
            .zip(&alternate)
            .take_while(|(a, b)| a == b)
            .count();
        reference.drain(..prefix);
        alternate.drain(..prefix);

        let suffix = reference
            .iter()
            .rev()
            .zip(alternate.iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
        reference.truncate(reference.len() - suffix);
        alternate.truncate(alternate.len() - suffix);

        let shape = match (reference.len(), alternate.len()) {
            (0, _) => VariantShape::Insertion,
            (_, 0) => VariantShape::Deletion,
            (1, 1) => VariantShape::Snv,
            (r, a) if r == a => VariantShape::Mnv,
            _ => VariantShape::Delins,
        };

        Ok(TrimmedVariant {
            chrom: self.chrom.clone(),
            start: self.pos + prefix as u64,
            reference,
            alternate,
            shape,
        })
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}>{}",
            self.chrom, self.pos, self.reference, self.alternate
        )
    }
}

fn allele_bases(allele: &str) -> Vec<u8> {
    match allele {
        "-" | "." => Vec::new(),
        bases => bases.as_bytes().to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, "A", "G", 100, "A", "G", VariantShape::Snv)]
    #[case(100, "AC", "GT", 100, "AC", "GT", VariantShape::Mnv)]
    #[case(100, "A", "AT", 101, "", "T", VariantShape::Insertion)]
    #[case(100, "-", "T", 100, "", "T", VariantShape::Insertion)]
    #[case(100, "GAC", "G", 101, "AC", "", VariantShape::Deletion)]
    #[case(100, "AC", ".", 100, "AC", "", VariantShape::Deletion)]
    #[case(100, "ACGT", "ATTT", 101, "CG", "TT", VariantShape::Mnv)]
    #[case(100, "ACG", "ATTTG", 101, "C", "TTT", VariantShape::Delins)]
    #[case(100, "cag", "c", 101, "AG", "", VariantShape::Deletion)]
    fn test_trimmed(
        #[case] pos: u64,
        #[case] reference: &str,
        #[case] alternate: &str,
        #[case] start: u64,
        #[case] trimmed_ref: &str,
        #[case] trimmed_alt: &str,
        #[case] shape: VariantShape,
    ) {
        let t = Variant::new("chr1", pos, reference, alternate).trimmed().unwrap();
        assert_eq!(t.start, start);
        assert_eq!(t.reference, trimmed_ref.as_bytes());
        assert_eq!(t.alternate, trimmed_alt.as_bytes());
        assert_eq!(t.shape, shape);
    }

    #[test]
    fn test_span() {
        let del = Variant::new("chr1", 100, "GAC", "G").trimmed().unwrap();
        assert_eq!((del.span_start(), del.end()), (101, 102));

        let ins = Variant::new("chr1", 100, "A", "AT").trimmed().unwrap();
        assert_eq!((ins.span_start(), ins.end()), (100, 101));
    }

    #[test]
    fn test_identical_alleles_unsupported() {
        let err = Variant::new("chr1", 5, "A", "a").trimmed().unwrap_err();
        assert!(matches!(err, AnnotationError::UnsupportedVariant { .. }));

        let err = Variant::new("chr1", 5, "-", "").trimmed().unwrap_err();
        assert!(matches!(err, AnnotationError::UnsupportedVariant { .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(Variant::new("chr11", 6021, "GA", "G").to_string(), "chr11:6021:GA>G");
    }
}
