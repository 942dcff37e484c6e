//! Variant classification and precedence buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AnnotationError;

/// Classification of a variant's effect on one transcript.
///
/// Serialized with the canonical upper-case names (`FS_DELETION`,
/// `ncRNA_EXONIC`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantClass {
    /// In-frame deletion of whole residues.
    #[serde(rename = "NON_FS_DELETION")]
    NonFsDeletion,
    /// Deletion shifting the reading frame.
    #[serde(rename = "FS_DELETION")]
    FsDeletion,
    /// In-frame insertion.
    #[serde(rename = "NON_FS_INSERTION")]
    NonFsInsertion,
    /// Insertion shifting the reading frame.
    #[serde(rename = "FS_INSERTION")]
    FsInsertion,
    /// In-frame duplication.
    #[serde(rename = "NON_FS_DUPLICATION")]
    NonFsDuplication,
    /// Duplication shifting the reading frame.
    #[serde(rename = "FS_DUPLICATION")]
    FsDuplication,
    /// In-frame block substitution.
    #[serde(rename = "NON_FS_SUBSTITUTION")]
    NonFsSubstitution,
    /// Block substitution shifting the frame, or an edit crossing the CDS ends.
    #[serde(rename = "FS_SUBSTITUTION")]
    FsSubstitution,
    /// Single amino acid change.
    #[serde(rename = "MISSENSE")]
    Missense,
    /// Codon change without amino acid change.
    #[serde(rename = "SYNONYMOUS")]
    Synonymous,
    /// Premature stop codon introduced.
    #[serde(rename = "STOPGAIN")]
    StopGain,
    /// Stop codon lost.
    #[serde(rename = "STOPLOSS")]
    StopLoss,
    /// Within the splice window of a coding transcript's exon boundary.
    #[serde(rename = "SPLICING")]
    Splicing,
    /// Exonic in a non-coding transcript.
    #[serde(rename = "ncRNA_EXONIC")]
    NcRnaExonic,
    /// Within the splice window of a non-coding transcript's exon boundary.
    #[serde(rename = "ncRNA_SPLICING")]
    NcRnaSplicing,
    /// 5' untranslated region.
    #[serde(rename = "UTR5")]
    Utr5,
    /// 3' untranslated region.
    #[serde(rename = "UTR3")]
    Utr3,
    /// Intron of a coding transcript.
    #[serde(rename = "INTRONIC")]
    Intronic,
    /// Intron of a non-coding transcript.
    #[serde(rename = "ncRNA_INTRONIC")]
    NcRnaIntronic,
    /// Within the near-gene window 5' of a transcript.
    #[serde(rename = "UPSTREAM")]
    Upstream,
    /// Within the near-gene window 3' of a transcript.
    #[serde(rename = "DOWNSTREAM")]
    Downstream,
    /// Not near any transcript.
    #[serde(rename = "INTERGENIC")]
    Intergenic,
    /// Annotation failed for this transcript.
    #[serde(rename = "ERROR")]
    Error,
}

impl VariantClass {
    /// All classes, exonic subtypes first.
    pub const ALL: [VariantClass; 23] = [
        VariantClass::NonFsDeletion,
        VariantClass::FsDeletion,
        VariantClass::NonFsInsertion,
        VariantClass::FsInsertion,
        VariantClass::NonFsDuplication,
        VariantClass::FsDuplication,
        VariantClass::NonFsSubstitution,
        VariantClass::FsSubstitution,
        VariantClass::Missense,
        VariantClass::Synonymous,
        VariantClass::StopGain,
        VariantClass::StopLoss,
        VariantClass::Splicing,
        VariantClass::NcRnaExonic,
        VariantClass::NcRnaSplicing,
        VariantClass::Utr5,
        VariantClass::Utr3,
        VariantClass::Intronic,
        VariantClass::NcRnaIntronic,
        VariantClass::Upstream,
        VariantClass::Downstream,
        VariantClass::Intergenic,
        VariantClass::Error,
    ];

    /// Canonical name, as used in annotation output.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantClass::NonFsDeletion => "NON_FS_DELETION",
            VariantClass::FsDeletion => "FS_DELETION",
            VariantClass::NonFsInsertion => "NON_FS_INSERTION",
            VariantClass::FsInsertion => "FS_INSERTION",
            VariantClass::NonFsDuplication => "NON_FS_DUPLICATION",
            VariantClass::FsDuplication => "FS_DUPLICATION",
            VariantClass::NonFsSubstitution => "NON_FS_SUBSTITUTION",
            VariantClass::FsSubstitution => "FS_SUBSTITUTION",
            VariantClass::Missense => "MISSENSE",
            VariantClass::Synonymous => "SYNONYMOUS",
            VariantClass::StopGain => "STOPGAIN",
            VariantClass::StopLoss => "STOPLOSS",
            VariantClass::Splicing => "SPLICING",
            VariantClass::NcRnaExonic => "ncRNA_EXONIC",
            VariantClass::NcRnaSplicing => "ncRNA_SPLICING",
            VariantClass::Utr5 => "UTR5",
            VariantClass::Utr3 => "UTR3",
            VariantClass::Intronic => "INTRONIC",
            VariantClass::NcRnaIntronic => "ncRNA_INTRONIC",
            VariantClass::Upstream => "UPSTREAM",
            VariantClass::Downstream => "DOWNSTREAM",
            VariantClass::Intergenic => "INTERGENIC",
            VariantClass::Error => "ERROR",
        }
    }

    /// Precedence bucket this class is collected in.
    pub fn bucket(&self) -> AnnotationBucket {
        match self {
            VariantClass::NonFsDeletion
            | VariantClass::FsDeletion
            | VariantClass::NonFsInsertion
            | VariantClass::FsInsertion
            | VariantClass::NonFsDuplication
            | VariantClass::FsDuplication
            | VariantClass::NonFsSubstitution
            | VariantClass::FsSubstitution
            | VariantClass::Missense
            | VariantClass::Synonymous
            | VariantClass::StopGain
            | VariantClass::StopLoss
            | VariantClass::Splicing => AnnotationBucket::Exonic,
            VariantClass::NcRnaExonic | VariantClass::NcRnaSplicing => AnnotationBucket::NcRnaExonic,
            VariantClass::Utr5 => AnnotationBucket::Utr5,
            VariantClass::Utr3 => AnnotationBucket::Utr3,
            VariantClass::Intronic => AnnotationBucket::Intronic,
            VariantClass::NcRnaIntronic => AnnotationBucket::NcRnaIntronic,
            VariantClass::Upstream => AnnotationBucket::Upstream,
            VariantClass::Downstream => AnnotationBucket::Downstream,
            VariantClass::Intergenic => AnnotationBucket::Intergenic,
            VariantClass::Error => AnnotationBucket::Error,
        }
    }

    /// Whether the class changes the reading frame.
    pub fn is_frameshift(&self) -> bool {
        matches!(
            self,
            VariantClass::FsDeletion
                | VariantClass::FsInsertion
                | VariantClass::FsDuplication
                | VariantClass::FsSubstitution
        )
    }

    /// Get the Sequence Ontology term.
    pub fn so_term(&self) -> &'static str {
        match self {
            VariantClass::NonFsDeletion => "inframe_deletion",
            VariantClass::NonFsInsertion | VariantClass::NonFsDuplication => "inframe_insertion",
            VariantClass::FsDeletion
            | VariantClass::FsInsertion
            | VariantClass::FsDuplication
            | VariantClass::FsSubstitution => "frameshift_variant",
            VariantClass::NonFsSubstitution => "protein_altering_variant",
            VariantClass::Missense => "missense_variant",
            VariantClass::Synonymous => "synonymous_variant",
            VariantClass::StopGain => "stop_gained",
            VariantClass::StopLoss => "stop_lost",
            VariantClass::Splicing | VariantClass::NcRnaSplicing => "splice_site_variant",
            VariantClass::NcRnaExonic => "non_coding_transcript_exon_variant",
            VariantClass::Utr5 => "5_prime_UTR_variant",
            VariantClass::Utr3 => "3_prime_UTR_variant",
            VariantClass::Intronic | VariantClass::NcRnaIntronic => "intron_variant",
            VariantClass::Upstream => "upstream_gene_variant",
            VariantClass::Downstream => "downstream_gene_variant",
            VariantClass::Intergenic => "intergenic_variant",
            VariantClass::Error => "sequence_variant",
        }
    }

    /// Get the Sequence Ontology ID.
    pub fn so_id(&self) -> &'static str {
        match self {
            VariantClass::NonFsDeletion => "SO:0001822",
            VariantClass::NonFsInsertion | VariantClass::NonFsDuplication => "SO:0001821",
            VariantClass::FsDeletion
            | VariantClass::FsInsertion
            | VariantClass::FsDuplication
            | VariantClass::FsSubstitution => "SO:0001589",
            VariantClass::NonFsSubstitution => "SO:0001818",
            VariantClass::Missense => "SO:0001583",
            VariantClass::Synonymous => "SO:0001819",
            VariantClass::StopGain => "SO:0001587",
            VariantClass::StopLoss => "SO:0001578",
            VariantClass::Splicing | VariantClass::NcRnaSplicing => "SO:0001629",
            VariantClass::NcRnaExonic => "SO:0001792",
            VariantClass::Utr5 => "SO:0001623",
            VariantClass::Utr3 => "SO:0001624",
            VariantClass::Intronic | VariantClass::NcRnaIntronic => "SO:0001627",
            VariantClass::Upstream => "SO:0001631",
            VariantClass::Downstream => "SO:0001632",
            VariantClass::Intergenic => "SO:0001628",
            VariantClass::Error => "SO:0001060",
        }
    }

    /// Get the impact level.
    pub fn impact(&self) -> Impact {
        match self {
            VariantClass::FsDeletion
            | VariantClass::FsInsertion
            | VariantClass::FsDuplication
            | VariantClass::FsSubstitution
            | VariantClass::StopGain
            | VariantClass::StopLoss
            | VariantClass::Splicing
            | VariantClass::NcRnaSplicing => Impact::High,

            VariantClass::NonFsDeletion
            | VariantClass::NonFsInsertion
            | VariantClass::NonFsDuplication
            | VariantClass::NonFsSubstitution
            | VariantClass::Missense => Impact::Moderate,

            VariantClass::Synonymous => Impact::Low,

            VariantClass::NcRnaExonic
            | VariantClass::Utr5
            | VariantClass::Utr3
            | VariantClass::Intronic
            | VariantClass::NcRnaIntronic
            | VariantClass::Upstream
            | VariantClass::Downstream
            | VariantClass::Intergenic
            | VariantClass::Error => Impact::Modifier,
        }
    }
}

impl fmt::Display for VariantClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariantClass {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantClass::ALL
            .iter()
            .copied()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| AnnotationError::UnsupportedVariant {
                variant_type: s.to_string(),
            })
    }
}

/// Precedence buckets, highest priority first.
///
/// The derived ordering follows the precedence: `Exonic < NcRnaExonic < ...`
/// means "Exonic wins".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum AnnotationBucket {
    Exonic,
    NcRnaExonic,
    Utr5,
    Utr3,
    Intronic,
    NcRnaIntronic,
    Upstream,
    Downstream,
    Intergenic,
    Error,
}

impl AnnotationBucket {
    /// Number of buckets
    pub const COUNT: usize = 10;

    /// All buckets in precedence order.
    pub const PRECEDENCE: [AnnotationBucket; Self::COUNT] = [
        AnnotationBucket::Exonic,
        AnnotationBucket::NcRnaExonic,
        AnnotationBucket::Utr5,
        AnnotationBucket::Utr3,
        AnnotationBucket::Intronic,
        AnnotationBucket::NcRnaIntronic,
        AnnotationBucket::Upstream,
        AnnotationBucket::Downstream,
        AnnotationBucket::Intergenic,
        AnnotationBucket::Error,
    ];

    /// Position in the precedence order (0 = highest).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether candidates in this bucket count as a genic impact.
    pub fn is_genic(&self) -> bool {
        matches!(
            self,
            AnnotationBucket::Exonic
                | AnnotationBucket::NcRnaExonic
                | AnnotationBucket::Utr5
                | AnnotationBucket::Utr3
                | AnnotationBucket::Intronic
        )
    }
}

/// Variant impact level (VEP-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Modifier - minimal predicted impact.
    Modifier,
    /// Low impact.
    Low,
    /// Moderate impact.
    Moderate,
    /// High impact (likely deleterious).
    High,
}

impl Impact {
    /// Get the impact as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exonic_subtypes_share_bucket() {
        for class in [
            VariantClass::NonFsDeletion,
            VariantClass::FsDeletion,
            VariantClass::FsSubstitution,
            VariantClass::StopGain,
            VariantClass::StopLoss,
            VariantClass::Splicing,
        ] {
            assert_eq!(class.bucket(), AnnotationBucket::Exonic);
        }
        assert_eq!(
            VariantClass::NcRnaSplicing.bucket(),
            AnnotationBucket::NcRnaExonic
        );
    }

    #[test]
    fn test_every_bucket_reachable() {
        for bucket in AnnotationBucket::PRECEDENCE {
            assert!(VariantClass::ALL.iter().any(|c| c.bucket() == bucket));
        }
    }

    #[test]
    fn test_precedence_order() {
        assert_eq!(AnnotationBucket::PRECEDENCE[0], AnnotationBucket::Exonic);
        assert_eq!(AnnotationBucket::PRECEDENCE[9], AnnotationBucket::Error);
        assert!(AnnotationBucket::Utr5 < AnnotationBucket::Utr3);
        assert!(AnnotationBucket::Upstream < AnnotationBucket::Downstream);
        for (i, bucket) in AnnotationBucket::PRECEDENCE.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
    }

    #[test]
    fn test_genic_buckets() {
        assert!(AnnotationBucket::Intronic.is_genic());
        assert!(!AnnotationBucket::NcRnaIntronic.is_genic());
        assert!(!AnnotationBucket::Upstream.is_genic());
    }

    #[test]
    fn test_name_roundtrip() {
        for class in VariantClass::ALL {
            assert_eq!(class.as_str().parse::<VariantClass>().unwrap(), class);
            let json = serde_json::to_string(&class).unwrap();
            assert_eq!(json, format!("\"{}\"", class.as_str()));
        }
        assert!("EXONIC".parse::<VariantClass>().is_err());
    }

    #[test]
    fn test_impact() {
        assert_eq!(VariantClass::FsDeletion.impact(), Impact::High);
        assert_eq!(VariantClass::NonFsDeletion.impact(), Impact::Moderate);
        assert_eq!(VariantClass::Synonymous.impact(), Impact::Low);
        assert_eq!(VariantClass::Intronic.impact(), Impact::Modifier);
        assert!(Impact::High > Impact::Moderate);
        assert_eq!(VariantClass::StopGain.so_term(), "stop_gained");
        assert_eq!(VariantClass::StopGain.so_id(), "SO:0001587");
    }
}
