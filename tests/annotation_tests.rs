//! Integration tests for variant annotation and candidate resolution

use ferro_anno::translate::reverse_complement;
use ferro_anno::{
    Annotation, AnnotationBucket, AnnotationCollection, Annotator, AnnotatorConfig, Strand,
    Transcript, TranscriptStore, Variant, VariantClass,
};
use rstest::rstest;
use tempfile::TempDir;

// =============================================================================
// Fixtures
// =============================================================================

/// The 22 bases removed by NM_001127179:c.3515_3536del (MYO7A)
const MYO7A_DELETED: &str = "GAGGCGGGGACACCAGGGCCTG";

/// cDNA of a MYO7A-like model: 10 bp 5' UTR, 3900 bp CDS, 30 bp 3' UTR.
///
/// The deleted block sits at c.3512-3533 and is followed by `GAG`, so the
/// deletion slides 3' to c.3515_3536. The mutant frame reads Glu at residue
/// 1172 and stops 34 codons later.
fn myo7a_cdna() -> String {
    let mut cds = String::with_capacity(3900);
    cds.push_str("ATG");
    cds.push_str(&"GCC".repeat(1169));
    cds.push('G');
    cds.push_str(MYO7A_DELETED);
    cds.push_str("GAG");
    cds.push_str("AA");
    cds.push_str(&"GCC".repeat(32));
    cds.push_str("TAA");
    cds.push_str(&"GCC".repeat(87)[..260]);
    cds.push_str("TAA");
    assert_eq!(cds.len(), 3900);

    format!("CCCAGCCACC{}GATTACAGATTACAGATTACAGATTACAGA", cds)
}

fn myo7a_plus() -> Transcript {
    Transcript::from_genomic_exons(
        "NM_001127179",
        "chr11",
        Strand::Plus,
        myo7a_cdna(),
        &[(1001, 1500), (2001, 5000), (6001, 6440)],
    )
    .unwrap()
    .with_gene("MYO7A")
    .with_cds(11, 3910)
    .unwrap()
}

/// Same model on the reverse strand: exon 1 is 6001-6500, exon 3 is 1001-1440.
fn myo7a_minus() -> Transcript {
    Transcript::from_genomic_exons(
        "NM_001127179",
        "chr11",
        Strand::Minus,
        myo7a_cdna(),
        &[(1001, 1440), (2001, 5000), (6001, 6500)],
    )
    .unwrap()
    .with_gene("MYO7A")
    .with_cds(11, 3910)
    .unwrap()
}

/// `GGC` + ATG CTA GCC TGA + `CCC` at chr1:101-118
fn short_coding() -> Transcript {
    Transcript::from_genomic_exons(
        "NM_SHORT.1",
        "chr1",
        Strand::Plus,
        "GGCATGCTAGCCTGACCC",
        &[(101, 118)],
    )
    .unwrap()
    .with_gene("SHORT")
    .with_cds(4, 15)
    .unwrap()
}

fn annotator(transcripts: Vec<Transcript>) -> Annotator<TranscriptStore> {
    Annotator::with_defaults(TranscriptStore::from_transcripts(transcripts).unwrap())
}

fn gene_level(tx: &str, gene: &str, class: VariantClass) -> Annotation {
    Annotation::gene_level(tx, gene, class, "", 0)
}

// =============================================================================
// End-to-end annotation
// =============================================================================

#[test]
fn test_myo7a_frameshift_deletion() {
    let a = annotator(vec![myo7a_plus()]);
    // c.3511 (G) anchors the deletion at genomic 6021
    let variant = Variant::new("chr11", 6021, format!("G{}", MYO7A_DELETED), "G");
    let resolution = a.annotate(&variant).unwrap();

    assert_eq!(resolution.bucket, AnnotationBucket::Exonic);
    assert_eq!(resolution.class(), Some(VariantClass::FsDeletion));
    let primary = resolution.primary().unwrap();
    assert_eq!(primary.coding, "c.3515_3536del");
    assert_eq!(primary.protein.as_deref(), Some("p.Gly1172Glufs*34"));
    assert_eq!(
        resolution.display(),
        "NM_001127179:exon3:c.3515_3536del:p.Gly1172Glufs*34"
    );
}

#[test]
fn test_myo7a_frameshift_deletion_minus_strand() {
    let tx = myo7a_minus();
    let cdna = tx.sequence.as_bytes().to_vec();
    let a = annotator(vec![tx]);

    // Exon 3 maps tx 3501 to genomic 1440, so tx 3522-3544 is genomic 1419 down to 1397
    let forward = reverse_complement(&cdna[3521..3544]);
    let reference = String::from_utf8(forward.clone()).unwrap();
    let alternate = String::from_utf8(forward[..1].to_vec()).unwrap();
    let resolution = a
        .annotate(&Variant::new("chr11", 1397, reference, alternate))
        .unwrap();

    assert_eq!(
        resolution.display(),
        "NM_001127179:exon3:c.3515_3536del:p.Gly1172Glufs*34"
    );
}

#[test]
fn test_single_base_deletion_stop_gain() {
    // Deleting c.4 turns CTA GCC into TAG: the wild-type residue is named
    let a = annotator(vec![short_coding()]);
    let resolution = a.annotate(&Variant::new("chr1", 106, "GC", "G")).unwrap();
    assert_eq!(resolution.class(), Some(VariantClass::StopGain));
    assert_eq!(resolution.display(), "NM_SHORT.1:exon1:c.4del:p.Leu2*");
}

#[rstest]
#[case::missense(107, "C", "G", VariantClass::Missense, "NM_SHORT.1:exon1:c.4C>G:p.Leu2Val")]
#[case::synonymous(109, "A", "G", VariantClass::Synonymous, "NM_SHORT.1:exon1:c.6A>G:p.Leu2=")]
#[case::utr5(102, "G", "A", VariantClass::Utr5, "NM_SHORT.1:exon1:c.-2G>A")]
#[case::utr3(117, "C", "T", VariantClass::Utr3, "NM_SHORT.1:exon1:c.*2C>T")]
#[case::in_frame_deletion(109, "AGCC", "A", VariantClass::NonFsDeletion, "NM_SHORT.1:exon1:c.7_9del:p.Ala3del")]
#[case::upstream(60, "A", "T", VariantClass::Upstream, "SHORT")]
#[case::downstream(400, "A", "T", VariantClass::Downstream, "SHORT")]
#[case::intergenic(5000, "A", "T", VariantClass::Intergenic, "SHORT(dist=4882)")]
fn test_annotation_classes(
    #[case] pos: u64,
    #[case] reference: &str,
    #[case] alternate: &str,
    #[case] class: VariantClass,
    #[case] display: &str,
) {
    let a = annotator(vec![short_coding()]);
    let resolution = a.annotate(&Variant::new("chr1", pos, reference, alternate)).unwrap();
    assert_eq!(resolution.class(), Some(class));
    assert_eq!(resolution.display(), display);
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_exonic_candidates_win_over_intronic() {
    let tx = short_coding();
    let mut collection = AnnotationCollection::new();
    collection
        .add(gene_level("NM_OTHER.1", "OTHER", VariantClass::Intronic))
        .unwrap();
    collection
        .add(Annotation::exonic(
            &tx,
            1,
            VariantClass::Missense,
            "c.4C>G",
            Some("p.Leu2Val".to_string()),
            4,
        ))
        .unwrap();

    let resolution = collection.resolve().unwrap();
    assert_eq!(resolution.bucket, AnnotationBucket::Exonic);
    assert_eq!(resolution.annotations.len(), 1);
    assert_eq!(resolution.display(), "NM_SHORT.1:exon1:c.4C>G:p.Leu2Val");
}

#[test]
fn test_downstream_candidates_merge() {
    let mut collection = AnnotationCollection::new();
    collection
        .add(gene_level("NM_1.1", "GENE1", VariantClass::Downstream))
        .unwrap();
    collection
        .add(gene_level("NM_2.1", "GENE1", VariantClass::Downstream))
        .unwrap();
    collection
        .add(gene_level("NM_3.1", "GENE2", VariantClass::Downstream))
        .unwrap();

    let resolution = collection.resolve().unwrap();
    assert_eq!(resolution.annotations.len(), 1);
    assert_eq!(resolution.display(), "GENE1,GENE2");
}

#[test]
fn test_upstream_candidates_merge_only_when_configured() {
    let candidates = || {
        vec![
            gene_level("NM_1.1", "GENE1", VariantClass::Upstream),
            gene_level("NM_2.1", "GENE2", VariantClass::Upstream),
        ]
    };

    let mut collection = AnnotationCollection::new();
    for c in candidates() {
        collection.add(c).unwrap();
    }
    assert_eq!(collection.resolve().unwrap().annotations.len(), 2);

    let mut collection = AnnotationCollection::new().with_upstream_merge(true);
    for c in candidates() {
        collection.add(c).unwrap();
    }
    assert_eq!(collection.resolve().unwrap().display(), "GENE1,GENE2");
}

#[test]
fn test_identical_intronic_candidates_counted_once() {
    let mut collection = AnnotationCollection::new();
    collection
        .add(gene_level("NM_1.1", "GENE1", VariantClass::Intronic))
        .unwrap();
    collection
        .add(gene_level("NM_1.1", "GENE1", VariantClass::Intronic))
        .unwrap();
    assert_eq!(collection.annotation_count(), 1);
    assert_eq!(collection.bucket(AnnotationBucket::Intronic).len(), 1);
}

#[test]
fn test_empty_collection_is_an_error() {
    let mut collection = AnnotationCollection::new();
    assert!(collection.resolve().is_err());
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn test_transcripts_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transcripts.json");
    let json = serde_json::to_string_pretty(&vec![short_coding()]).unwrap();
    std::fs::write(&path, json).unwrap();

    let store = TranscriptStore::from_json(&path).unwrap();
    assert_eq!(store.len(), 1);
    let a = Annotator::with_defaults(store);
    let resolution = a.annotate(&Variant::new("chr1", 107, "C", "G")).unwrap();
    assert_eq!(resolution.display(), "NM_SHORT.1:exon1:c.4C>G:p.Leu2Val");
}

#[test]
fn test_config_file_sets_neargene() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anno.toml");
    std::fs::write(&path, "[annotator]\nneargene = 20\n").unwrap();
    let config = AnnotatorConfig::load_from_path(&path).unwrap();

    let store = TranscriptStore::from_transcripts(vec![short_coding()]).unwrap();
    let a = Annotator::new(store, config);
    let resolution = a.annotate(&Variant::new("chr1", 60, "A", "T")).unwrap();
    assert_eq!(resolution.bucket, AnnotationBucket::Intergenic);
    assert_eq!(resolution.display(), "SHORT(dist=41)");
}
