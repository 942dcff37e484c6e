//! Performance benchmarks for ferro-anno
//!
//! Run with: cargo bench
//! Run specific benchmark: cargo bench -- annotate

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ferro_anno::normalize::{shuffle_deletion, Boundaries};
use ferro_anno::{Annotator, Strand, Transcript, TranscriptStore, Variant};

/// Ten three-exon coding transcripts spaced 20 kb apart on chr1.
fn store() -> TranscriptStore {
    let cds = format!("ATG{}TAA", "GCCAAAGAC".repeat(100));
    let cdna = format!("CCCAGCCACC{}GATTACAGATTACA", cds);
    let len = cdna.len() as u64;
    let transcripts = (0..10u64).map(|i| {
        let base = 10_000 + i * 20_000;
        let e1 = (base, base + 299);
        let e2 = (base + 1_000, base + 1_299);
        let e3 = (base + 3_000, base + 3_000 + (len - 600) - 1);
        Transcript::from_genomic_exons(
            format!("NM_{:06}.1", i),
            "chr1",
            Strand::Plus,
            cdna.clone(),
            &[e1, e2, e3],
        )
        .and_then(|tx| tx.with_gene(format!("GENE{}", i)).with_cds(11, 10 + cds.len() as u64))
        .unwrap()
    });
    TranscriptStore::from_transcripts(transcripts).unwrap()
}

// =============================================================================
// Annotation benchmarks
// =============================================================================

fn bench_annotate(c: &mut Criterion) {
    let annotator = Annotator::with_defaults(store());
    // In the first transcript genomic position g is c.(g - 10_009)
    let variants = vec![
        ("missense", Variant::new("chr1", 10_013, "G", "T")),
        ("synonymous", Variant::new("chr1", 10_015, "C", "T")),
        ("frameshift", Variant::new("chr1", 10_016, "AA", "A")),
        ("in_frame_del", Variant::new("chr1", 10_015, "CAAA", "C")),
        ("insertion", Variant::new("chr1", 10_015, "C", "CGGC")),
        ("intronic", Variant::new("chr1", 10_600, "A", "G")),
        ("upstream", Variant::new("chr1", 9_500, "A", "G")),
        ("intergenic", Variant::new("chr1", 5_000_000, "A", "G")),
    ];

    let mut group = c.benchmark_group("annotate");
    for (name, variant) in &variants {
        group.bench_with_input(BenchmarkId::new("kind", name), variant, |b, v| {
            b.iter(|| annotator.annotate(black_box(v)))
        });
    }
    group.finish();
}

fn bench_collection_reuse(c: &mut Criterion) {
    let annotator = Annotator::with_defaults(store());
    // Third base of each GCC codon in exon 1
    let variants: Vec<Variant> = (0..30u64)
        .map(|i| Variant::new("chr1", 10_015 + i * 9, "C", "T"))
        .collect();

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Elements(variants.len() as u64));

    group.bench_function("fresh_collection", |b| {
        b.iter(|| {
            for v in &variants {
                let _ = annotator.annotate(black_box(v));
            }
        })
    });

    group.bench_function("reused_collection", |b| {
        let mut collection = annotator.new_collection();
        b.iter(|| {
            for v in &variants {
                let _ = annotator.annotate_into(black_box(v), &mut collection);
            }
        })
    });

    #[cfg(feature = "parallel")]
    group.bench_function("parallel", |b| {
        b.iter(|| ferro_anno::parallel::annotate_parallel(&annotator, black_box(&variants)))
    });

    group.finish();
}

// =============================================================================
// Normalization benchmarks
// =============================================================================

fn bench_shuffle(c: &mut Criterion) {
    let mut group = c.benchmark_group("shuffle");
    for repeat in [10usize, 100, 1000] {
        let seq = format!("ATG{}C", "CAG".repeat(repeat)).into_bytes();
        let bounds = Boundaries::whole(seq.len());
        group.bench_with_input(BenchmarkId::new("repeat", repeat), &seq, |b, s| {
            b.iter(|| shuffle_deletion(black_box(s), 3, 6, &bounds))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_annotate, bench_collection_reuse, bench_shuffle);
criterion_main!(benches);
