//! Benchmarks for span alignment.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quarry::align::Aligner;
use quarry::Extraction;

fn synthetic_note(repeats: usize) -> String {
    "Patient underwent ORIF of the right hip. Pain managed with oxycodone. \
     Currently TTWB on the right lower extremity. Ambulates 50 feet with rolling walker. "
        .repeat(repeats)
}

fn bench_exact_alignment(c: &mut Criterion) {
    let text = synthetic_note(50);
    let aligner = Aligner::default();

    c.bench_function("align_exact_snippets", |b| {
        b.iter(|| {
            let mut extractions = vec![
                Extraction::new("surgery", "ORIF"),
                Extraction::new("medication", "oxycodone"),
                Extraction::new("equipment", "rolling walker"),
            ];
            aligner.align_chunk(black_box(&mut extractions), black_box(&text), 0);
            extractions
        })
    });
}

fn bench_fuzzy_alignment(c: &mut Criterion) {
    let text = synthetic_note(50);
    let aligner = Aligner::default();

    c.bench_function("align_fuzzy_snippets", |b| {
        b.iter(|| {
            let mut extractions = vec![
                Extraction::new("precaution", "toe-touch weight bearing on the right"),
                Extraction::new("status", "ambulates fifty feet with a rolling walker"),
            ];
            aligner.align_chunk(black_box(&mut extractions), black_box(&text), 0);
            extractions
        })
    });
}

criterion_group!(benches, bench_exact_alignment, bench_fuzzy_alignment);
criterion_main!(benches);
