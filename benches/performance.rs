// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for chordsmith
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Candidate generation and ranking per genre
//! - Diversity selection over growing pools
//! - Display-score bucketing
//! - Arrangement and MIDI serialization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chordsmith::arrangement::{arrange, ArrangeOptions};
use chordsmith::engine::{bucketize, generate_candidates, generate_topk, select_diverse, Candidate, Genre, TopK};
use chordsmith::music::{parse_progression, ChordSymbol};

const SEEDS: [(Genre, [&str; 3]); 3] = [
    (Genre::Jazz, ["D", "G", "C"]),
    (Genre::Pop, ["C", "G", "A"]),
    (Genre::Rock, ["E", "D", "A"]),
];

/// Synthetic pool of distinct eight-chord candidates with falling scores
fn candidate_pool(size: usize) -> Vec<Candidate> {
    let names = ["C", "Dm", "Em", "F", "G", "Am", "Bdim", "Bb"];
    (0..size)
        .map(|i| {
            let chords: Vec<ChordSymbol> = (0..8)
                .map(|pos| {
                    let idx = (i / 8usize.pow((pos % 3) as u32) + pos) % names.len();
                    ChordSymbol::parse(names[idx]).unwrap()
                })
                .collect();
            Candidate::new(chords, 1.0 - i as f64 / size as f64)
        })
        .collect()
}

/// Benchmark template expansion (key inference, rotation, realization)
fn bench_candidate_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_candidates");

    for (genre, seed) in SEEDS {
        group.bench_with_input(BenchmarkId::from_parameter(genre), &seed, |b, seed| {
            b.iter(|| generate_candidates(genre, black_box(&seed[..]), 8))
        });
    }

    group.finish();
}

/// Benchmark rule-only and blended top-k ranking
fn bench_topk(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_topk");
    let opts = TopK::default().with_k(8);
    let flat = |chords: &[ChordSymbol]| -> chordsmith::Result<f64> { Ok(chords.len() as f64 / 16.0) };

    for (genre, seed) in SEEDS {
        group.bench_with_input(BenchmarkId::new("rules", genre), &seed, |b, seed| {
            b.iter(|| generate_topk(genre, black_box(&seed[..]), &opts, None))
        });
        group.bench_with_input(BenchmarkId::new("blended", genre), &seed, |b, seed| {
            b.iter(|| generate_topk(genre, black_box(&seed[..]), &opts.with_alpha(0.5), Some(&flat)))
        });
    }

    group.finish();
}

/// Benchmark MMR selection over growing pools
fn bench_select_diverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_diverse");

    for size in [8, 64, 256] {
        let pool = candidate_pool(size);
        let already = vec![pool[0].chords.clone()];
        group.bench_with_input(BenchmarkId::from_parameter(size), &pool, |b, pool| {
            b.iter(|| select_diverse(black_box(&pool[1..]), 2, 0.55, &already, 3))
        });
    }

    group.finish();
}

fn bench_bucketize(c: &mut Criterion) {
    let ranked = candidate_pool(5);
    c.bench_function("bucketize", |b| b.iter(|| bucketize(black_box(&ranked))));
}

/// Benchmark arrangement plus serialization of a four-chord loop
fn bench_arrangement(c: &mut Criterion) {
    let progression = parse_progression(&["Dm7", "G7", "Cmaj7", "A7"]).unwrap();
    let options = ArrangeOptions::default();
    let mut group = c.benchmark_group("arrangement");

    for genre in Genre::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(genre), &progression, |b, progression| {
            b.iter(|| {
                arrange(genre, black_box(progression), &options)
                    .map(|a| a.to_midi_bytes().len())
                    .unwrap_or(0)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_candidate_generation,
    bench_topk,
    bench_select_diverse,
    bench_bucketize,
    bench_arrangement,
);

criterion_main!(benches);
