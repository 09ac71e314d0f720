//! Agglomeration benchmarks.
//!
//! Measures the full merge loop over synthetic condensed inputs, sweeping
//! the observation count for a representative set of linkage methods, plus
//! a chronological variant to expose the constrained candidate search.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use conclust_benches::source::{SyntheticConfig, generate};
use conclust_core::{ConclustBuilder, Linkage};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 42;

/// Observation counts to benchmark.
const OBSERVATION_COUNTS: &[usize] = &[50, 200, 500];

fn unconstrained_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("agglomerate_unconstrained");
    group.sample_size(20);

    for &observations in OBSERVATION_COUNTS {
        let input = generate(&SyntheticConfig { observations, seed: SEED });
        for method in [Linkage::Single, Linkage::Average, Linkage::WardD2] {
            let conclust = ConclustBuilder::new()
                .with_method(method)
                .build()
                .expect("builder must succeed");
            group.bench_with_input(
                BenchmarkId::new(method.as_str(), observations),
                &input,
                |b, input| b.iter(|| conclust.run(input).expect("run must succeed")),
            );
        }
    }
    group.finish();
}

fn chronological_constraint(c: &mut Criterion) {
    let mut group = c.benchmark_group("agglomerate_chronological");
    group.sample_size(20);

    for &observations in OBSERVATION_COUNTS {
        let input = generate(&SyntheticConfig { observations, seed: SEED });
        let conclust = ConclustBuilder::new()
            .with_method(Linkage::Average)
            .chronological()
            .build()
            .expect("builder must succeed");
        group.bench_with_input(
            BenchmarkId::from_parameter(observations),
            &input,
            |b, input| b.iter(|| conclust.run(input).expect("run must succeed")),
        );
    }
    group.finish();
}

criterion_group!(benches, unconstrained_methods, chronological_constraint);
criterion_main!(benches);
