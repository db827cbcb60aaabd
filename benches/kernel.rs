// benches/kernel.rs

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wilson_correlator_sim::kernel::vector_correlator;
use wilson_correlator_sim::lattice::Lattice;

fn benchmark_kernel(c: &mut Criterion) {
    c.bench_function("vector_correlator_8x4_local", |b| {
        let lattice = Lattice::new(8, 4);
        b.iter(|| vector_correlator(black_box(&lattice), black_box(0.1), black_box(1)));
    });

    c.bench_function("vector_correlator_8x4_conserved", |b| {
        let lattice = Lattice::new(8, 4);
        b.iter(|| vector_correlator(black_box(&lattice), black_box(0.1), black_box(0)));
    });

    // One refinement step up, the unit the sweep's fifth-power cost
    // extrapolation is anchored on
    c.bench_function("vector_correlator_16x8_local", |b| {
        let lattice = Lattice::new(16, 8);
        b.iter(|| vector_correlator(black_box(&lattice), black_box(0.05), black_box(1)));
    });
}

criterion_group!(benches, benchmark_kernel);
criterion_main!(benches);
