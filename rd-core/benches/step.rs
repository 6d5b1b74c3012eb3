//! Criterion benchmarks for the stencil and the full Gray-Scott step.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rd_core::{Kernel, SimConfig, Simulation, convolve};

/// Benchmark: one Laplacian convolution of the default 300x300 B field.
fn bench_convolve_300(c: &mut Criterion) {
    let sim = Simulation::new(&SimConfig {
        seed: Some(0),
        ..SimConfig::default()
    })
    .unwrap();
    let fields = sim.snapshot();
    let kernel = Kernel::laplacian();

    c.bench_function("convolve_300x300", |b| {
        b.iter(|| black_box(convolve(black_box(fields.b()), &kernel)));
    });
}

/// Benchmark: one full step (two convolutions, reaction terms, publish).
fn bench_step_300(c: &mut Criterion) {
    let sim = Simulation::new(&SimConfig {
        seed: Some(0),
        ..SimConfig::default()
    })
    .unwrap();

    c.bench_function("step_300x300", |b| {
        b.iter(|| black_box(sim.step()));
    });
}

criterion_group!(benches, bench_convolve_300, bench_step_300);
criterion_main!(benches);
