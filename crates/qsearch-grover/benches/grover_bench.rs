//! Benchmarks for Grover circuit construction and simulation
//!
//! Run with: cargo bench -p qsearch-grover

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsearch_adapter_sim::SimulatorBackend;
use qsearch_grover::{build_oracle, grover_circuit, search};

/// Benchmark oracle and full circuit construction
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grover_build");

    for num_qubits in [2u32, 4, 8, 16] {
        let marked = (1u64 << num_qubits) / 3;

        group.bench_with_input(
            BenchmarkId::new("oracle", num_qubits),
            &num_qubits,
            |b, &n| {
                b.iter(|| build_oracle(black_box(n), black_box(marked)).unwrap());
            },
        );

        group.bench_with_input(
            BenchmarkId::new("circuit", num_qubits),
            &num_qubits,
            |b, &n| {
                let oracle = build_oracle(n, marked).unwrap();
                b.iter(|| grover_circuit(black_box(&oracle), n).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark a full search on the statevector simulator
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("grover_search");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    for num_qubits in [2u32, 6, 10] {
        group.bench_with_input(
            BenchmarkId::new("simulate_1024_shots", num_qubits),
            &num_qubits,
            |b, &n| {
                let backend = SimulatorBackend::with_seed(1);
                b.iter(|| {
                    runtime
                        .block_on(search(&backend, black_box(n), 1, 1024))
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_search);
criterion_main!(benches);
