//! Simulator throughput.
//!
//! Run with: cargo bench -p agriq-adapter-sim

use agriq_adapter_sim::SimulatorBackend;
use agriq_hal::Backend;
use agriq_ir::{Circuit, QubitId};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn ladder(n: u32) -> Circuit {
    let mut circuit = Circuit::with_size("ladder", n, 0);
    for i in 0..n {
        circuit.ry(0.1 * f64::from(i + 1), QubitId(i)).unwrap();
    }
    for i in 0..n.saturating_sub(1) {
        circuit.cx(QubitId(i), QubitId(i + 1)).unwrap();
    }
    circuit.measure_all().unwrap();
    circuit
}

fn bench_shots(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let backend = SimulatorBackend::new().with_seed(0);
    let circuit = ladder(2);

    let mut group = c.benchmark_group("shots");
    for shots in [100u32, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(shots), &shots, |b, &shots| {
            b.iter(|| rt.block_on(backend.run(black_box(&circuit), shots)).unwrap());
        });
    }
    group.finish();
}

fn bench_width(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let backend = SimulatorBackend::new().with_seed(0);

    let mut group = c.benchmark_group("width");
    for n in [2u32, 8, 12] {
        let circuit = ladder(n);
        group.bench_with_input(BenchmarkId::new("qubits", n), &circuit, |b, circuit| {
            b.iter(|| rt.block_on(backend.run(black_box(circuit), 100)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_shots, bench_width);
criterion_main!(benches);
