// Benchmark for hash adapter throughput over generated files.
// Run with: cargo bench

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hashbench::generate::generate_random_file;
use hashbench::hashing::{AlgorithmName, Registry};

fn bench_hashing(c: &mut Criterion) {
    let sizes: [(u64, &str); 3] = [
        (64 * 1024, "64KB"),
        (1024 * 1024, "1MB"),
        (10 * 1024 * 1024, "10MB"),
    ];
    let registry = Registry::standard();

    let mut group = c.benchmark_group("hash_throughput");

    for (size, label) in sizes {
        let file = generate_random_file(size, None).expect("generate input file");
        group.throughput(Throughput::Bytes(size));

        for name in AlgorithmName::ALL {
            let algorithm = registry.get(name).expect("registered");
            group.bench_with_input(BenchmarkId::new(name.as_str(), label), &file, |b, file| {
                b.iter(|| algorithm.digest(file).expect("digest"))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_hashing);
criterion_main!(benches);
