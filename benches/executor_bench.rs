use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prefetch_lookup::table::{Executor, Table};
use rand::Rng;

fn filled_table(num_keys: u32, capacity: usize) -> Table<u32, u32> {
    let mut table = Table::build(capacity).unwrap();
    for k in 0..num_keys {
        table.insert(k, k + 1);
    }
    table
}

fn bench_executors(c: &mut Criterion) {
    let mut group = c.benchmark_group("executor_lookup");
    let mut rng = rand::rng();

    for num_keys in [10_000u32, 1_000_000] {
        let table = filled_table(num_keys, (num_keys / 4).max(1) as usize);
        let keys: Vec<u32> = (0..8192).map(|_| rng.random_range(0..num_keys)).collect();

        for executor in [Executor::Scalar, Executor::Gp, Executor::Amac, Executor::Coro] {
            group.bench_with_input(
                BenchmarkId::new(executor.name(), num_keys),
                &num_keys,
                |b, _| {
                    let mut out = vec![0u32; keys.len()];
                    b.iter(|| {
                        table
                            .run(executor, black_box(&keys), &mut out, 64)
                            .unwrap();
                        black_box(&out);
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_group_size_sensitivity(c: &mut Criterion) {
    let mut group = c.benchmark_group("amac_group_size");
    let mut rng = rand::rng();

    let num_keys = 1_000_000u32;
    let table = filled_table(num_keys, 250_000);
    let keys: Vec<u32> = (0..8192).map(|_| rng.random_range(0..num_keys)).collect();

    for group_size in [4usize, 16, 64, 256] {
        group.bench_with_input(
            BenchmarkId::new("amac", group_size),
            &group_size,
            |b, &group_size| {
                let mut out = vec![0u32; keys.len()];
                b.iter(|| {
                    table
                        .vectorized_get_amac(black_box(&keys), &mut out, group_size)
                        .unwrap();
                    black_box(&out);
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_executors, bench_group_size_sensitivity);
criterion_main!(benches);
