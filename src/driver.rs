//! The benchmark driver (C8): builds the table, runs each executor over
//! the configured distribution, times it, checks the `value == key + 1`
//! oracle, and assembles a [`RunResults`].
//!
//! Executor ordering mirrors `hashmap_benchmark.cpp`'s `main()`, which
//! runs all four executors in turn over one distribution per
//! invocation; `--distribution` selects which.

use log::info;
use std::time::Instant;

use crate::config::{DistributionKind, RunConfig};
use crate::error::{EngineError, Result};
use crate::profiler::Profiler;
use crate::results::{DistributionResults, ExecutorResult, RunResults};
use crate::table::{Executor, Table};
use crate::workload::{self, Distribution1};

const EXECUTORS: [Executor; 4] = [
    Executor::Amac,
    Executor::Coro,
    Executor::Gp,
    Executor::Scalar,
];

fn build_table(num_keys: u32, capacity: usize) -> Result<Table<u32, u32>> {
    let mut table = Table::build(capacity)?;
    for key in 0..num_keys {
        table.insert(key, key + 1);
    }
    Ok(table)
}

fn invoke_vector_size(executor: Executor, cfg: &RunConfig) -> usize {
    match executor {
        Executor::Amac | Executor::Coro => cfg.amac_requests_size,
        Executor::Gp | Executor::Scalar => cfg.group_size,
    }
}

/// Runs one executor over `cfg.total_queries` keys drawn from `dist`, in
/// chunks of its natural invocation size, and returns its timing result.
/// Propagates the first `KeyNotFound`/configuration error verbatim: the
/// benchmark treats both as fatal, per spec.
fn measure_executor(
    table: &Table<u32, u32>,
    executor: Executor,
    dist: Distribution1,
    cfg: &RunConfig,
    rng: &mut impl rand::Rng,
) -> Result<ExecutorResult> {
    let chunk = invoke_vector_size(executor, cfg);
    let mut requests = vec![0u32; chunk];
    let mut results = vec![0u32; chunk];
    let mut profiler = cfg.profile.then(|| Profiler::new(32, 100, 44));

    let mut total = 0f64;
    let mut issued = 0u64;
    while issued < cfg.total_queries {
        workload::fill(dist, cfg.num_keys, &mut requests, rng);

        let start = Instant::now();
        match (executor, profiler.as_mut()) {
            (Executor::Amac, Some(p)) => {
                table.vectorized_get_amac_profiled(&requests, &mut results, cfg.group_size, p)?
            }
            (Executor::Coro, Some(p)) => {
                table.vectorized_get_coro_profiled(&requests, &mut results, cfg.group_size, p)?
            }
            _ => table.run(executor, &requests, &mut results, cfg.group_size)?,
        }
        total += start.elapsed().as_secs_f64();

        for (i, (key, value)) in requests.iter().zip(results.iter()).enumerate() {
            if *value != key + 1 {
                return Err(EngineError::KeyNotFound {
                    executor: executor.name(),
                    index: i,
                });
            }
        }
        issued += chunk as u64;
    }

    Ok(ExecutorResult {
        executor: executor.name().to_string(),
        total_time_seconds: total,
        throughput_queries_per_second: cfg.total_queries as f64 / total,
        profiler: profiler.as_ref().map(Profiler::snapshot),
    })
}

fn distribution_name(dist_kind: DistributionKind) -> String {
    match dist_kind {
        DistributionKind::Uniform => "uniform".to_string(),
        DistributionKind::Zipfian => "zipfian".to_string(),
    }
}

/// Runs every executor over `dist_kind`, returning whichever
/// `ExecutorResult`s completed. On a fatal error, the partial
/// `DistributionResults` (everything that finished before the failing
/// executor) is returned alongside it rather than discarded, so the
/// caller can still write it out.
fn run_distribution(
    table: &Table<u32, u32>,
    dist_kind: DistributionKind,
    cfg: &RunConfig,
) -> (DistributionResults, Option<EngineError>) {
    let dist = match dist_kind {
        DistributionKind::Uniform => Distribution1::Uniform { max: cfg.num_keys },
        DistributionKind::Zipfian => Distribution1::Zipfian(cfg.zipf),
    };

    let mut rng = rand::rng();
    let mut executors = Vec::with_capacity(EXECUTORS.len());
    let mut failure = None;
    for &executor in &EXECUTORS {
        info!("measuring {:?}/{}", dist_kind, executor.name());
        match measure_executor(table, executor, dist, cfg, &mut rng) {
            Ok(result) => executors.push(result),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    (
        DistributionResults {
            distribution: distribution_name(dist_kind),
            executors,
        },
        failure,
    )
}

/// Runs the full benchmark for `cfg.distribution`, writing partial
/// results to `cfg.out` if an executor within it fails, per the spec's
/// partial-results-on-failure requirement: the record written on
/// failure still holds every executor that completed before the one
/// that failed. Each invocation measures one distribution (the CLI's
/// `--distribution` flag); running both uniform and Zipfian sweeps, as
/// the original driver did unconditionally, is two separate
/// invocations with different `--out` paths.
pub fn run(cfg: &RunConfig) -> Result<RunResults> {
    let table = build_table(cfg.num_keys, cfg.capacity)?;
    let mut results = RunResults::new();

    let (dist_results, failure) = run_distribution(&table, cfg.distribution, cfg);
    results.runs.push(dist_results);

    if let Some(e) = failure {
        let _ = results.write_atomic(&cfg.out);
        return Err(e);
    }

    results.write_atomic(&cfg.out)?;
    Ok(results)
}
