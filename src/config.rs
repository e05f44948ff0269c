//! Benchmark run configuration (C8's invocation surface), validated once
//! at construction rather than re-checked on every use.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{EngineError, Result};
use crate::workload::ZipfParams;

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum DistributionKind {
    Uniform,
    Zipfian,
}

/// Runtime options for the prefetching benchmark.
#[derive(Parser, Debug, Clone)]
#[command(name = "prefetch-lookup", about = "Memory-latency-hiding lookup engine benchmark")]
pub struct Cli {
    #[arg(long, default_value_t = 10_000_000)]
    pub num_keys: u32,

    #[arg(long, default_value_t = 25_000_000)]
    pub total_queries: u64,

    #[arg(long, default_value_t = 32)]
    pub group_size: usize,

    #[arg(long, default_value_t = 1024)]
    pub amac_requests_size: usize,

    #[arg(long, default_value_t = 500_000)]
    pub capacity: usize,

    #[arg(long, value_enum, default_value_t = DistributionKind::Uniform)]
    pub distribution: DistributionKind,

    #[arg(long, default_value_t = 1)]
    pub zipf_min: u32,

    #[arg(long, default_value_t = 1_000_000)]
    pub zipf_max: u32,

    #[arg(long, default_value_t = 0.99)]
    pub zipf_skew: f64,

    #[arg(long, default_value_t = 27)]
    pub zipf_offset: u32,

    #[arg(long)]
    pub profile: bool,

    #[arg(long, default_value = "results.json")]
    pub out: PathBuf,
}

/// Validated run configuration. Constructing one is the single place
/// `InvalidConfiguration` is raised for the benchmark surface; everything
/// downstream trusts these invariants.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub num_keys: u32,
    pub total_queries: u64,
    pub group_size: usize,
    pub amac_requests_size: usize,
    pub capacity: usize,
    pub distribution: DistributionKind,
    pub zipf: ZipfParams,
    pub profile: bool,
    pub out: PathBuf,
}

impl RunConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.capacity == 0 {
            return Err(EngineError::InvalidConfiguration(
                "capacity must be nonzero".into(),
            ));
        }
        if cli.group_size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "group_size must be nonzero".into(),
            ));
        }
        if cli.amac_requests_size < cli.group_size {
            return Err(EngineError::InvalidConfiguration(format!(
                "amac_requests_size ({}) must be >= group_size ({})",
                cli.amac_requests_size, cli.group_size
            )));
        }
        let zipf = ZipfParams {
            min: cli.zipf_min,
            max: cli.zipf_max,
            skew: cli.zipf_skew,
            offset: cli.zipf_offset,
        };
        if cli.distribution == DistributionKind::Zipfian {
            zipf.validate()?;
        }

        Ok(RunConfig {
            num_keys: cli.num_keys,
            total_queries: cli.total_queries,
            group_size: cli.group_size,
            amac_requests_size: cli.amac_requests_size,
            capacity: cli.capacity,
            distribution: cli.distribution,
            zipf,
            profile: cli.profile,
            out: cli.out,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            num_keys: 16,
            total_queries: 100,
            group_size: 4,
            amac_requests_size: 4,
            capacity: 4,
            distribution: DistributionKind::Uniform,
            zipf_min: 1,
            zipf_max: 10,
            zipf_skew: 0.99,
            zipf_offset: 0,
            profile: false,
            out: "out.json".into(),
        }
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut cli = base_cli();
        cli.capacity = 0;
        assert!(RunConfig::from_cli(cli).is_err());
    }

    #[test]
    fn rejects_amac_window_smaller_than_group() {
        let mut cli = base_cli();
        cli.amac_requests_size = 1;
        cli.group_size = 4;
        assert!(RunConfig::from_cli(cli).is_err());
    }

    #[test]
    fn rejects_invalid_zipfian_range() {
        let mut cli = base_cli();
        cli.distribution = DistributionKind::Zipfian;
        cli.zipf_min = 50;
        cli.zipf_max = 5;
        assert!(RunConfig::from_cli(cli).is_err());
    }

    #[test]
    fn accepts_valid_configuration() {
        assert!(RunConfig::from_cli(base_cli()).is_ok());
    }
}
