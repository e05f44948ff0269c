use clap::Parser;
use log::error;
use prefetch_lookup::config::{Cli, RunConfig};
use prefetch_lookup::driver;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let cfg = match RunConfig::from_cli(cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match driver::run(&cfg) {
        Ok(results) => {
            println!(
                "wrote {} distribution run(s) to {}",
                results.runs.len(),
                cfg.out.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
