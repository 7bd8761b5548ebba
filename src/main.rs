//! Reference SIR run
//!
//! Integrates the reference epidemic (or the YAML configuration named by the
//! `SIR_CONFIG` environment variable) and prints the infection peak.
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see step
//! control details.

use std::error::Error;

use log::info;
use sir_rs::analysis::EpidemicSummary;
use sir_rs::config::SimulationConfig;

/// Environment variable naming an optional YAML configuration
const CONFIG_VARIABLE: &str = "SIR_CONFIG";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::var_os(CONFIG_VARIABLE) {
        Some(path) => {
            info!("using configuration {}", path.to_string_lossy());
            SimulationConfig::load(path)?
        }
        None => SimulationConfig::default(),
    };

    let result = config.run()?;
    let summary = EpidemicSummary::from_result(&result)?;

    info!(
        "{} accepted steps, {} rejected, {} evaluations",
        result.statistics.accepted_steps,
        result.statistics.rejected_steps,
        result.statistics.function_evaluations
    );

    println!("{}", summary.peak_announcement());

    Ok(())
}
