mod cli;

use anyhow::{Context, Result};
use tracing::{info, warn};

use iterdist_compute::{IterationScheduler, LogFileSink};
use iterdist_core::config::{load_dotenv, Config};
use iterdist_core::{DriverArgs, SchedulePolicy};

use crate::cli::{usage, CliArgs};

fn main() -> Result<()> {
    // Tracing goes to stderr; stdout is reserved for user-facing messages.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse_driver_args();

    let driver = match DriverArgs::from_positional(&args.positional) {
        Ok(driver) => driver,
        Err(e) => {
            let program = std::env::args().next().unwrap_or_else(|| "iter-dist".to_string());
            eprintln!("{}", usage(&program));
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    for fallback in &driver.fallbacks {
        warn!(argument = fallback.name, raw = %fallback.raw, "Unusable argument, using default");
        println!("{} is set to default: {}", fallback.name, fallback.value);
    }

    let mut config = Config::from_env();
    if let Some(path) = args.log_file {
        config.log_file = path;
    }
    if let Some(scale) = args.payload_scale {
        config.payload_scale = scale;
    }
    config.log_summary();

    let sink = LogFileSink::create(&config.log_file)
        .with_context(|| format!("failed to create log file {}", config.log_file.display()))?;
    let scheduler = IterationScheduler::with_sine(config.payload_scale);
    let policies = SchedulePolicy::comparison_set();

    let summaries = scheduler
        .run_all(driver.iterations, driver.threads, &policies, &sink)
        .context("scheduling run failed")?;

    info!(
        sections = summaries.len(),
        iterations = driver.iterations,
        threads = driver.threads,
        path = %config.log_file.display(),
        "Assignment log written"
    );

    if args.summary {
        for summary in &summaries {
            println!("{}", summary.one_line());
        }
    }

    Ok(())
}
