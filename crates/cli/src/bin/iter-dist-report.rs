//! iter-dist-report: read back an assignment log and summarise how each
//! schedule policy spread its iterations over threads.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

use iterdist_core::config::{load_dotenv, Config};
use iterdist_core::{parse_log, Section, SectionBalance};

/// Summarise an iter-dist log file per schedule policy.
#[derive(Parser, Debug)]
#[command(name = "iter-dist-report", version, about)]
struct Cli {
    /// Log file to read (default: logs.txt)
    #[arg(long, env = "ITERDIST_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Emit JSON instead of a text table
    #[arg(long)]
    json: bool,

    /// Delete the log file after a successful report
    #[arg(long)]
    remove_log_file: bool,
}

#[derive(Debug, Serialize)]
struct SectionReport {
    label: String,
    events: usize,
    #[serde(flatten)]
    balance: SectionBalance,
}

impl SectionReport {
    fn from_section(section: &Section) -> Self {
        Self {
            label: section.policy.label(),
            events: section.events.len(),
            balance: section.balance(),
        }
    }

    fn render(&self) -> String {
        let mut out = format!(
            "{} ({} iterations, imbalance {:.2})\n",
            self.label, self.events, self.balance.imbalance
        );
        for (worker, count) in &self.balance.iterations {
            let chunks = self.balance.observed_chunks.get(worker).copied().unwrap_or(0);
            out.push_str(&format!(
                "  thread {:>3}: {:>6} iterations in {:>4} runs\n",
                worker, count, chunks
            ));
        }
        out
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let log_file = cli.log_file.unwrap_or_else(|| Config::from_env().log_file);

    if !log_file.exists() {
        let cwd = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "(unknown)".to_string());
        bail!(
            "Log file does not exist. Path: {}\nCurrent directory: {}",
            log_file.display(),
            cwd
        );
    }

    let text = fs::read_to_string(&log_file)
        .with_context(|| format!("failed to read {}", log_file.display()))?;
    let sections =
        parse_log(&text).with_context(|| format!("failed to parse {}", log_file.display()))?;
    info!(path = %log_file.display(), sections = sections.len(), "Parsed assignment log");

    let reports: Vec<SectionReport> = sections.iter().map(SectionReport::from_section).collect();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", report.render());
        }
    }

    if cli.remove_log_file {
        fs::remove_file(&log_file)
            .with_context(|| format!("failed to remove {}", log_file.display()))?;
        info!(path = %log_file.display(), "Removed log file");
    }

    Ok(())
}
