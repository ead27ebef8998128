use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "ITERDIST";

pub const DEFAULT_LOG_FILE: &str = "logs.txt";
pub const DEFAULT_PAYLOAD_SCALE: f64 = 1e5;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key)
        .and_then(|v| v.parse().ok())
        .filter(|v: &f64| v.is_finite())
        .unwrap_or(default)
}

/// Process-level settings shared by the binaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where the assignment log is written and read back from.
    pub log_file: PathBuf,
    /// Numerator of the sine payload.
    pub payload_scale: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            payload_scale: DEFAULT_PAYLOAD_SCALE,
        }
    }
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    ///
    /// - `ITERDIST_LOG_FILE` (default `logs.txt`)
    /// - `ITERDIST_PAYLOAD_SCALE` (default `1e5`, non-finite values ignored)
    pub fn from_env() -> Self {
        Self::from_env_prefixed(ENV_PREFIX)
    }

    fn from_env_prefixed(prefix: &str) -> Self {
        Self {
            log_file: PathBuf::from(env_or(&format!("{prefix}_LOG_FILE"), DEFAULT_LOG_FILE)),
            payload_scale: env_f64(&format!("{prefix}_PAYLOAD_SCALE"), DEFAULT_PAYLOAD_SCALE),
        }
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  log_file:      {}", self.log_file.display());
        tracing::info!("  payload_scale: {}", self.payload_scale);
    }
}
