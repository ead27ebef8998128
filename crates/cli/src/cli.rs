use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Command, CommandFactory, Parser};

/// Compare how schedule policies distribute loop iterations over threads.
///
/// Runs the same iteration space under the Default, Static, Dynamic and
/// Guided policies and logs which thread executed which iteration.
#[derive(Parser, Debug)]
#[command(name = "iter-dist", version, about)]
pub struct CliArgs {
    /// Log file to write (default: logs.txt)
    #[arg(long, env = "ITERDIST_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Numerator of the sine payload (default: $ITERDIST_PAYLOAD_SCALE or 1e5)
    #[arg(long)]
    pub payload_scale: Option<f64>,

    /// Print a per-policy load balance line after the runs
    #[arg(long)]
    pub summary: bool,

    /// <num_iterations> <num_threads>; unusable values fall back to 65 and 4
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    pub positional: Vec<String>,
}

impl CliArgs {
    /// Parse the process arguments. Tokens that do not name one of the
    /// options are positional, even when they start with `-`.
    pub fn parse_driver_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Move recognised options (and their values) in front of the positional
/// tokens and put a `--` between the two groups. Everything after an explicit
/// `--` in `raw` stays positional.
pub fn normalize_args<I, T>(raw: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut cmd = CliArgs::command();
    cmd.build();

    let mut raw = raw.into_iter().map(Into::into);
    let mut options: Vec<OsString> = raw.next().into_iter().collect();
    let mut positional = Vec::new();

    while let Some(token) = raw.next() {
        if token == "--" {
            positional.extend(raw.by_ref());
            break;
        }
        match token.to_str().and_then(|t| option_arity(&cmd, t)) {
            Some(takes_value) => {
                options.push(token);
                if takes_value {
                    options.extend(raw.next());
                }
            }
            None => positional.push(token),
        }
    }

    options.push(OsString::from("--"));
    options.extend(positional);
    options
}

/// `Some(true)` when `token` is an option that consumes the next token,
/// `Some(false)` for a flag or an inline `--name=value`, `None` otherwise.
fn option_arity(cmd: &Command, token: &str) -> Option<bool> {
    let (name, inline) = match token.split_once('=') {
        Some((name, _)) => (name, true),
        None => (token, false),
    };
    let arg = if let Some(long) = name.strip_prefix("--") {
        cmd.get_arguments().find(|a| a.get_long() == Some(long))?
    } else if let Some(short) = name.strip_prefix('-') {
        let mut chars = short.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        cmd.get_arguments().find(|a| a.get_short() == Some(c))?
    } else {
        return None;
    };
    Some(arg.get_action().takes_values() && !inline)
}

/// Usage line printed when the positional argument count is wrong.
pub fn usage(program: &str) -> String {
    format!("Use: {} <num_iterations> <num_threads>", program)
}
