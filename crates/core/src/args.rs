//! Positional argument contract of the `iter-dist` driver.
//!
//! The argument *count* is strict. The argument *values* are forgiving:
//! anything that is not a positive base-10 integer is replaced by a default
//! and the substitution is reported back to the caller.

use serde::Serialize;

use crate::error::ConfigError;

pub const DEFAULT_ITERATIONS: usize = 65;
pub const DEFAULT_THREADS: usize = 4;

/// Number of positional arguments the driver accepts.
pub const POSITIONAL_COUNT: usize = 2;

/// A parsed value and whether the default had to be substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parsed {
    pub value: usize,
    pub fell_back: bool,
}

/// Parse `raw` as a positive integer, falling back to `default`.
///
/// The whole string must be digits (an optional leading `+` is accepted);
/// trailing garbage, zero, negatives and overflow all fall back.
pub fn parse_positive_or(raw: &str, default: usize) -> Parsed {
    match raw.parse::<usize>() {
        Ok(value) if value > 0 => Parsed {
            value,
            fell_back: false,
        },
        _ => Parsed {
            value: default,
            fell_back: true,
        },
    }
}

/// A default substituted for an unusable argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fallback {
    pub name: &'static str,
    pub raw: String,
    pub value: usize,
}

/// Validated driver arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverArgs {
    pub iterations: usize,
    pub threads: usize,
    pub fallbacks: Vec<Fallback>,
}

impl DriverArgs {
    /// Build from the positional arguments (program name excluded).
    pub fn from_positional<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        if args.len() != POSITIONAL_COUNT {
            return Err(ConfigError::ArgumentCount {
                expected: POSITIONAL_COUNT,
                got: args.len(),
            });
        }

        let mut fallbacks = Vec::new();
        let mut resolve = |name: &'static str, raw: &str, default: usize| {
            let parsed = parse_positive_or(raw, default);
            if parsed.fell_back {
                fallbacks.push(Fallback {
                    name,
                    raw: raw.to_string(),
                    value: parsed.value,
                });
            }
            parsed.value
        };

        let iterations = resolve("num_iterations", args[0].as_ref(), DEFAULT_ITERATIONS);
        let threads = resolve("num_threads", args[1].as_ref(), DEFAULT_THREADS);

        Ok(Self {
            iterations,
            threads,
            fallbacks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_pass_through() {
        assert_eq!(
            parse_positive_or("100", 65),
            Parsed {
                value: 100,
                fell_back: false
            }
        );
        assert_eq!(parse_positive_or("+8", 4).value, 8);
    }

    #[test]
    fn unusable_values_fall_back() {
        for raw in ["abc", "0", "-3", "12x", "", " 5", "99999999999999999999999999"] {
            let parsed = parse_positive_or(raw, 65);
            assert!(parsed.fell_back, "{:?} should fall back", raw);
            assert_eq!(parsed.value, 65);
        }
    }

    #[test]
    fn abc_and_zero_use_both_defaults() {
        let args = DriverArgs::from_positional(&["abc", "0"]).unwrap();
        assert_eq!(args.iterations, DEFAULT_ITERATIONS);
        assert_eq!(args.threads, DEFAULT_THREADS);
        let names: Vec<&str> = args.fallbacks.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["num_iterations", "num_threads"]);
    }

    #[test]
    fn second_argument_checked_on_its_own() {
        // A valid first argument must not mask a bad second one.
        let args = DriverArgs::from_positional(&["10", "2z"]).unwrap();
        assert_eq!(args.iterations, 10);
        assert_eq!(args.threads, DEFAULT_THREADS);
        assert_eq!(args.fallbacks.len(), 1);
    }

    #[test]
    fn wrong_count_is_rejected() {
        assert_eq!(
            DriverArgs::from_positional(&["10"]),
            Err(ConfigError::ArgumentCount {
                expected: 2,
                got: 1
            })
        );
        let none: [&str; 0] = [];
        assert!(DriverArgs::from_positional(&none).is_err());
        assert!(DriverArgs::from_positional(&["1", "2", "3"]).is_err());
    }
}
