//! Configuration module - Environment-based configuration
//!
//! Every knob has a default so the demo runs with an empty environment.

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;

/// Demo configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoConfig {
    /// Hard locations per memory (`SDM_LOCATIONS`).
    pub locations: usize,
    /// RNG seed (`SDM_SEED`); entropy when unset.
    pub seed: Option<u64>,
    /// Noise applied to the probe after a single write (`SDM_PROBE_NOISE`).
    pub probe_noise: f64,
    /// Training rounds (`SDM_LEARN_ITERATIONS`).
    pub learn_iterations: usize,
    /// Per-round training noise (`SDM_LEARN_NOISE`).
    pub learn_noise: f64,
    /// Points in the noise sweep, 0 disables it (`SDM_SWEEP_STEPS`).
    pub sweep_steps: usize,
    /// Largest pattern count in the capacity sweep, 0 disables it
    /// (`SDM_CAPACITY_PATTERNS`).
    pub capacity_patterns: usize,
    /// Print sweep reports as JSON too (`SDM_REPORT_JSON`).
    pub report_json: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            locations: 2000,
            seed: None,
            probe_noise: 0.25,
            learn_iterations: 5,
            learn_noise: 0.1,
            sweep_steps: 6,
            capacity_patterns: 8,
            report_json: false,
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            locations: parse_or(&lookup, "SDM_LOCATIONS", defaults.locations)?,
            seed: match lookup("SDM_SEED") {
                Some(raw) => Some(parse_value("SDM_SEED", &raw)?),
                None => None,
            },
            probe_noise: parse_or(&lookup, "SDM_PROBE_NOISE", defaults.probe_noise)?,
            learn_iterations: parse_or(&lookup, "SDM_LEARN_ITERATIONS", defaults.learn_iterations)?,
            learn_noise: parse_or(&lookup, "SDM_LEARN_NOISE", defaults.learn_noise)?,
            sweep_steps: parse_or(&lookup, "SDM_SWEEP_STEPS", defaults.sweep_steps)?,
            capacity_patterns: parse_or(
                &lookup,
                "SDM_CAPACITY_PATTERNS",
                defaults.capacity_patterns,
            )?,
            report_json: match lookup("SDM_REPORT_JSON") {
                Some(raw) => parse_flag("SDM_REPORT_JSON", &raw)?,
                None => defaults.report_json,
            },
        };

        for (key, value) in [
            ("SDM_PROBE_NOISE", config.probe_noise),
            ("SDM_LEARN_NOISE", config.learn_noise),
        ] {
            if !(0.0..=1.0).contains(&value) {
                bail!("{key} must lie in [0, 1], got {value}");
            }
        }

        Ok(config)
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse()
        .with_context(|| format!("invalid value for {key}: {raw:?}"))
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid value for {key}: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_from_empty_environment() {
        let config = DemoConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            ("SDM_LOCATIONS", "500"),
            ("SDM_SEED", "42"),
            ("SDM_LEARN_NOISE", "0.2"),
            ("SDM_REPORT_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.locations, 500);
        assert_eq!(config.seed, Some(42));
        assert!((config.learn_noise - 0.2).abs() < f64::EPSILON);
        assert!(config.report_json);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        let err = DemoConfig::from_lookup(lookup_from(&[("SDM_LOCATIONS", "many")])).unwrap_err();
        assert!(err.to_string().contains("SDM_LOCATIONS"));
    }

    #[test]
    fn test_rejects_out_of_range_noise() {
        assert!(DemoConfig::from_lookup(lookup_from(&[("SDM_PROBE_NOISE", "1.5")])).is_err());
    }
}
