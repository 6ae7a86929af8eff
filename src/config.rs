//! Runtime configuration, read from the environment (and an optional `.env`).

use std::str::FromStr;

use log::warn;

use crate::logic::clipper::{DEFAULT_CIRCLE_SAMPLES, MAX_CIRCLE_SAMPLES};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_ZONE_AREA_M2: f64 = 10_000.0;

pub const ENV_BIND_ADDR: &str = "IRRIGATION_BIND_ADDR";
pub const ENV_MAX_ZONE_AREA_M2: &str = "IRRIGATION_MAX_ZONE_AREA_M2";
pub const ENV_CLIP_SAMPLES: &str = "IRRIGATION_CLIP_SAMPLES";

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub bind_addr: String,
    /// Drawn zones larger than this are rejected before entering a project.
    pub max_zone_area_m2: f64,
    /// Circle discretisation used when a clip request omits `samples`.
    pub clip_samples: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            max_zone_area_m2: DEFAULT_MAX_ZONE_AREA_M2,
            clip_samples: DEFAULT_CIRCLE_SAMPLES,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unparsable or out-of-range values
    /// fall back to the default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup(ENV_BIND_ADDR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.bind_addr);

        let mut max_zone_area_m2 =
            parse_or(&lookup, ENV_MAX_ZONE_AREA_M2, defaults.max_zone_area_m2);
        if !(max_zone_area_m2.is_finite() && max_zone_area_m2 > 0.0) {
            warn!("{ENV_MAX_ZONE_AREA_M2} must be a positive number, using {DEFAULT_MAX_ZONE_AREA_M2}");
            max_zone_area_m2 = DEFAULT_MAX_ZONE_AREA_M2;
        }

        let mut clip_samples = parse_or(&lookup, ENV_CLIP_SAMPLES, defaults.clip_samples);
        if !(3..=MAX_CIRCLE_SAMPLES).contains(&clip_samples) {
            warn!(
                "{ENV_CLIP_SAMPLES} must be between 3 and {MAX_CIRCLE_SAMPLES}, using {DEFAULT_CIRCLE_SAMPLES}"
            );
            clip_samples = DEFAULT_CIRCLE_SAMPLES;
        }

        Self {
            bind_addr,
            max_zone_area_m2,
            clip_samples,
        }
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {key}={raw:?}, using {default}");
            default
        }),
    }
}
