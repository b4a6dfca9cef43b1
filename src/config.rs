use std::{env, path::Path};

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::document;

pub const ENABLE_API_REPLACEMENT_ENV: &str = "REPLACEMENT_PLANNER_ENABLE_API_DATA_SET_REPLACEMENT";

/// Feature configuration for the planner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlannerConfig {
    /// Allows replacing files that feed a public API data set version.
    pub enable_replacement_of_public_api_data_sets: bool,
}

impl PlannerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        document::load(path).with_context(|| format!("Loading planner config from {path:?}"))
    }

    /// Layers the optional config file, then the environment, then an explicit override.
    pub fn resolve(path: Option<&Path>, enable_api_replacement: Option<bool>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(raw) = env::var(ENABLE_API_REPLACEMENT_ENV) {
            config.enable_replacement_of_public_api_data_sets = parse_flag(&raw)
                .with_context(|| format!("Reading {ENABLE_API_REPLACEMENT_ENV}"))?;
        }
        if let Some(enabled) = enable_api_replacement {
            config.enable_replacement_of_public_api_data_sets = enabled;
        }
        debug!("Resolved planner config: {config:?}");
        Ok(config)
    }
}

pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "on" => Ok(true),
        "false" | "f" | "no" | "n" | "0" | "off" | "" => Ok(false),
        other => Err(anyhow!("Invalid boolean flag '{other}'")),
    }
}
