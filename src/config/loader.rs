//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::EngineConfig;
use crate::common::errors::{EngineError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_, `__` between sections)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<EngineConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    let engine: EngineConfig = config
        .try_deserialize()
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    validate(&engine)?;
    Ok(engine)
}

/// Reject configurations the engine cannot run with
pub fn validate(config: &EngineConfig) -> Result<()> {
    if config.pipeline.publish_timeout_ms == 0 {
        return Err(EngineError::Configuration(
            "pipeline.publish_timeout_ms must be greater than zero".to_string(),
        ));
    }

    let rules = &config.rules;
    if rules.clutch_min_opponents == 0 || rules.clutch_min_opponents > rules.clutch_max_opponents {
        return Err(EngineError::Configuration(format!(
            "invalid clutch opponent range {}..={}",
            rules.clutch_min_opponents, rules.clutch_max_opponents
        )));
    }

    if rules.pistol_rounds.contains(&0) {
        return Err(EngineError::Configuration(
            "rules.pistol_rounds are 1-based round numbers".to_string(),
        ));
    }

    let eco = &config.economy;
    if !(eco.eco_avg_value <= eco.force_buy_avg_value
        && eco.force_buy_avg_value <= eco.half_buy_avg_value
        && eco.half_buy_avg_value <= eco.full_buy_avg_value)
    {
        return Err(EngineError::Configuration(
            "economy thresholds must be ordered eco <= force <= half <= full".to_string(),
        ));
    }

    Ok(())
}
