//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::channels::DEFAULT_CHANNEL_SIZE;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Output queue behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Match rules used while reconstructing state
    #[serde(default)]
    pub rules: MatchRules,
    /// Economy classifier thresholds
    #[serde(default)]
    pub economy: EconomyThresholds,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Output queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bounded queue capacity between decoder and consumer
    #[serde(default = "default_channel_size")]
    pub channel_size: usize,
    /// Maximum time a publish may block on a full queue
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_ms: u64,
}

impl PipelineConfig {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_size: default_channel_size(),
            publish_timeout_ms: default_publish_timeout(),
        }
    }
}

fn default_channel_size() -> usize {
    DEFAULT_CHANNEL_SIZE
}

fn default_publish_timeout() -> u64 {
    30_000
}

/// Match rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRules {
    /// Round numbers (1-based) played as pistol rounds
    #[serde(default = "default_pistol_rounds")]
    pub pistol_rounds: Vec<usize>,
    /// Ticks after a teammate's death during which a revenge kill counts as a trade
    #[serde(default = "default_trade_window_ticks")]
    pub trade_window_ticks: i64,
    /// Smallest opponent count that makes a 1vN a clutch
    #[serde(default = "default_clutch_min_opponents")]
    pub clutch_min_opponents: usize,
    /// Largest opponent count that makes a 1vN a clutch
    #[serde(default = "default_clutch_max_opponents")]
    pub clutch_max_opponents: usize,
}

impl MatchRules {
    pub fn is_pistol_round(&self, round_number: usize) -> bool {
        self.pistol_rounds.contains(&round_number)
    }

    pub fn is_clutch_opposition(&self, opponents: usize) -> bool {
        (self.clutch_min_opponents..=self.clutch_max_opponents).contains(&opponents)
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            pistol_rounds: default_pistol_rounds(),
            trade_window_ticks: default_trade_window_ticks(),
            clutch_min_opponents: default_clutch_min_opponents(),
            clutch_max_opponents: default_clutch_max_opponents(),
        }
    }
}

fn default_pistol_rounds() -> Vec<usize> {
    vec![1, 16]
}

fn default_trade_window_ticks() -> i64 {
    // 5 seconds at 64 tick
    320
}

fn default_clutch_min_opponents() -> usize {
    2
}

fn default_clutch_max_opponents() -> usize {
    5
}

/// Average-equipment-value thresholds for the buy classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyThresholds {
    #[serde(default = "default_full_buy")]
    pub full_buy_avg_value: Decimal,
    #[serde(default = "default_half_buy")]
    pub half_buy_avg_value: Decimal,
    #[serde(default = "default_force_buy")]
    pub force_buy_avg_value: Decimal,
    #[serde(default = "default_eco")]
    pub eco_avg_value: Decimal,
}

impl Default for EconomyThresholds {
    fn default() -> Self {
        Self {
            full_buy_avg_value: default_full_buy(),
            half_buy_avg_value: default_half_buy(),
            force_buy_avg_value: default_force_buy(),
            eco_avg_value: default_eco(),
        }
    }
}

fn default_full_buy() -> Decimal {
    dec!(2500)
}

fn default_half_buy() -> Decimal {
    dec!(1500)
}

fn default_force_buy() -> Decimal {
    dec!(1000)
}

fn default_eco() -> Decimal {
    dec!(500)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
