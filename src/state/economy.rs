//! Team economy classification
//!
//! Thresholds scale with roster size so under-strength teams (after a
//! disconnect, in wingman-style lobbies) are still classified sensibly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EconomyThresholds;
use crate::decoder::Player;

/// Team buy classification for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EconomyState {
    Undefined,
    FullBuy,
    HalfBuy,
    ForceBuy,
    Eco,
    AntiEco,
    Save,
}

impl std::fmt::Display for EconomyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EconomyState::Undefined => "Undefined",
            EconomyState::FullBuy => "FullBuy",
            EconomyState::HalfBuy => "HalfBuy",
            EconomyState::ForceBuy => "ForceBuy",
            EconomyState::Eco => "Eco",
            EconomyState::AntiEco => "AntiEco",
            EconomyState::Save => "Save",
        };
        write!(f, "{}", s)
    }
}

/// Equipment figures the classifier works from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EconomyMetrics {
    pub roster_size: usize,
    pub total_equipment_value: u64,
    pub average_equipment_value: Decimal,
    pub primaries: usize,
    pub utilities: usize,
    /// Armor and helmet each count once, so a fully armored player counts twice
    pub armored: usize,
}

impl EconomyMetrics {
    pub fn from_roster<'a, I>(roster: I) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut metrics = EconomyMetrics::default();

        for player in roster {
            metrics.roster_size += 1;
            metrics.total_equipment_value += u64::from(player.equipment_value);

            if player.armor > 0 {
                metrics.armored += 1;
            }
            if player.has_helmet {
                metrics.armored += 1;
            }

            for item in &player.inventory {
                if item.is_utility() {
                    metrics.utilities += 1;
                }
                if item.is_primary() {
                    metrics.primaries += 1;
                }
            }
        }

        if metrics.roster_size > 0 {
            metrics.average_equipment_value =
                Decimal::from(metrics.total_equipment_value) / Decimal::from(metrics.roster_size);
        }

        metrics
    }
}

/// Classify a team from its metrics, highest buy first
pub fn classify(metrics: &EconomyMetrics, thresholds: &EconomyThresholds) -> EconomyState {
    let n = metrics.roster_size;
    if n == 0 {
        return EconomyState::Undefined;
    }

    let avg = metrics.average_equipment_value;

    let full_buy_primaries = n;
    let full_buy_utility = n;
    let full_buy_armor = 2 * n;
    let half_buy_primaries = (n + 2).div_ceil(3);
    let half_buy_utility = n / 2;
    let force_buy_primaries = (n + 1).div_ceil(2);

    if avg > thresholds.full_buy_avg_value
        && metrics.primaries >= full_buy_primaries
        && metrics.utilities >= full_buy_utility
        && metrics.armored >= full_buy_armor
    {
        return EconomyState::FullBuy;
    }

    if avg > thresholds.half_buy_avg_value
        && metrics.primaries >= half_buy_primaries
        && metrics.utilities >= half_buy_utility
    {
        return EconomyState::HalfBuy;
    }

    if avg > thresholds.force_buy_avg_value && metrics.primaries >= force_buy_primaries {
        return EconomyState::ForceBuy;
    }

    if avg < thresholds.eco_avg_value {
        if metrics.armored == 0 {
            return EconomyState::Eco;
        }
        if metrics.armored <= n {
            return EconomyState::AntiEco;
        }
    }

    EconomyState::Save
}

/// Classify a roster directly
pub fn determine_buy_type<'a, I>(team: I, thresholds: &EconomyThresholds) -> EconomyState
where
    I: IntoIterator<Item = &'a Player>,
{
    classify(&EconomyMetrics::from_roster(team), thresholds)
}

/// Economy snapshot held by a team context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyContext {
    pub state: EconomyState,
    pub metrics: EconomyMetrics,
}

impl EconomyContext {
    pub fn new<'a, I>(team: I, thresholds: &EconomyThresholds) -> Self
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let metrics = EconomyMetrics::from_roster(team);
        Self {
            state: classify(&metrics, thresholds),
            metrics,
        }
    }
}

impl Default for EconomyContext {
    fn default() -> Self {
        Self {
            state: EconomyState::Undefined,
            metrics: EconomyMetrics::default(),
        }
    }
}
