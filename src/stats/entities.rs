//! Immutable statistics tree produced by the stats builder

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::common::types::{ResourceOwner, TeamHashId, TeamSide, UserId, Vector3};
use crate::decoder::ReplayHeader;
use crate::state::{ClutchSituation, ClutchStatus, EconomyState, RoundType};

/// Scoreboard figures for one player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// SteamID64, or the user id for bots
    pub network_player_id: String,
    pub user_id: UserId,
    pub name: String,
    pub side: TeamSide,
    pub health: i32,
    pub armor: i32,
    pub money: i32,
    pub frags: u32,
    pub times_eliminated: u32,
    pub assists: u32,
    pub total_damage: u32,
    pub total_rounds_played: usize,
    /// Average damage per round
    pub dmr: Decimal,
    /// Deaths per kill
    pub kdr: Decimal,
    pub last_alive_position: Vector3,
}

/// Average damage per round; zero when no round was played
pub fn calculate_adr(total_damage: u32, rounds_played: usize) -> Decimal {
    if rounds_played == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(total_damage) / Decimal::from(rounds_played)
}

/// Deaths-to-kills ratio; zero without kills
pub fn calculate_kdr(deaths: u32, kills: u32) -> Decimal {
    if kills == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(deaths) / Decimal::from(kills)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClutchStats {
    pub round_number: usize,
    pub network_player_id: Option<String>,
    pub status: ClutchStatus,
    pub situation: Option<ClutchSituation>,
    pub opponents_stats: Vec<PlayerStats>,
}

impl ClutchStats {
    /// Placeholder for rounds without a clutch
    pub fn none(round_number: usize) -> Self {
        Self {
            round_number,
            network_player_id: None,
            status: ClutchStatus::NotInClutchSituation,
            situation: None,
            opponents_stats: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamEconomyStats {
    pub side: TeamSide,
    pub state: EconomyState,
    pub total_equipment_value: u64,
    pub average_equipment_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStats {
    pub round_number: usize,
    pub round_type: RoundType,
    pub winner_team_id: Option<TeamHashId>,
    pub player_stats: Vec<PlayerStats>,
    pub clutch_stats: ClutchStats,
    pub team_economy_stats: BTreeMap<TeamHashId, TeamEconomyStats>,
}

impl RoundStats {
    pub fn empty(round_number: usize) -> Self {
        Self {
            round_number,
            round_type: RoundType::Normal,
            winner_team_id: None,
            player_stats: Vec::new(),
            clutch_stats: ClutchStats::none(round_number),
            team_economy_stats: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub match_id: Uuid,
    pub resource_owner: ResourceOwner,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ReplayHeader>,
    /// One entry per round context, in round order
    pub rounds_stats: Vec<RoundStats>,
}

impl MatchStats {
    pub fn round(&self, round_number: usize) -> Option<&RoundStats> {
        round_number
            .checked_sub(1)
            .and_then(|index| self.rounds_stats.get(index))
    }
}
