//! Derived event vocabulary and payloads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::types::{TeamHashId, TeamSide};
use crate::decoder::{ReplayHeader, RoundEndReason};
use crate::state::{BattleStats, ClutchSituation, ClutchStatus, HitRecord, PlayerMetadata, RoundType};
use crate::stats::{ClutchStats, PlayerStats, RoundStats, TeamEconomyStats};

/// Type tag of an emitted event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    MatchStart,
    RoundStart,
    RoundEnd,
    FragOrScore,
    ClutchStart,
    ClutchProgress,
    ClutchEnd,
    BattleHit,
    WeaponFire,
    RoundFreezetimeEnd,
    RoundMvpAnnouncement,
    /// Unclassified decoder event; never published by the adapter
    Generic,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStartPayload {
    pub header: ReplayHeader,
    /// Rounds the decoder announced for the match
    pub round_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundStartPayload {
    pub round_number: usize,
    pub round_type: RoundType,
    pub time_limit_secs: u32,
    pub team_ct: Option<TeamHashId>,
    pub team_t: Option<TeamHashId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundEndPayload {
    pub round_number: usize,
    pub winner_side: TeamSide,
    pub winner_team_id: Option<TeamHashId>,
    pub reason: RoundEndReason,
    pub round_stats: RoundStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragPayload {
    pub round_number: usize,
    pub killer: Option<String>,
    pub victim: String,
    pub assister: Option<String>,
    pub weapon: String,
    pub is_headshot: bool,
    pub round_stats: RoundStats,
}

/// Shared by ClutchStart, ClutchProgress and ClutchEnd
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClutchPayload {
    pub round_number: usize,
    pub network_player_id: Option<String>,
    pub status: ClutchStatus,
    pub situation: Option<ClutchSituation>,
    pub clutch_stats: ClutchStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponFirePayload {
    pub round_number: usize,
    pub network_player_id: String,
    pub weapon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyPayload {
    pub round_number: usize,
    pub teams: BTreeMap<TeamHashId, TeamEconomyStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundMvpPayload {
    pub network_player_id: String,
    pub name: String,
    pub clan_name: String,
    pub reason: String,
    pub player_stats: PlayerStats,
}

/// Typed event body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    MatchStart(MatchStartPayload),
    RoundStart(RoundStartPayload),
    RoundEnd(RoundEndPayload),
    Frag(FragPayload),
    Clutch(ClutchPayload),
    BattleHit(HitRecord),
    WeaponFire(WeaponFirePayload),
    Economy(EconomyPayload),
    RoundMvp(RoundMvpPayload),
}

/// Entity attached to an envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum Entity {
    PlayerMetadata(PlayerMetadata),
}

/// Statistic attached to an envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stat", rename_all = "snake_case")]
pub enum Stat {
    Battle(BattleStats),
}
