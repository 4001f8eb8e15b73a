//! Raw event model produced by the demo decoder

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::types::{TeamSide, UserId};

/// Body part hit by a bullet or grenade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitGroup {
    Generic,
    Head,
    Chest,
    Stomach,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
    Neck,
    Gear,
}

/// Reason a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundEndReason {
    TargetBombed,
    BombDefused,
    CtWin,
    TerroristsWin,
    TargetSaved,
    Draw,
    Surrender,
    Other,
}

/// Why a player was awarded the round MVP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MvpReason {
    MostEliminations,
    BombDefused,
    BombPlanted,
    Unknown,
}

impl MvpReason {
    pub fn description(&self) -> &'static str {
        match self {
            MvpReason::MostEliminations => "Most Eliminations",
            MvpReason::BombDefused => "Defused the bomb",
            MvpReason::BombPlanted => "Planted the bomb",
            MvpReason::Unknown => "",
        }
    }
}

/// Structured callback emitted by the decoder, in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DemoEvent {
    MatchStart {
        /// Rounds the match is configured to play
        #[serde(default)]
        max_rounds: usize,
    },
    RoundStart {
        #[serde(default)]
        time_limit_secs: u32,
    },
    RoundEnd {
        winner: TeamSide,
        reason: RoundEndReason,
    },
    Kill {
        #[serde(default)]
        killer: Option<UserId>,
        #[serde(default)]
        victim: Option<UserId>,
        #[serde(default)]
        assister: Option<UserId>,
        #[serde(default)]
        weapon: String,
        #[serde(default)]
        is_headshot: bool,
    },
    PlayerHurt {
        #[serde(default)]
        attacker: Option<UserId>,
        victim: UserId,
        health_damage: u32,
        #[serde(default)]
        armor_damage: u32,
        hit_group: HitGroup,
        #[serde(default)]
        weapon: String,
    },
    WeaponFire {
        shooter: UserId,
        weapon: String,
    },
    RoundFreezetimeEnd,
    RoundMvpAnnouncement {
        player: UserId,
        reason: MvpReason,
    },
    Generic {
        name: String,
        #[serde(default)]
        data: BTreeMap<String, serde_json::Value>,
    },
}

/// Discriminant used to register handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoEventKind {
    MatchStart,
    RoundStart,
    RoundEnd,
    Kill,
    PlayerHurt,
    WeaponFire,
    RoundFreezetimeEnd,
    RoundMvpAnnouncement,
    Generic,
}

impl DemoEvent {
    pub fn kind(&self) -> DemoEventKind {
        match self {
            DemoEvent::MatchStart { .. } => DemoEventKind::MatchStart,
            DemoEvent::RoundStart { .. } => DemoEventKind::RoundStart,
            DemoEvent::RoundEnd { .. } => DemoEventKind::RoundEnd,
            DemoEvent::Kill { .. } => DemoEventKind::Kill,
            DemoEvent::PlayerHurt { .. } => DemoEventKind::PlayerHurt,
            DemoEvent::WeaponFire { .. } => DemoEventKind::WeaponFire,
            DemoEvent::RoundFreezetimeEnd => DemoEventKind::RoundFreezetimeEnd,
            DemoEvent::RoundMvpAnnouncement { .. } => DemoEventKind::RoundMvpAnnouncement,
            DemoEvent::Generic { .. } => DemoEventKind::Generic,
        }
    }
}
