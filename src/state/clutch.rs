//! Per-round clutch (1vN) situation tracking

use serde::{Deserialize, Serialize};

use crate::common::types::TeamSide;
use crate::config::MatchRules;
use crate::decoder::{GameState, Player};

/// Clutch lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClutchStatus {
    NotInClutchSituation,
    ClutchInitiated,
    ClutchProgress,
    ClutchLost,
    ClutchWon,
}

impl ClutchStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ClutchStatus::ClutchInitiated | ClutchStatus::ClutchProgress)
    }
}

/// Number of opponents the clutch player faced when the clutch began
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClutchSituation {
    #[serde(rename = "1v2")]
    OneVsTwo,
    #[serde(rename = "1v3")]
    OneVsThree,
    #[serde(rename = "1v4")]
    OneVsFour,
    #[serde(rename = "1v5")]
    OneVsFive,
}

impl ClutchSituation {
    pub fn from_opponents(opponents: usize) -> Option<Self> {
        match opponents {
            2 => Some(ClutchSituation::OneVsTwo),
            3 => Some(ClutchSituation::OneVsThree),
            4 => Some(ClutchSituation::OneVsFour),
            5 => Some(ClutchSituation::OneVsFive),
            _ => None,
        }
    }

    pub fn opponents(&self) -> usize {
        match self {
            ClutchSituation::OneVsTwo => 2,
            ClutchSituation::OneVsThree => 3,
            ClutchSituation::OneVsFour => 4,
            ClutchSituation::OneVsFive => 5,
        }
    }
}

impl std::fmt::Display for ClutchSituation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1v{}", self.opponents())
    }
}

/// Clutch state for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClutchContext {
    pub round_number: usize,
    pub player: Option<Player>,
    pub opponents: Vec<Player>,
    pub status: ClutchStatus,
    pub situation: Option<ClutchSituation>,
}

impl ClutchContext {
    pub fn new(round_number: usize) -> Self {
        Self {
            round_number,
            player: None,
            opponents: Vec::new(),
            status: ClutchStatus::NotInClutchSituation,
            situation: None,
        }
    }

    /// Lone survivor and their living opponents, if the state is a clutch
    pub fn detect(state: &GameState, rules: &MatchRules) -> Option<(Player, Vec<Player>)> {
        for side in [TeamSide::CounterTerrorists, TeamSide::Terrorists] {
            let alive = state.alive_on(side);
            if alive.len() != 1 {
                continue;
            }

            let Some(opponent_side) = side.opponent() else {
                continue;
            };
            let opponents = state.alive_on(opponent_side);
            if rules.is_clutch_opposition(opponents.len()) {
                return Some((
                    alive[0].clone(),
                    opponents.into_iter().cloned().collect(),
                ));
            }
        }

        None
    }

    /// NotInClutchSituation → ClutchInitiated; no-op once a clutch exists
    pub fn initiate(&mut self, player: Player, opponents: Vec<Player>) -> bool {
        if self.status != ClutchStatus::NotInClutchSituation {
            return false;
        }

        self.situation = ClutchSituation::from_opponents(opponents.len());
        self.player = Some(player);
        self.opponents = opponents;
        self.status = ClutchStatus::ClutchInitiated;
        true
    }

    /// Initiated/Progress → Progress on a cross-team kill by the living clutch player
    pub fn progress(&mut self, killer: &Player, victim: &Player, alive_opponents: Vec<Player>) -> bool {
        if !self.status.is_active() {
            return false;
        }

        let Some(clutcher) = self.player.as_ref() else {
            return false;
        };

        let qualifies = killer.is_alive
            && killer.user_id == clutcher.user_id
            && victim.user_id != clutcher.user_id
            && killer.side != victim.side;
        if !qualifies {
            return false;
        }

        self.player = Some(killer.clone());
        self.opponents = alive_opponents;
        self.status = ClutchStatus::ClutchProgress;
        true
    }

    /// Initiated/Progress → Won or Lost depending on the round winner
    pub fn resolve(&mut self, winner: TeamSide) -> Option<ClutchStatus> {
        if !self.status.is_active() {
            return None;
        }

        let side = self.player.as_ref()?.side;
        self.status = if side == winner {
            ClutchStatus::ClutchWon
        } else {
            ClutchStatus::ClutchLost
        };
        Some(self.status)
    }

    pub fn in_clutch(&self) -> bool {
        self.status != ClutchStatus::NotInClutchSituation
    }

    pub fn network_player_id(&self) -> Option<String> {
        self.player.as_ref().map(Player::network_player_id)
    }
}
