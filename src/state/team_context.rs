//! Team identity and economy within a round

use serde::{Deserialize, Serialize};

use super::economy::EconomyContext;
use crate::common::types::{TeamHashId, TeamSide};
use crate::config::EconomyThresholds;
use crate::decoder::Player;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamContext {
    pub team_hash_id: TeamHashId,
    /// Side played in the round the context belongs to
    pub side: TeamSide,
    /// Network ids of the roster, sorted
    pub roster: Vec<String>,
    pub economy: EconomyContext,
}

impl TeamContext {
    pub fn new(side: TeamSide, players: &[&Player], thresholds: &EconomyThresholds) -> Self {
        let mut ids: Vec<u64> = players.iter().map(|p| p.network_id()).collect();
        ids.sort_unstable();

        Self {
            team_hash_id: TeamHashId::from_player_ids(ids.iter().copied()),
            side,
            roster: ids.iter().map(u64::to_string).collect(),
            economy: EconomyContext::new(players.iter().copied(), thresholds),
        }
    }

    /// Reclassify the economy from a fresh roster snapshot
    pub fn refresh_economy(&mut self, players: &[&Player], thresholds: &EconomyThresholds) {
        self.economy = EconomyContext::new(players.iter().copied(), thresholds);
    }
}
