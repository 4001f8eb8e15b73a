//! State window for a single round

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::battle::{BattleContext, BattleStats};
use super::clutch::ClutchContext;
use super::team_context::TeamContext;
use crate::common::errors::Result;
use crate::common::types::{ResourceOwner, TeamHashId, TeamSide, TickId, UserId};
use crate::config::EconomyThresholds;
use crate::decoder::{GameState, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Normal,
    Pistol,
    Last,
}

/// Participant snapshot taken when the round opens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMetadata {
    pub user_id: UserId,
    pub network_player_id: String,
    pub name: String,
    pub clan_tag: String,
    pub side: TeamSide,
    pub team_hash_id: Option<TeamHashId>,
    pub resource_owner: ResourceOwner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundContext {
    pub round_number: usize,
    pub round_type: RoundType,
    pub winner_team_id: Option<TeamHashId>,
    pub winner_side: Option<TeamSide>,
    pub clutch: ClutchContext,
    pub teams: BTreeMap<TeamHashId, TeamContext>,
    pub team_ct: Option<TeamHashId>,
    pub team_t: Option<TeamHashId>,
    pub battle: BattleContext,
    pub playing_entities: Vec<PlayerMetadata>,
    /// Set once the round's RoundStart was seen
    #[serde(default)]
    pub started: bool,
}

impl RoundContext {
    /// Context with no teams, used to back-fill rounds the decoder skipped
    pub fn empty(round_number: usize, round_type: RoundType) -> Self {
        Self {
            round_number,
            round_type,
            winner_team_id: None,
            winner_side: None,
            clutch: ClutchContext::new(round_number),
            teams: BTreeMap::new(),
            team_ct: None,
            team_t: None,
            battle: BattleContext::new(),
            playing_entities: Vec::new(),
            started: false,
        }
    }

    /// Open a round from the currently playing participants
    pub fn open(
        round_number: usize,
        round_type: RoundType,
        state: &GameState,
        owner: &ResourceOwner,
        thresholds: &EconomyThresholds,
    ) -> Self {
        let mut round = Self::empty(round_number, round_type);
        round.assign_teams(state, owner, thresholds);
        round
    }

    /// Derive teams, side mapping and participant metadata from `state`,
    /// replacing whatever was derived before
    pub fn assign_teams(
        &mut self,
        state: &GameState,
        owner: &ResourceOwner,
        thresholds: &EconomyThresholds,
    ) {
        self.teams.clear();
        self.team_ct = None;
        self.team_t = None;

        for side in [TeamSide::CounterTerrorists, TeamSide::Terrorists] {
            let players = state.playing_on(side);
            if players.is_empty() {
                continue;
            }

            let team = TeamContext::new(side, &players, thresholds);
            let id = team.team_hash_id.clone();
            match side {
                TeamSide::CounterTerrorists => self.team_ct = Some(id.clone()),
                _ => self.team_t = Some(id.clone()),
            }
            self.teams.insert(id, team);
        }

        self.playing_entities = state
            .playing()
            .map(|p| self.metadata_for(p, owner))
            .collect();
    }

    fn metadata_for(&self, player: &Player, owner: &ResourceOwner) -> PlayerMetadata {
        PlayerMetadata {
            user_id: player.user_id,
            network_player_id: player.network_player_id(),
            name: player.name.clone(),
            clan_tag: player.clan_tag.clone(),
            side: player.side,
            team_hash_id: self.team_id_on(player.side).cloned(),
            resource_owner: *owner,
        }
    }

    pub fn team_id_on(&self, side: TeamSide) -> Option<&TeamHashId> {
        match side {
            TeamSide::CounterTerrorists => self.team_ct.as_ref(),
            TeamSide::Terrorists => self.team_t.as_ref(),
            _ => None,
        }
    }

    /// Reclassify both teams' economy from the current roster
    pub fn refresh_economy(&mut self, state: &GameState, thresholds: &EconomyThresholds) {
        for side in [TeamSide::CounterTerrorists, TeamSide::Terrorists] {
            let Some(id) = self.team_id_on(side).cloned() else {
                continue;
            };
            if let Some(team) = self.teams.get_mut(&id) {
                team.refresh_economy(&state.playing_on(side), thresholds);
            }
        }
    }

    /// Record the winner; the side is mapped to the roster that played it this round
    pub fn set_winner(&mut self, side: TeamSide) {
        self.winner_side = Some(side);
        self.winner_team_id = self.team_id_on(side).cloned();
    }

    /// Participants snapshotted at round open, as battle-log roster entries
    pub fn roster(&self) -> Vec<(UserId, TeamSide)> {
        self.playing_entities
            .iter()
            .map(|p| (p.user_id, p.side))
            .collect()
    }

    pub fn battle_stats(&self, trade_window_ticks: TickId) -> Result<BattleStats> {
        self.battle
            .statistics(self.round_number, self.roster(), trade_window_ticks)
    }
}
