//! Folds the match context into a `MatchStats` snapshot

use std::collections::BTreeMap;
use tracing::error;

use super::entities::{
    calculate_adr, calculate_kdr, ClutchStats, MatchStats, PlayerStats, RoundStats,
    TeamEconomyStats,
};
use crate::common::errors::{EngineError, Result};
use crate::common::types::TeamHashId;
use crate::decoder::{GameState, Player};
use crate::state::{MatchContext, RoundContext};

/// Builds statistics from the live game state.
///
/// Player figures come from the decoder's current view, not from a
/// snapshot frozen at round close, so build right after each event.
pub struct MatchStatsBuilder<'a> {
    match_context: &'a MatchContext,
    game_state: &'a GameState,
    stats: MatchStats,
}

impl<'a> MatchStatsBuilder<'a> {
    pub fn new(match_context: &'a MatchContext, game_state: &'a GameState) -> Self {
        let rounds_stats = (1..=match_context.round_count())
            .map(RoundStats::empty)
            .collect();

        Self {
            match_context,
            game_state,
            stats: MatchStats {
                match_id: match_context.match_id,
                resource_owner: match_context.resource_owner,
                header: None,
                rounds_stats,
            },
        }
    }

    /// Fill in every round the context holds
    pub fn with_rounds_stats(mut self) -> Result<Self> {
        let match_context = self.match_context;
        for (_, round) in match_context.rounds() {
            self.fill_round(round)?;
        }
        Ok(self)
    }

    /// Fill in a single round by its 1-based number
    pub fn with_round(mut self, round_number: i64) -> Result<Self> {
        let index = self.check_round_number(round_number)?;
        let match_context = self.match_context;
        let round = match_context.round(index)?;
        self.fill_round(round)?;
        Ok(self)
    }

    fn check_round_number(&self, round_number: i64) -> Result<usize> {
        let round_count = self.stats.rounds_stats.len();
        if round_number <= 0 || round_number as usize > round_count {
            error!(round_number, round_count, "Round number out of range");
            return Err(EngineError::InvalidRoundNumber {
                round_number,
                round_count,
            });
        }
        Ok(round_number as usize - 1)
    }

    fn fill_round(&mut self, round: &RoundContext) -> Result<()> {
        let index = self.check_round_number(round.round_number as i64)?;

        self.stats.rounds_stats[index] = RoundStats {
            round_number: round.round_number,
            round_type: round.round_type,
            winner_team_id: round.winner_team_id.clone(),
            player_stats: self.player_stats_with_round(round),
            clutch_stats: self.clutch_stats(round),
            team_economy_stats: Self::team_economy_stats(round),
        };
        Ok(())
    }

    /// Scoreboard entry for one player as of `round_number`
    pub fn stats_from_player_with_round(&self, round_number: usize, player: &Player) -> PlayerStats {
        PlayerStats {
            network_player_id: player.network_player_id(),
            user_id: player.user_id,
            name: player.name.clone(),
            side: player.side,
            health: player.health,
            armor: player.armor,
            money: player.money,
            frags: player.kills,
            times_eliminated: player.deaths,
            assists: player.assists,
            total_damage: player.total_damage,
            total_rounds_played: round_number,
            dmr: calculate_adr(player.total_damage, round_number),
            kdr: calculate_kdr(player.deaths, player.kills),
            last_alive_position: player.last_alive_position,
        }
    }

    fn player_stats_with_round(&self, round: &RoundContext) -> Vec<PlayerStats> {
        self.game_state
            .all()
            .iter()
            .map(|p| self.stats_from_player_with_round(round.round_number, p))
            .collect()
    }

    fn clutch_stats(&self, round: &RoundContext) -> ClutchStats {
        let clutch = &round.clutch;
        if clutch.player.is_none() {
            return ClutchStats::none(round.round_number);
        }

        ClutchStats {
            round_number: round.round_number,
            network_player_id: clutch.network_player_id(),
            status: clutch.status,
            situation: clutch.situation,
            opponents_stats: clutch
                .opponents
                .iter()
                .map(|o| self.stats_from_player_with_round(round.round_number, o))
                .collect(),
        }
    }

    fn team_economy_stats(round: &RoundContext) -> BTreeMap<TeamHashId, TeamEconomyStats> {
        [round.team_ct.as_ref(), round.team_t.as_ref()]
            .into_iter()
            .flatten()
            .filter_map(|id| round.teams.get(id).map(|team| (id.clone(), team)))
            .map(|(id, team)| {
                (
                    id,
                    TeamEconomyStats {
                        side: team.side,
                        state: team.economy.state,
                        total_equipment_value: team.economy.metrics.total_equipment_value,
                        average_equipment_value: team.economy.metrics.average_equipment_value,
                    },
                )
            })
            .collect()
    }

    pub fn build(self) -> MatchStats {
        self.stats
    }

    pub fn build_with_header(self) -> MatchStats {
        let header = self.match_context.header.clone();
        MatchStats {
            header: Some(header),
            ..self.stats
        }
    }
}
