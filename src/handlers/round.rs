//! Round boundary handlers

use tracing::{debug, info};

use super::HandlerContext;
use crate::common::errors::Result;
use crate::common::traits::ReplayEventHandler;
use crate::decoder::DemoEvent;
use crate::events::{
    EconomyPayload, EventPayload, EventType, GameEvent, RoundEndPayload, RoundStartPayload,
};

/// Opens the round context and announces the teams
pub struct RoundStartHandler;

impl ReplayEventHandler for RoundStartHandler {
    fn name(&self) -> &'static str {
        "round_start"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::RoundStart { time_limit_secs } = event else {
            return Ok(None);
        };

        let round_index = ctx.round_index();
        let round = ctx.match_context.start_round(round_index, ctx.game_state);
        debug!(round_number = round.round_number, round_type = ?round.round_type, "Round started");

        let payload = EventPayload::RoundStart(RoundStartPayload {
            round_number: round.round_number,
            round_type: round.round_type,
            time_limit_secs: *time_limit_secs,
            team_ct: round.team_ct.clone(),
            team_t: round.team_t.clone(),
        });
        ctx.emit(EventType::RoundStart, round_index, payload).map(Some)
    }
}

/// Records the winner and publishes the round's statistics
pub struct RoundEndHandler;

impl ReplayEventHandler for RoundEndHandler {
    fn name(&self) -> &'static str {
        "round_end"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::RoundEnd { winner, reason } = event else {
            return Ok(None);
        };

        let round_index = ctx.ensure_round();
        let round = ctx.match_context.round_mut(round_index)?;
        round.set_winner(*winner);
        let round_number = round.round_number;
        let winner_team_id = round.winner_team_id.clone();
        ctx.match_context.end_round(round_index);

        info!(
            "Round {} won by {} ({:?})",
            round_number, winner, reason
        );

        let payload = EventPayload::RoundEnd(RoundEndPayload {
            round_number,
            winner_side: *winner,
            winner_team_id,
            reason: *reason,
            round_stats: ctx.round_stats(round_index)?,
        });
        ctx.emit(EventType::RoundEnd, round_index, payload).map(Some)
    }
}

/// Reclassifies team economy once buying is over
pub struct FreezetimeEndHandler;

impl ReplayEventHandler for FreezetimeEndHandler {
    fn name(&self) -> &'static str {
        "round_freezetime_end"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        if !matches!(event, DemoEvent::RoundFreezetimeEnd) {
            return Ok(None);
        }

        let round_index = ctx.ensure_round();
        ctx.match_context.refresh_economy(round_index, ctx.game_state)?;

        let round_stats = ctx.round_stats(round_index)?;
        for (team, economy) in &round_stats.team_economy_stats {
            debug!(team = %team, side = %economy.side, state = %economy.state, "Team economy");
        }

        let payload = EventPayload::Economy(EconomyPayload {
            round_number: round_stats.round_number,
            teams: round_stats.team_economy_stats,
        });
        ctx.emit(EventType::RoundFreezetimeEnd, round_index, payload).map(Some)
    }
}
