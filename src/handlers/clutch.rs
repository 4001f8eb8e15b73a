//! Clutch lifecycle handlers
//!
//! On a kill, progress runs before start so the kill that creates a 1vN
//! situation is not also counted as clutch progress. Clutches are only
//! tracked while a round is live.

use tracing::{debug, info};

use super::HandlerContext;
use crate::common::errors::Result;
use crate::common::traits::ReplayEventHandler;
use crate::decoder::DemoEvent;
use crate::events::{ClutchPayload, EventPayload, EventType, GameEvent};

fn clutch_event(ctx: &HandlerContext<'_>, event_type: EventType, round_index: usize) -> Result<GameEvent> {
    let round_stats = ctx.round_stats(round_index)?;
    let clutch = &ctx.match_context.round(round_index)?.clutch;

    let payload = EventPayload::Clutch(ClutchPayload {
        round_number: clutch.round_number,
        network_player_id: clutch.network_player_id(),
        status: clutch.status,
        situation: clutch.situation,
        clutch_stats: round_stats.clutch_stats,
    });
    ctx.emit(event_type, round_index, payload)
}

/// NotInClutchSituation → ClutchInitiated
pub struct ClutchStartHandler;

impl ReplayEventHandler for ClutchStartHandler {
    fn name(&self) -> &'static str {
        "clutch_start"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        if !matches!(event, DemoEvent::Kill { .. }) {
            return Ok(None);
        }

        let Some(round_index) = ctx.match_context.live_round() else {
            return Ok(None);
        };
        if !ctx.match_context.begin_clutch(round_index, ctx.game_state)? {
            return Ok(None);
        }

        if let Some(clutch) = ctx.match_context.round(round_index).ok().map(|r| &r.clutch) {
            info!(
                "Clutch started in round {}: {} ({})",
                clutch.round_number,
                clutch.network_player_id().unwrap_or_default(),
                clutch.situation.map(|s| s.to_string()).unwrap_or_default()
            );
        }

        clutch_event(ctx, EventType::ClutchStart, round_index).map(Some)
    }
}

/// ClutchInitiated/ClutchProgress → ClutchProgress on a qualifying kill
pub struct ClutchProgressHandler;

impl ReplayEventHandler for ClutchProgressHandler {
    fn name(&self) -> &'static str {
        "clutch_progress"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::Kill {
            killer: Some(killer_id),
            victim: Some(victim_id),
            ..
        } = event
        else {
            return Ok(None);
        };

        let Some(round_index) = ctx.match_context.live_round() else {
            return Ok(None);
        };
        if !ctx.match_context.in_clutch(round_index) {
            return Ok(None);
        }

        let state = ctx.game_state;
        let (Some(killer), Some(victim)) = (state.find(*killer_id), state.find(*victim_id)) else {
            debug!(killer_id, victim_id, "Kill participants not in game state");
            return Ok(None);
        };

        if !ctx
            .match_context
            .progress_clutch(round_index, killer, victim, state)?
        {
            return Ok(None);
        }

        clutch_event(ctx, EventType::ClutchProgress, round_index).map(Some)
    }
}

/// ClutchInitiated/ClutchProgress → ClutchWon | ClutchLost
pub struct ClutchEndHandler;

impl ReplayEventHandler for ClutchEndHandler {
    fn name(&self) -> &'static str {
        "clutch_end"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::RoundEnd { winner, .. } = event else {
            return Ok(None);
        };

        let Some(round_index) = ctx.match_context.live_round() else {
            return Ok(None);
        };
        let Some(status) = ctx.match_context.resolve_clutch(round_index, *winner)? else {
            return Ok(None);
        };

        info!("Clutch in round {} resolved: {:?}", round_index + 1, status);
        clutch_event(ctx, EventType::ClutchEnd, round_index).map(Some)
    }
}
