//! Wraps payloads into `GameEvent` envelopes

use std::collections::BTreeMap;
use std::time::Duration;
use tracing::error;

use super::game_event::GameEvent;
use super::types::{Entity, EventPayload, EventType, Stat};
use crate::common::errors::Result;
use crate::common::types::{ResourceType, StatType, TickId};
use crate::state::MatchContext;

/// Build an envelope for `round_index`, attaching the round's playing
/// entities and battle statistics.
///
/// Fails with `RoundNotFound` when no context exists for the index.
pub fn new_game_event(
    event_type: EventType,
    match_context: &MatchContext,
    round_index: usize,
    tick_id: TickId,
    game_time: Duration,
    payload: EventPayload,
) -> Result<GameEvent> {
    let round = match_context.round(round_index).map_err(|e| {
        error!(
            round_index,
            rounds = match_context.round_count(),
            event_type = %event_type,
            "No round context for event"
        );
        e
    })?;

    let mut entities = BTreeMap::new();
    entities.insert(
        ResourceType::PlayerMetadata,
        round
            .playing_entities
            .iter()
            .cloned()
            .map(Entity::PlayerMetadata)
            .collect(),
    );

    let battle = round
        .battle_stats(match_context.rules().trade_window_ticks)
        .map_err(|e| {
            error!(round_index, "Unable to read stats from battle context: {}", e);
            e
        })?;

    let mut stats = BTreeMap::new();
    stats.insert(StatType::Battle, vec![Stat::Battle(battle)]);

    Ok(GameEvent::new(
        match_context.match_id,
        tick_id,
        game_time,
        event_type,
        payload,
        entities,
        stats,
        match_context.resource_owner,
    ))
}
