//! Event envelope published on the output queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

use super::types::{Entity, EventPayload, EventType, Stat};
use crate::common::types::{ResourceOwner, ResourceType, StatType, TickId};
use crate::decoder::header::duration_ms;
use crate::state::{BattleStats, PlayerMetadata};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: Uuid,
    pub match_id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub tick_id: TickId,
    #[serde(with = "duration_ms")]
    pub game_time: Duration,
    pub payload: EventPayload,
    pub entities: BTreeMap<ResourceType, Vec<Entity>>,
    pub stats: BTreeMap<StatType, Vec<Stat>>,
    pub resource_owner: ResourceOwner,
    pub created_at: DateTime<Utc>,
}

impl GameEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_id: Uuid,
        tick_id: TickId,
        game_time: Duration,
        event_type: EventType,
        payload: EventPayload,
        entities: BTreeMap<ResourceType, Vec<Entity>>,
        stats: BTreeMap<StatType, Vec<Stat>>,
        resource_owner: ResourceOwner,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            match_id,
            event_type,
            tick_id,
            game_time,
            payload,
            entities,
            stats,
            resource_owner,
            created_at: Utc::now(),
        }
    }

    pub fn player_metadata(&self) -> impl Iterator<Item = &PlayerMetadata> {
        self.entities
            .get(&ResourceType::PlayerMetadata)
            .into_iter()
            .flatten()
            .map(|entity| match entity {
                Entity::PlayerMetadata(metadata) => metadata,
            })
    }

    pub fn battle_stats(&self) -> Option<&BattleStats> {
        self.stats
            .get(&StatType::Battle)
            .and_then(|stats| stats.first())
            .map(|stat| match stat {
                Stat::Battle(battle) => battle,
            })
    }
}
