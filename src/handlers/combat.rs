//! Kill, damage and weapon fire handlers

use tracing::debug;

use super::HandlerContext;
use crate::common::errors::Result;
use crate::common::traits::ReplayEventHandler;
use crate::common::types::UserId;
use crate::decoder::{DemoEvent, GameState};
use crate::events::{EventPayload, EventType, FragPayload, GameEvent, WeaponFirePayload};
use crate::state::{HitRecord, HitStage};

fn network_id(state: &GameState, user_id: UserId) -> Option<String> {
    state.find(user_id).map(|p| p.network_player_id())
}

/// Logs the kill in the hit log and publishes the frag
pub struct FragHandler;

impl ReplayEventHandler for FragHandler {
    fn name(&self) -> &'static str {
        "frag"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::Kill {
            killer,
            victim,
            assister,
            weapon,
            is_headshot,
        } = event
        else {
            return Ok(None);
        };

        let state = ctx.game_state;
        let Some(victim) = victim.and_then(|id| state.find(id)) else {
            debug!("Kill without a known victim, skipping");
            return Ok(None);
        };
        let killer = killer.and_then(|id| state.find(id));

        let round_index = ctx.play_round();
        let record = HitRecord {
            tick: ctx.tick(),
            stage: HitStage::Fatal,
            source: killer.map(|k| k.user_id),
            source_side: killer.map(|k| k.side),
            target: victim.user_id,
            target_side: victim.side,
            health_damage: 0,
            armor_damage: 0,
            hit_group: None,
            weapon: weapon.clone(),
            assister: *assister,
            is_headshot: *is_headshot,
        };
        ctx.match_context.record_kill(round_index, record)?;

        let Some(killer) = killer else {
            debug!(victim = victim.user_id, weapon = %weapon, "Kill without a killer, not emitted");
            return Ok(None);
        };

        let payload = EventPayload::Frag(FragPayload {
            round_number: round_index + 1,
            killer: Some(killer.network_player_id()),
            victim: victim.network_player_id(),
            assister: assister.and_then(|id| network_id(state, id)),
            weapon: weapon.clone(),
            is_headshot: *is_headshot,
            round_stats: ctx.round_stats(round_index)?,
        });
        ctx.emit(EventType::FragOrScore, round_index, payload).map(Some)
    }
}

/// Records non-fatal damage in the hit log
pub struct PlayerHurtHandler;

impl ReplayEventHandler for PlayerHurtHandler {
    fn name(&self) -> &'static str {
        "player_hurt"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::PlayerHurt {
            attacker,
            victim,
            health_damage,
            armor_damage,
            hit_group,
            weapon,
        } = event
        else {
            return Ok(None);
        };

        let state = ctx.game_state;
        let Some(target) = state.find(*victim) else {
            debug!(victim, "Damage to unknown player, skipping");
            return Ok(None);
        };
        let source = attacker.and_then(|id| state.find(id));

        let round_index = ctx.play_round();
        let record = HitRecord {
            tick: ctx.tick(),
            stage: HitStage::Damage,
            source: source.map(|s| s.user_id),
            source_side: source.map(|s| s.side),
            target: target.user_id,
            target_side: target.side,
            health_damage: *health_damage,
            armor_damage: *armor_damage,
            hit_group: Some(*hit_group),
            weapon: weapon.clone(),
            assister: None,
            is_headshot: false,
        };
        ctx.match_context.record_damage(round_index, record.clone())?;

        ctx.emit(EventType::BattleHit, round_index, EventPayload::BattleHit(record))
            .map(Some)
    }
}

pub struct WeaponFireHandler;

impl ReplayEventHandler for WeaponFireHandler {
    fn name(&self) -> &'static str {
        "weapon_fire"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::WeaponFire { shooter, weapon } = event else {
            return Ok(None);
        };

        let Some(network_player_id) = network_id(ctx.game_state, *shooter) else {
            return Ok(None);
        };

        let round_index = ctx.play_round();
        let payload = EventPayload::WeaponFire(WeaponFirePayload {
            round_number: round_index + 1,
            network_player_id,
            weapon: weapon.clone(),
        });
        ctx.emit(EventType::WeaponFire, round_index, payload).map(Some)
    }
}
