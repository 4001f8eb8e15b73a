use tracing::debug;

use super::HandlerContext;
use crate::common::errors::Result;
use crate::common::traits::ReplayEventHandler;
use crate::decoder::DemoEvent;
use crate::events::{EventPayload, EventType, GameEvent, RoundMvpPayload};
use crate::stats::MatchStatsBuilder;

pub struct RoundMvpHandler;

impl ReplayEventHandler for RoundMvpHandler {
    fn name(&self) -> &'static str {
        "round_mvp"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::RoundMvpAnnouncement { player, reason } = event else {
            return Ok(None);
        };

        let state = ctx.game_state;
        let Some(player) = state.find(*player) else {
            debug!(user_id = player, "MVP for unknown player, skipping");
            return Ok(None);
        };

        // announced after RoundEnd, so this is normally the round that just closed
        let round_index = ctx.play_round();
        let player_stats = MatchStatsBuilder::new(&*ctx.match_context, state)
            .stats_from_player_with_round(round_index + 1, player);

        let payload = EventPayload::RoundMvp(RoundMvpPayload {
            network_player_id: player.network_player_id(),
            name: player.name.clone(),
            clan_name: player.clan_tag.clone(),
            reason: reason.description().to_string(),
            player_stats,
        });
        ctx.emit(EventType::RoundMvpAnnouncement, round_index, payload)
            .map(Some)
    }
}
