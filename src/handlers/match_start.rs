use tracing::info;

use super::HandlerContext;
use crate::common::errors::Result;
use crate::common::traits::ReplayEventHandler;
use crate::decoder::DemoEvent;
use crate::events::{EventPayload, EventType, GameEvent, MatchStartPayload};

/// Captures the replay header and announced round count
pub struct MatchStartHandler;

impl ReplayEventHandler for MatchStartHandler {
    fn name(&self) -> &'static str {
        "match_start"
    }

    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>> {
        let DemoEvent::MatchStart { max_rounds } = event else {
            return Ok(None);
        };

        ctx.match_context.set_header(ctx.header.clone());
        ctx.match_context.set_max_rounds(*max_rounds);
        let round_index = ctx.ensure_round();

        info!(
            "Match started on {} ({} rounds)",
            ctx.header.map_name, max_rounds
        );

        let payload = EventPayload::MatchStart(MatchStartPayload {
            header: ctx.header.clone(),
            round_count: *max_rounds,
        });
        ctx.emit(EventType::MatchStart, round_index, payload).map(Some)
    }
}
