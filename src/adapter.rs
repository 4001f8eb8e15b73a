//! Replay adapter - drives a decoder to completion through the handlers

use std::io::BufRead;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::common::channels::publish_with_timeout;
use crate::common::errors::{EngineError, Result};
use crate::common::traits::DemoDecoder;
use crate::common::types::RequestContext;
use crate::config::EngineConfig;
use crate::decoder::JsonLinesDecoder;
use crate::events::GameEvent;
use crate::handlers::{HandlerContext, HandlerRegistry};
use crate::state::MatchContext;
use crate::stats::{MatchStats, MatchStatsBuilder};

/// Outcome of a completed parse
#[derive(Debug, Clone)]
pub struct ParseSummary {
    pub match_id: Uuid,
    pub events_decoded: usize,
    pub events_emitted: usize,
    pub rounds: usize,
    /// Statistics folded from the final match state
    pub stats: MatchStats,
}

/// Entry point that owns the handler registry and engine settings
pub struct ReplayAdapter {
    config: EngineConfig,
    registry: HandlerRegistry,
}

impl ReplayAdapter {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(config, HandlerRegistry::with_default_handlers())
    }

    pub fn with_registry(config: EngineConfig, registry: HandlerRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decode the whole replay, publishing derived events to `out`.
    ///
    /// `out` is taken by value and dropped when this returns, so the
    /// consumer sees the queue close exactly once whether parsing succeeded
    /// or failed. A decode error stops emission immediately.
    #[instrument(skip_all, fields(match_id = %match_id))]
    pub async fn parse<D: DemoDecoder>(
        &self,
        request: &RequestContext,
        match_id: Uuid,
        mut decoder: D,
        out: mpsc::Sender<GameEvent>,
    ) -> Result<ParseSummary> {
        info!("Parsing replay of {}", decoder.header().map_name);

        let mut match_context = MatchContext::with_rules(
            match_id,
            request.resource_owner,
            self.config.rules.clone(),
            self.config.economy.clone(),
        );
        let publish_timeout = self.config.pipeline.publish_timeout();

        let mut events_decoded = 0;
        let mut events_emitted = 0;

        loop {
            if request.cancellation.is_cancelled() {
                warn!(events_decoded, "Parse cancelled");
                return Err(EngineError::Cancelled);
            }

            let event = match decoder.next_event() {
                Ok(Some(event)) => event,
                Ok(None) => break,
                Err(e) => {
                    error!(events_decoded, "Decoder failed: {}", e);
                    return Err(e);
                }
            };
            events_decoded += 1;

            let emitted = {
                let mut ctx = HandlerContext::new(
                    &mut match_context,
                    decoder.game_state(),
                    decoder.header(),
                    decoder.current_time(),
                );
                self.registry.dispatch(&mut ctx, &event, &request.cancellation)?
            };

            for game_event in emitted {
                publish_with_timeout(&out, game_event, publish_timeout).await?;
                events_emitted += 1;
            }
        }

        let stats = MatchStatsBuilder::new(&match_context, decoder.game_state())
            .with_rounds_stats()?
            .build_with_header();

        info!(
            "Replay parsed: {} events decoded, {} emitted, {} rounds",
            events_decoded,
            events_emitted,
            match_context.round_count()
        );

        Ok(ParseSummary {
            match_id,
            events_decoded,
            events_emitted,
            rounds: match_context.round_count(),
            stats,
        })
    }

    /// Parse a JSON-lines replay stream
    pub async fn parse_reader<R: BufRead + Send>(
        &self,
        request: &RequestContext,
        match_id: Uuid,
        reader: R,
        out: mpsc::Sender<GameEvent>,
    ) -> Result<ParseSummary> {
        let decoder = JsonLinesDecoder::new(reader)?;
        self.parse(request, match_id, decoder, out).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::channels::create_event_channel_with_size;
    use crate::common::types::{CancellationFlag, ResourceOwner};
    use crate::decoder::{DemoEvent, DemoFrame, GameState, ReplayHeader, ScriptedDecoder};
    use std::io::Cursor;

    fn request() -> RequestContext {
        RequestContext::new(ResourceOwner::new(Uuid::new_v4(), Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_empty_replay_closes_queue() {
        let adapter = ReplayAdapter::new(EngineConfig::default());
        let (tx, mut rx) = create_event_channel_with_size(8);
        let decoder = ScriptedDecoder::new(ReplayHeader::new("de_vertigo"), Vec::new());

        let summary = adapter.parse(&request(), Uuid::new_v4(), decoder, tx).await.unwrap();
        assert_eq!(summary.events_decoded, 0);
        assert_eq!(summary.stats.rounds_stats.len(), 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_request_stops_before_decoding() {
        let adapter = ReplayAdapter::new(EngineConfig::default());
        let (tx, mut rx) = create_event_channel_with_size(8);
        let decoder = ScriptedDecoder::new(
            ReplayHeader::new("de_vertigo"),
            vec![DemoFrame::new(GameState::default(), DemoEvent::MatchStart { max_rounds: 24 })],
        );

        let cancellation = CancellationFlag::new();
        cancellation.cancel();
        let request = request().with_cancellation(cancellation);

        let err = adapter.parse(&request, Uuid::new_v4(), decoder, tx).await.unwrap_err();
        assert!(matches!(err, EngineError::Cancelled));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_missing_header_is_decode_error() {
        let adapter = ReplayAdapter::new(EngineConfig::default());
        let (tx, mut rx) = create_event_channel_with_size(8);

        let err = adapter
            .parse_reader(&request(), Uuid::new_v4(), Cursor::new(""), tx)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Decode { line: 1, .. }));
        assert!(rx.recv().await.is_none());
    }
}
