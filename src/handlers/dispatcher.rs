//! Routes decoded events to their registered handlers

use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use super::{
    ClutchEndHandler, ClutchProgressHandler, ClutchStartHandler, FragHandler,
    FreezetimeEndHandler, GenericEventHandler, HandlerContext, MatchStartHandler,
    PlayerHurtHandler, RoundEndHandler, RoundMvpHandler, RoundStartHandler, WeaponFireHandler,
};
use crate::common::errors::{EngineError, Result};
use crate::common::traits::BoxedHandler;
use crate::common::types::CancellationFlag;
use crate::decoder::{DemoEvent, DemoEventKind};
use crate::events::GameEvent;

/// Ordered handler lists per raw event kind
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<DemoEventKind, Vec<BoxedHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in handler
    pub fn with_default_handlers() -> Self {
        let mut registry = Self::new();

        registry.register(DemoEventKind::MatchStart, Box::new(MatchStartHandler));
        registry.register(DemoEventKind::RoundStart, Box::new(RoundStartHandler));
        registry.register(DemoEventKind::RoundFreezetimeEnd, Box::new(FreezetimeEndHandler));

        registry.register(DemoEventKind::Kill, Box::new(ClutchProgressHandler));
        registry.register(DemoEventKind::Kill, Box::new(ClutchStartHandler));
        registry.register(DemoEventKind::Kill, Box::new(FragHandler));

        registry.register(DemoEventKind::PlayerHurt, Box::new(PlayerHurtHandler));
        registry.register(DemoEventKind::WeaponFire, Box::new(WeaponFireHandler));

        registry.register(DemoEventKind::RoundEnd, Box::new(ClutchEndHandler));
        registry.register(DemoEventKind::RoundEnd, Box::new(RoundEndHandler));

        registry.register(DemoEventKind::RoundMvpAnnouncement, Box::new(RoundMvpHandler));
        registry.register(DemoEventKind::Generic, Box::new(GenericEventHandler));

        registry
    }

    /// Append a handler; handlers for one kind run in registration order
    pub fn register(&mut self, kind: DemoEventKind, handler: BoxedHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    pub fn handler_count(&self, kind: DemoEventKind) -> usize {
        self.handlers.get(&kind).map(Vec::len).unwrap_or(0)
    }

    /// Run every handler registered for the event, collecting emitted events.
    ///
    /// The cancellation flag is checked before each handler.
    #[instrument(level = "debug", skip_all, fields(kind = ?event.kind(), tick = ctx.tick()))]
    pub fn dispatch(
        &self,
        ctx: &mut HandlerContext<'_>,
        event: &DemoEvent,
        cancellation: &CancellationFlag,
    ) -> Result<Vec<GameEvent>> {
        let kind = event.kind();
        let Some(handlers) = self.handlers.get(&kind) else {
            debug!(?kind, "No handler registered");
            return Ok(Vec::new());
        };

        let mut emitted = Vec::new();
        for handler in handlers {
            if cancellation.is_cancelled() {
                warn!(handler = handler.name(), "Cancelled before handler");
                return Err(EngineError::Cancelled);
            }

            match handler.handle(ctx, event)? {
                Some(game_event) => {
                    debug!(
                        handler = handler.name(),
                        event_type = %game_event.event_type,
                        tick = game_event.tick_id,
                        "Handler emitted event"
                    );
                    emitted.push(game_event);
                }
                None => debug!(handler = handler.name(), "Handler skipped event"),
            }
        }

        Ok(emitted)
    }
}
