//! Event handlers driving the match state
//!
//! Every handler follows the same skeleton: resolve the round index, make
//! sure the round context exists, apply its mutation, then build an envelope
//! through the event factory.
//!
//! Round boundaries come from the decoder's counter; in-play events (kills,
//! damage, fire, MVP) belong to the live round, or to the round that just
//! closed when they arrive between RoundEnd and the next RoundStart.

pub mod clutch;
pub mod combat;
pub mod dispatcher;
pub mod generic;
pub mod match_start;
pub mod mvp;
pub mod round;

use std::time::Duration;

use crate::common::errors::{EngineError, Result};
use crate::common::types::TickId;
use crate::decoder::{GameState, ReplayHeader};
use crate::events::{new_game_event, EventPayload, EventType, GameEvent};
use crate::state::MatchContext;
use crate::stats::{MatchStatsBuilder, RoundStats};

pub use clutch::{ClutchEndHandler, ClutchProgressHandler, ClutchStartHandler};
pub use combat::{FragHandler, PlayerHurtHandler, WeaponFireHandler};
pub use dispatcher::HandlerRegistry;
pub use generic::GenericEventHandler;
pub use match_start::MatchStartHandler;
pub use mvp::RoundMvpHandler;
pub use round::{FreezetimeEndHandler, RoundEndHandler, RoundStartHandler};

/// Everything a handler may read or mutate for one decoded event
pub struct HandlerContext<'a> {
    pub match_context: &'a mut MatchContext,
    pub game_state: &'a GameState,
    pub header: &'a ReplayHeader,
    pub game_time: Duration,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        match_context: &'a mut MatchContext,
        game_state: &'a GameState,
        header: &'a ReplayHeader,
        game_time: Duration,
    ) -> Self {
        Self {
            match_context,
            game_state,
            header,
            game_time,
        }
    }

    /// Zero-based index of the round the event belongs to
    pub fn round_index(&self) -> usize {
        self.game_state.total_rounds_played
    }

    pub fn tick(&self) -> TickId {
        self.game_state.ingame_tick
    }

    /// Idempotently open the current round; returns its index
    pub fn ensure_round(&mut self) -> usize {
        let index = self.round_index();
        self.match_context.ensure_round(index, self.game_state);
        index
    }

    /// Round owning an in-play event; before the first RoundStart this falls
    /// back to the decoder's counter
    pub fn play_round(&mut self) -> usize {
        match self.match_context.play_round() {
            Some(index) => index,
            None => self.ensure_round(),
        }
    }

    /// Rebuild the stats tree and return the entry for `round_index`
    pub fn round_stats(&self, round_index: usize) -> Result<RoundStats> {
        let stats = MatchStatsBuilder::new(&*self.match_context, self.game_state)
            .with_rounds_stats()?
            .build();
        stats
            .round(round_index + 1)
            .cloned()
            .ok_or(EngineError::RoundNotFound { round_index })
    }

    /// Wrap a payload for the current tick and time
    pub fn emit(&self, event_type: EventType, round_index: usize, payload: EventPayload) -> Result<GameEvent> {
        new_game_event(
            event_type,
            &*self.match_context,
            round_index,
            self.tick(),
            self.game_time,
            payload,
        )
    }
}
