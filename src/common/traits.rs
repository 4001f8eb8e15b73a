//! Trait definitions for the pipeline seams

use async_trait::async_trait;
use std::time::Duration;

use super::errors::Result;
use crate::decoder::{DemoEvent, GameState, ReplayHeader};
use crate::events::GameEvent;
use crate::handlers::HandlerContext;

/// Trait for replay decoders (the external demo-format parser)
///
/// Decoders are strictly sequential: each call to `next_event` advances the
/// stream by one event and updates the view returned by `game_state`.
pub trait DemoDecoder: Send {
    /// Header parsed from the start of the replay
    fn header(&self) -> &ReplayHeader;

    /// Live game state as of the last decoded event
    fn game_state(&self) -> &GameState;

    /// Elapsed game time as of the last decoded event
    fn current_time(&self) -> Duration;

    /// Decode the next event
    ///
    /// Returns `Ok(None)` at end of stream.
    fn next_event(&mut self) -> Result<Option<DemoEvent>>;
}

/// Trait for handling one kind of raw decoder event
///
/// Handlers mutate the match context and optionally produce one derived
/// event. Returning `Ok(None)` means the event did not establish a state
/// worth emitting.
pub trait ReplayEventHandler: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Handle a decoded event
    fn handle(&self, ctx: &mut HandlerContext<'_>, event: &DemoEvent) -> Result<Option<GameEvent>>;
}

/// Boxed handler for dynamic dispatch
pub type BoxedHandler = Box<dyn ReplayEventHandler>;

/// Trait for consumers draining the output queue
#[async_trait]
pub trait GameEventSink: Send {
    /// Accept one emitted event
    async fn write(&mut self, event: GameEvent) -> Result<()>;

    /// Called once after the queue closes
    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
