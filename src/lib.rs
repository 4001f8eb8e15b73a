//! Replay Analytics Library
//!
//! Reconstructs match state from a stream of demo-decoder events and
//! publishes derived domain events (round boundaries, frags, clutches,
//! economy snapshots) with statistics attached.

pub mod adapter;
pub mod common;
pub mod config;
pub mod consumer;
pub mod decoder;
pub mod events;
pub mod handlers;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use adapter::{ParseSummary, ReplayAdapter};
pub use common::channels::{create_event_channel, create_event_channel_with_size};
pub use common::errors::{EngineError, Result};
pub use common::traits::{DemoDecoder, GameEventSink, ReplayEventHandler};
pub use common::types::{
    CancellationFlag, RequestContext, ResourceOwner, TeamHashId, TeamSide, TickId, UserId,
};
pub use config::types::EngineConfig;
pub use consumer::{drain_events, InMemorySink, JsonLinesSink};
pub use decoder::{DemoEvent, DemoFrame, GameState, JsonLinesDecoder, Player, ReplayHeader, ScriptedDecoder};
pub use events::{EventPayload, EventType, GameEvent};
pub use handlers::HandlerRegistry;
pub use state::{ClutchStatus, EconomyState, MatchContext};
pub use stats::{MatchStats, MatchStatsBuilder};
