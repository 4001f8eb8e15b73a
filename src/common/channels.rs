//! Channel type definitions for the decode → consumer pipeline

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use super::errors::{EngineError, Result};
use crate::events::GameEvent;

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

/// Create a new game event channel with the default buffer size
pub fn create_event_channel() -> (mpsc::Sender<GameEvent>, mpsc::Receiver<GameEvent>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create a new game event channel with a custom buffer size
pub fn create_event_channel_with_size(
    size: usize,
) -> (mpsc::Sender<GameEvent>, mpsc::Receiver<GameEvent>) {
    mpsc::channel(size.max(1))
}

/// Send an event, giving up after `limit` if the consumer stops draining
pub async fn publish_with_timeout(
    sender: &mpsc::Sender<GameEvent>,
    event: GameEvent,
    limit: Duration,
) -> Result<()> {
    match timeout(limit, sender.send(event)).await {
        Ok(sent) => sent.map_err(EngineError::from),
        Err(_) => Err(EngineError::PublishTimeout {
            timeout_ms: limit.as_millis() as u64,
        }),
    }
}
