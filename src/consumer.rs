//! Consumer side of the output queue

use async_trait::async_trait;
use std::io::Write;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::common::errors::Result;
use crate::common::traits::GameEventSink;
use crate::events::{EventType, GameEvent};

/// Drain the queue into `sink` until the producer closes it.
///
/// Returns the number of events written.
pub async fn drain_events<S: GameEventSink + ?Sized>(
    mut rx: mpsc::Receiver<GameEvent>,
    sink: &mut S,
) -> Result<usize> {
    let mut written = 0;
    while let Some(event) = rx.recv().await {
        if event.event_type == EventType::Generic {
            debug!(tick = event.tick_id, "Skipping generic event");
            continue;
        }
        sink.write(event).await?;
        written += 1;
    }

    sink.flush().await?;
    info!("Output queue closed after {} events", written);
    Ok(written)
}

/// Writes one JSON document per line
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> GameEventSink for JsonLinesSink<W> {
    async fn write(&mut self, event: GameEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct InMemorySink {
    events: Vec<GameEvent>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn of_type(&self, event_type: EventType) -> Vec<&GameEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}

#[async_trait]
impl GameEventSink for InMemorySink {
    async fn write(&mut self, event: GameEvent) -> Result<()> {
        self.events.push(event);
        Ok(())
    }
}
