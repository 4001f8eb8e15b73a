//! In-memory decoder replaying a prepared list of frames

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

use super::events::DemoEvent;
use super::game_state::GameState;
use super::header::{duration_ms, ReplayHeader};
use crate::common::errors::{EngineError, Result};
use crate::common::traits::DemoDecoder;

/// One decoded event together with the game state it leaves behind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoFrame {
    #[serde(default, with = "duration_ms")]
    pub game_time: Duration,
    pub state: GameState,
    pub event: DemoEvent,
}

impl DemoFrame {
    pub fn new(state: GameState, event: DemoEvent) -> Self {
        Self {
            game_time: Duration::ZERO,
            state,
            event,
        }
    }

    pub fn at(mut self, game_time: Duration) -> Self {
        self.game_time = game_time;
        self
    }
}

/// Decoder over a fixed sequence of frames
#[derive(Debug, Clone)]
pub struct ScriptedDecoder {
    header: ReplayHeader,
    frames: VecDeque<DemoFrame>,
    state: GameState,
    current_time: Duration,
    /// Frames left before a simulated decode failure
    fail_after: Option<usize>,
    decoded: usize,
}

impl ScriptedDecoder {
    pub fn new(header: ReplayHeader, frames: Vec<DemoFrame>) -> Self {
        Self {
            header,
            frames: frames.into(),
            state: GameState::default(),
            current_time: Duration::ZERO,
            fail_after: None,
            decoded: 0,
        }
    }

    /// Simulate a truncated stream: decoding fails once `frames` frames were read
    pub fn with_failure_after(mut self, frames: usize) -> Self {
        self.fail_after = Some(frames);
        self
    }
}

impl DemoDecoder for ScriptedDecoder {
    fn header(&self) -> &ReplayHeader {
        &self.header
    }

    fn game_state(&self) -> &GameState {
        &self.state
    }

    fn current_time(&self) -> Duration {
        self.current_time
    }

    fn next_event(&mut self) -> Result<Option<DemoEvent>> {
        if self.fail_after == Some(self.decoded) {
            return Err(EngineError::Decode {
                line: self.decoded + 1,
                reason: "unexpected end of replay stream".to_string(),
            });
        }

        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };

        self.decoded += 1;
        self.state = frame.state;
        self.current_time = frame.game_time;
        Ok(Some(frame.event))
    }
}
