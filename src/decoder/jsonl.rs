//! Line-delimited JSON replay stream decoder
//!
//! The first non-empty line holds the [`ReplayHeader`]; every following line
//! is a [`DemoFrame`].

use std::io::BufRead;
use std::time::Duration;
use tracing::debug;

use super::events::DemoEvent;
use super::game_state::GameState;
use super::header::ReplayHeader;
use super::scripted::DemoFrame;
use crate::common::errors::{EngineError, Result};
use crate::common::traits::DemoDecoder;

/// Streaming decoder over any buffered reader
pub struct JsonLinesDecoder<R> {
    reader: R,
    header: ReplayHeader,
    state: GameState,
    current_time: Duration,
    line: usize,
    buf: String,
}

impl<R: BufRead + Send> JsonLinesDecoder<R> {
    /// Read the header line and prepare to stream frames
    pub fn new(reader: R) -> Result<Self> {
        let mut decoder = Self {
            reader,
            header: ReplayHeader::default(),
            state: GameState::default(),
            current_time: Duration::ZERO,
            line: 0,
            buf: String::new(),
        };

        let header_line = decoder.read_line()?.ok_or_else(|| EngineError::Decode {
            line: 1,
            reason: "missing replay header".to_string(),
        })?;
        decoder.header = serde_json::from_str(&header_line).map_err(|e| EngineError::Decode {
            line: decoder.line,
            reason: format!("invalid header: {}", e),
        })?;

        debug!(map = %decoder.header.map_name, "Replay header decoded");
        Ok(decoder)
    }

    /// Next non-empty line, trimmed
    fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            self.buf.clear();
            let read = self.reader.read_line(&mut self.buf).map_err(|e| EngineError::Decode {
                line: self.line + 1,
                reason: e.to_string(),
            })?;
            if read == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }
}

impl<R: BufRead + Send> DemoDecoder for JsonLinesDecoder<R> {
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
        let Some(line) = self.read_line()? else {
            return Ok(None);
        };

        let frame: DemoFrame = serde_json::from_str(&line).map_err(|e| EngineError::Decode {
            line: self.line,
            reason: e.to_string(),
        })?;

        self.state = frame.state;
        self.current_time = frame.game_time;
        Ok(Some(frame.event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const STREAM: &str = r#"{"map_name": "de_ancient", "playback_ticks": 128}

{"game_time": 2000, "state": {"total_rounds_played": 0, "ingame_tick": 128}, "event": {"type": "round_start"}}
"#;

    #[test]
    fn test_reads_header_and_frames() {
        let mut decoder = JsonLinesDecoder::new(Cursor::new(STREAM)).unwrap();
        assert_eq!(decoder.header().map_name, "de_ancient");

        let event = decoder.next_event().unwrap();
        assert!(matches!(event, Some(DemoEvent::RoundStart { .. })));
        assert_eq!(decoder.game_state().ingame_tick, 128);
        assert_eq!(decoder.current_time(), Duration::from_secs(2));
        assert!(decoder.next_event().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_frame_reports_line() {
        let stream = "{\"map_name\": \"de_ancient\"}\n{\"state\": \n";
        let mut decoder = JsonLinesDecoder::new(Cursor::new(stream)).unwrap();

        match decoder.next_event() {
            Err(EngineError::Decode { line, .. }) => assert_eq!(line, 2),
            other => panic!("Expected decode error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_stream_has_no_header() {
        assert!(JsonLinesDecoder::new(Cursor::new("")).is_err());
    }
}
