//! Replay file header

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header information parsed from the start of a replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayHeader {
    #[serde(default)]
    pub filestamp: String,
    pub map_name: String,
    #[serde(default)]
    pub server_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub playback_ticks: i64,
    #[serde(default)]
    pub playback_frames: i64,
    #[serde(default, with = "duration_ms")]
    pub playback_time: Duration,
}

impl ReplayHeader {
    pub fn new(map_name: impl Into<String>) -> Self {
        Self {
            map_name: map_name.into(),
            ..Default::default()
        }
    }
}

/// Serialize durations as integer milliseconds
pub(crate) mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
