//! Decoder boundary - raw events, live game state and stream readers

pub mod events;
pub mod game_state;
pub mod header;
pub mod jsonl;
pub mod scripted;

pub use events::{DemoEvent, DemoEventKind, HitGroup, MvpReason, RoundEndReason};
pub use game_state::{Equipment, EquipmentClass, GameState, Player, TeamState};
pub use header::ReplayHeader;
pub use jsonl::JsonLinesDecoder;
pub use scripted::{DemoFrame, ScriptedDecoder};
