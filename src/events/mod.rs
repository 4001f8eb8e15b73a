//! Derived domain events

pub mod factory;
pub mod game_event;
pub mod types;

pub use factory::new_game_event;
pub use game_event::GameEvent;
pub use types::{
    ClutchPayload, EconomyPayload, Entity, EventPayload, EventType, FragPayload,
    MatchStartPayload, RoundEndPayload, RoundMvpPayload, RoundStartPayload, Stat,
    WeaponFirePayload,
};
