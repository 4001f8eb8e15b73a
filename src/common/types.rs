//! Shared identifier and value types used across the engine

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// In-game tick reported by the decoder
pub type TickId = i64;

/// Decoder-local user id used by raw events to reference players
pub type UserId = i32;

/// Side a player or team is currently playing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Unassigned,
    Spectators,
    Terrorists,
    CounterTerrorists,
}

impl TeamSide {
    /// True for the two playing sides
    pub fn is_playing(&self) -> bool {
        matches!(self, TeamSide::Terrorists | TeamSide::CounterTerrorists)
    }

    /// The opposing playing side, if any
    pub fn opponent(&self) -> Option<TeamSide> {
        match self {
            TeamSide::Terrorists => Some(TeamSide::CounterTerrorists),
            TeamSide::CounterTerrorists => Some(TeamSide::Terrorists),
            _ => None,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Unassigned => write!(f, "unassigned"),
            TeamSide::Spectators => write!(f, "spectators"),
            TeamSide::Terrorists => write!(f, "T"),
            TeamSide::CounterTerrorists => write!(f, "CT"),
        }
    }
}

/// Deterministic roster identifier, stable across side swaps
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamHashId(String);

impl TeamHashId {
    /// Derive the id from the numeric ids of a roster.
    ///
    /// Ids are sorted before hashing so the result does not depend on
    /// roster order, and each id is fed as fixed-width bytes so that
    /// `[1, 23]` and `[12, 3]` cannot collide.
    pub fn from_player_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut sorted: Vec<u64> = ids.into_iter().collect();
        sorted.sort_unstable();

        let mut hasher = Sha256::new();
        for id in &sorted {
            hasher.update(id.to_be_bytes());
        }

        TeamHashId(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeamHashId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tenant/client/group/user tuple attached to every emitted entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceOwner {
    pub tenant_id: Uuid,
    pub client_id: Uuid,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl ResourceOwner {
    pub fn new(tenant_id: Uuid, client_id: Uuid) -> Self {
        Self {
            tenant_id,
            client_id,
            group_id: None,
            user_id: None,
        }
    }

    pub fn with_group(mut self, group_id: Uuid) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Kind of entity attached to an event envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    PlayerMetadata,
}

/// Kind of statistic attached to an event envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Battle,
}

/// World position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Shared cancellation signal checked by the decode loop
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Caller-side request data resolved once per parse invocation
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub resource_owner: ResourceOwner,
    pub cancellation: CancellationFlag,
}

impl RequestContext {
    pub fn new(resource_owner: ResourceOwner) -> Self {
        Self {
            resource_owner,
            cancellation: CancellationFlag::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationFlag) -> Self {
        self.cancellation = cancellation;
        self
    }
}
