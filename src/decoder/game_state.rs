//! Live game-state view exposed by the decoder

use serde::{Deserialize, Serialize};

use crate::common::types::{TeamSide, TickId, UserId, Vector3};

/// Equipment class as reported by the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentClass {
    Unknown,
    Pistol,
    Smg,
    Heavy,
    Rifle,
    Equipment,
    Grenade,
}

/// A single inventory item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    /// Item name, e.g. "AK-47" or "Flashbang"
    pub name: String,
    pub class: EquipmentClass,
    /// Purchase price in game currency
    #[serde(default)]
    pub price: u32,
}

impl Equipment {
    pub fn new(name: impl Into<String>, class: EquipmentClass, price: u32) -> Self {
        Self {
            name: name.into(),
            class,
            price,
        }
    }

    /// Rifles and SMGs count as primaries for economy purposes
    pub fn is_primary(&self) -> bool {
        matches!(self.class, EquipmentClass::Rifle | EquipmentClass::Smg)
    }

    pub fn is_utility(&self) -> bool {
        self.class == EquipmentClass::Grenade
    }
}

/// Player as currently known to the decoder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub user_id: UserId,
    /// 64-bit network id; 0 for bots
    #[serde(default)]
    pub steam_id64: u64,
    pub name: String,
    #[serde(default)]
    pub clan_tag: String,
    pub side: TeamSide,
    #[serde(default = "default_true")]
    pub is_connected: bool,
    pub is_alive: bool,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub has_helmet: bool,
    #[serde(default)]
    pub money: i32,
    /// Current value of everything the player carries
    #[serde(default)]
    pub equipment_value: u32,
    #[serde(default)]
    pub inventory: Vec<Equipment>,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub total_damage: u32,
    #[serde(default)]
    pub last_alive_position: Vector3,
}

fn default_true() -> bool {
    true
}

impl Player {
    /// Numeric identity used for roster hashing; bots fall back to their user id,
    /// and a negative user id maps to 0
    pub fn network_id(&self) -> u64 {
        if self.steam_id64 != 0 {
            self.steam_id64
        } else {
            u64::try_from(self.user_id).unwrap_or(0)
        }
    }

    /// Network id rendered the way downstream consumers key players
    pub fn network_player_id(&self) -> String {
        self.network_id().to_string()
    }

    pub fn is_playing(&self) -> bool {
        self.is_connected && self.side.is_playing()
    }
}

/// Team state as reported by the decoder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamState {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub clan_name: String,
    #[serde(default)]
    pub score: u32,
}

/// Snapshot of the decoder's game state after the event it accompanies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Rounds completed so far; also the zero-based index of the running round
    pub total_rounds_played: usize,
    pub ingame_tick: TickId,
    #[serde(default)]
    pub is_freezetime: bool,
    #[serde(default)]
    pub team_ct: TeamState,
    #[serde(default)]
    pub team_t: TeamState,
    #[serde(default)]
    pub participants: Vec<Player>,
}

impl GameState {
    /// Every known participant, including spectators and disconnected players
    pub fn all(&self) -> &[Player] {
        &self.participants
    }

    /// Connected players on one of the two playing sides
    pub fn playing(&self) -> impl Iterator<Item = &Player> {
        self.participants.iter().filter(|p| p.is_playing())
    }

    pub fn playing_on(&self, side: TeamSide) -> Vec<&Player> {
        self.playing().filter(|p| p.side == side).collect()
    }

    pub fn alive_on(&self, side: TeamSide) -> Vec<&Player> {
        self.playing()
            .filter(|p| p.side == side && p.is_alive)
            .collect()
    }

    pub fn find(&self, user_id: UserId) -> Option<&Player> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }
}
