//! Common test utilities and fixtures

#![allow(dead_code)]

use replay_analytics::common::types::{TeamSide, TickId, UserId, Vector3};
use replay_analytics::decoder::{
    DemoEvent, DemoFrame, Equipment, EquipmentClass, GameState, MvpReason, Player, ReplayHeader,
    RoundEndReason, ScriptedDecoder, TeamState,
};
use replay_analytics::{
    create_event_channel_with_size, drain_events, EngineConfig, GameEvent, InMemorySink,
    ParseSummary, ReplayAdapter, RequestContext, ResourceOwner, Result,
};
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

pub const MAP: &str = "de_inferno";
pub const TICK_RATE: TickId = 64;

/// Counter-terrorist user ids of the starting lineup
pub const CT_IDS: [UserId; 5] = [1, 2, 3, 4, 5];
/// Terrorist user ids of the starting lineup
pub const T_IDS: [UserId; 5] = [11, 12, 13, 14, 15];

pub fn header() -> ReplayHeader {
    ReplayHeader {
        filestamp: "PBDEMS2".to_string(),
        server_name: "Test Server".to_string(),
        client_name: "GOTV Demo".to_string(),
        playback_ticks: 128_000,
        playback_frames: 64_000,
        playback_time: Duration::from_secs(2000),
        ..ReplayHeader::new(MAP)
    }
}

pub fn owner() -> ResourceOwner {
    ResourceOwner::new(
        Uuid::parse_str("8a0c7e0e-2d5a-4f3e-9c1b-1f2e3d4c5b6a").unwrap(),
        Uuid::parse_str("0f1e2d3c-4b5a-4968-8776-655443322110").unwrap(),
    )
}

pub fn request() -> RequestContext {
    RequestContext::new(owner())
}

/// Fully bought player: rifle, pistol, one grenade, kevlar and helmet
pub fn player(user_id: UserId, side: TeamSide) -> Player {
    Player {
        user_id,
        steam_id64: 76561198000000000 + user_id as u64,
        name: format!("player{user_id}"),
        clan_tag: match side {
            TeamSide::CounterTerrorists => "NAVI".to_string(),
            _ => "FAZE".to_string(),
        },
        side,
        is_connected: true,
        is_alive: true,
        health: 100,
        armor: 100,
        has_helmet: true,
        money: 1200,
        equipment_value: 4700,
        inventory: vec![
            Equipment::new("AK-47", EquipmentClass::Rifle, 2700),
            Equipment::new("Glock-18", EquipmentClass::Pistol, 200),
            Equipment::new("Smoke Grenade", EquipmentClass::Grenade, 300),
        ],
        kills: 0,
        deaths: 0,
        assists: 0,
        total_damage: 0,
        last_alive_position: Vector3::default(),
    }
}

pub fn lobby() -> GameState {
    let participants = CT_IDS
        .iter()
        .map(|id| player(*id, TeamSide::CounterTerrorists))
        .chain(T_IDS.iter().map(|id| player(*id, TeamSide::Terrorists)))
        .collect();

    GameState {
        total_rounds_played: 0,
        ingame_tick: 0,
        is_freezetime: true,
        team_ct: TeamState {
            id: 2,
            clan_name: "NAVI".to_string(),
            score: 0,
        },
        team_t: TeamState {
            id: 3,
            clan_name: "FAZE".to_string(),
            score: 0,
        },
        participants,
    }
}

/// Builds a frame sequence while keeping the game state consistent
pub struct ReplayScript {
    state: GameState,
    frames: Vec<DemoFrame>,
}

impl Default for ReplayScript {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplayScript {
    pub fn new() -> Self {
        Self {
            state: lobby(),
            frames: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn player_mut(&mut self, user_id: UserId) -> &mut Player {
        self.state
            .participants
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .unwrap_or_else(|| panic!("no player {user_id} in lobby"))
    }

    /// Snapshot the current state together with `event`
    pub fn push(&mut self, event: DemoEvent) -> &mut Self {
        self.state.ingame_tick += TICK_RATE;
        let game_time = Duration::from_secs((self.state.ingame_tick / TICK_RATE) as u64);
        self.frames
            .push(DemoFrame::new(self.state.clone(), event).at(game_time));
        self
    }

    pub fn match_start(&mut self, max_rounds: usize) -> &mut Self {
        self.push(DemoEvent::MatchStart { max_rounds })
    }

    pub fn round_start(&mut self) -> &mut Self {
        for p in self.state.participants.iter_mut() {
            p.is_alive = true;
            p.health = 100;
        }
        self.state.is_freezetime = true;
        self.push(DemoEvent::RoundStart { time_limit_secs: 115 })
    }

    pub fn freezetime_end(&mut self) -> &mut Self {
        self.state.is_freezetime = false;
        self.push(DemoEvent::RoundFreezetimeEnd)
    }

    pub fn hurt(&mut self, attacker: UserId, victim: UserId, damage: u32) -> &mut Self {
        let target = self.player_mut(victim);
        target.health = (target.health - damage as i32).max(0);
        self.player_mut(attacker).total_damage += damage;
        self.push(DemoEvent::PlayerHurt {
            attacker: Some(attacker),
            victim,
            health_damage: damage,
            armor_damage: 0,
            hit_group: replay_analytics::decoder::HitGroup::Chest,
            weapon: "ak47".to_string(),
        })
    }

    pub fn kill(&mut self, killer: UserId, victim: UserId) -> &mut Self {
        {
            let target = self.player_mut(victim);
            target.is_alive = false;
            target.health = 0;
            target.deaths += 1;
        }
        self.player_mut(killer).kills += 1;
        self.push(DemoEvent::Kill {
            killer: Some(killer),
            victim: Some(victim),
            assister: None,
            weapon: "ak47".to_string(),
            is_headshot: false,
        })
    }

    /// Death without a killer (fall damage, bomb)
    pub fn world_kill(&mut self, victim: UserId) -> &mut Self {
        {
            let target = self.player_mut(victim);
            target.is_alive = false;
            target.health = 0;
            target.deaths += 1;
        }
        self.push(DemoEvent::Kill {
            killer: None,
            victim: Some(victim),
            assister: None,
            weapon: "world".to_string(),
            is_headshot: false,
        })
    }

    pub fn weapon_fire(&mut self, shooter: UserId) -> &mut Self {
        self.push(DemoEvent::WeaponFire {
            shooter,
            weapon: "ak47".to_string(),
        })
    }

    pub fn generic(&mut self, name: &str) -> &mut Self {
        self.push(DemoEvent::Generic {
            name: name.to_string(),
            data: BTreeMap::new(),
        })
    }

    pub fn mvp(&mut self, player: UserId, reason: MvpReason) -> &mut Self {
        self.push(DemoEvent::RoundMvpAnnouncement { player, reason })
    }

    /// Emit the round end, then move the round counter forward
    pub fn round_end(&mut self, winner: TeamSide, reason: RoundEndReason) -> &mut Self {
        match winner {
            TeamSide::CounterTerrorists => self.state.team_ct.score += 1,
            TeamSide::Terrorists => self.state.team_t.score += 1,
            _ => {}
        }
        self.push(DemoEvent::RoundEnd { winner, reason });
        self.state.total_rounds_played += 1;
        self
    }

    pub fn frames(&self) -> Vec<DemoFrame> {
        self.frames.clone()
    }

    pub fn decoder(&self) -> ScriptedDecoder {
        ScriptedDecoder::new(header(), self.frames())
    }

    /// Header line followed by one frame per line
    pub fn to_json_lines(&self) -> String {
        let mut out = serde_json::to_string(&header()).unwrap();
        out.push('\n');
        for frame in &self.frames {
            out.push_str(&serde_json::to_string(frame).unwrap());
            out.push('\n');
        }
        out
    }
}

/// Two-round match: round 1 ends 3v3 on time, round 2 has CT's last
/// player in a 1v3 that ends with the bomb exploding.
pub fn two_round_clutch_match() -> ReplayScript {
    let mut script = ReplayScript::new();
    script.match_start(2);

    script
        .round_start()
        .freezetime_end()
        .kill(1, 11)
        .kill(12, 2)
        .kill(13, 3)
        .kill(4, 14)
        .round_end(TeamSide::CounterTerrorists, RoundEndReason::TargetSaved);

    script
        .round_start()
        .freezetime_end()
        .kill(1, 15)
        .kill(11, 2)
        .kill(5, 14)
        .kill(12, 3)
        .kill(13, 4)
        .kill(11, 5) // 1v3
        .kill(1, 13) // 1v2
        .round_end(TeamSide::Terrorists, RoundEndReason::TargetBombed);

    script
}

/// Run a decoder through the adapter with an in-memory consumer
pub async fn run_adapter<D>(
    config: EngineConfig,
    request: RequestContext,
    decoder: D,
) -> (Result<ParseSummary>, Vec<GameEvent>)
where
    D: replay_analytics::DemoDecoder + 'static,
{
    let (tx, rx) = create_event_channel_with_size(config.pipeline.channel_size);
    let consumer = tokio::spawn(async move {
        let mut sink = InMemorySink::new();
        drain_events(rx, &mut sink).await.map(|_| sink.into_events())
    });

    let adapter = ReplayAdapter::new(config);
    let result = adapter.parse(&request, Uuid::new_v4(), decoder, tx).await;
    let events = consumer.await.unwrap().unwrap();
    (result, events)
}
