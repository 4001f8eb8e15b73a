//! Per-round hit log and the battle statistics folded from it

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::common::errors::{EngineError, Result};
use crate::common::types::{TeamSide, TickId, UserId};
use crate::decoder::HitGroup;

/// Whether a hit only did damage or killed the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitStage {
    Damage,
    Fatal,
}

/// One entry in the hit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitRecord {
    pub tick: TickId,
    pub stage: HitStage,
    /// Absent for world damage (falls, bomb, suicide)
    pub source: Option<UserId>,
    pub source_side: Option<TeamSide>,
    pub target: UserId,
    pub target_side: TeamSide,
    #[serde(default)]
    pub health_damage: u32,
    #[serde(default)]
    pub armor_damage: u32,
    #[serde(default)]
    pub hit_group: Option<HitGroup>,
    #[serde(default)]
    pub weapon: String,
    #[serde(default)]
    pub assister: Option<UserId>,
    #[serde(default)]
    pub is_headshot: bool,
}

impl HitRecord {
    /// Source and target played on opposite sides
    pub fn is_cross_team(&self) -> bool {
        match (self.source, self.source_side) {
            (Some(source), Some(side)) => source != self.target && side != self.target_side,
            _ => false,
        }
    }
}

/// Hit log of one round, keyed by tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleContext {
    hits: BTreeMap<TickId, Vec<HitRecord>>,
    kill_count: usize,
}

/// Battle figures for one player in one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBattleStats {
    pub user_id: UserId,
    pub side: TeamSide,
    pub frags: u32,
    pub deaths: u32,
    pub assists: u32,
    pub headshot_frags: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub hits: u32,
    pub entry_frag: bool,
    pub entry_death: bool,
    pub trade_frags: u32,
    pub traded_deaths: u32,
    pub survived: bool,
    /// Kill, assist, survived or traded
    pub kast: bool,
    /// (frags + assists) / max(deaths, 1)
    pub kda: Decimal,
}

impl PlayerBattleStats {
    fn new(user_id: UserId, side: TeamSide) -> Self {
        Self {
            user_id,
            side,
            frags: 0,
            deaths: 0,
            assists: 0,
            headshot_frags: 0,
            damage_dealt: 0,
            damage_taken: 0,
            hits: 0,
            entry_frag: false,
            entry_death: false,
            trade_frags: 0,
            traded_deaths: 0,
            survived: true,
            kast: false,
            kda: Decimal::ZERO,
        }
    }
}

/// Battle statistics for one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleStats {
    pub round_number: usize,
    pub kill_count: usize,
    pub players: Vec<PlayerBattleStats>,
}

impl BattleStats {
    pub fn player(&self, user_id: UserId) -> Option<&PlayerBattleStats> {
        self.players.iter().find(|p| p.user_id == user_id)
    }

    pub fn total_frags(&self) -> u32 {
        self.players.iter().map(|p| p.frags).sum()
    }
}

struct Elimination {
    tick: TickId,
    killer: UserId,
    victim: UserId,
    victim_side: TeamSide,
}

impl BattleContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the log without touching the kill tally
    pub fn insert(&mut self, record: HitRecord) {
        self.hits.entry(record.tick).or_default().push(record);
    }

    pub fn record_damage(&mut self, mut record: HitRecord) {
        record.stage = HitStage::Damage;
        self.insert(record);
    }

    pub fn record_kill(&mut self, mut record: HitRecord) {
        record.stage = HitStage::Fatal;
        self.kill_count += 1;
        self.insert(record);
    }

    pub fn hits_at(&self, tick: TickId) -> &[HitRecord] {
        self.hits.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn records(&self) -> impl Iterator<Item = &HitRecord> {
        self.hits.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn kill_count(&self) -> usize {
        self.kill_count
    }

    /// Fold the hit log into per-player statistics.
    ///
    /// `roster` seeds every playing participant so players without any hit
    /// still appear; players found only in the log are added as they come.
    pub fn statistics<I>(
        &self,
        round_number: usize,
        roster: I,
        trade_window_ticks: TickId,
    ) -> Result<BattleStats>
    where
        I: IntoIterator<Item = (UserId, TeamSide)>,
    {
        let mut players: BTreeMap<UserId, PlayerBattleStats> = roster
            .into_iter()
            .map(|(id, side)| (id, PlayerBattleStats::new(id, side)))
            .collect();

        let mut eliminations: Vec<Elimination> = Vec::new();
        let mut traded: BTreeSet<usize> = BTreeSet::new();
        let mut entry_taken = false;

        for record in self.records() {
            players
                .entry(record.target)
                .or_insert_with(|| PlayerBattleStats::new(record.target, record.target_side));
            if let (Some(source), Some(side)) = (record.source, record.source_side) {
                players
                    .entry(source)
                    .or_insert_with(|| PlayerBattleStats::new(source, side));
            }

            match record.stage {
                HitStage::Damage => {
                    if let Some(target) = players.get_mut(&record.target) {
                        target.damage_taken += record.health_damage;
                    }
                    if record.is_cross_team() {
                        if let Some(source) = record.source.and_then(|id| players.get_mut(&id)) {
                            source.damage_dealt += record.health_damage;
                            source.hits += 1;
                        }
                    }
                }
                HitStage::Fatal => {
                    if let Some(target) = players.get_mut(&record.target) {
                        target.deaths += 1;
                        target.survived = false;
                    }

                    if let Some(assister) = record.assister.filter(|a| Some(*a) != record.source) {
                        if let Some(stats) = players.get_mut(&assister) {
                            stats.assists += 1;
                        }
                    }

                    let (Some(killer), Some(killer_side)) = (record.source, record.source_side) else {
                        continue;
                    };
                    if !record.is_cross_team() {
                        continue;
                    }

                    // revenge for a teammate of the killer, killed by this victim
                    let revenge = eliminations.iter().enumerate().rev().find(|(i, e)| {
                        !traded.contains(i)
                            && e.killer == record.target
                            && e.victim_side == killer_side
                            && record.tick - e.tick <= trade_window_ticks
                    });
                    if let Some((index, avenged)) = revenge {
                        traded.insert(index);
                        let avenged_victim = avenged.victim;
                        if let Some(stats) = players.get_mut(&killer) {
                            stats.trade_frags += 1;
                        }
                        if let Some(stats) = players.get_mut(&avenged_victim) {
                            stats.traded_deaths += 1;
                        }
                    }

                    if let Some(stats) = players.get_mut(&killer) {
                        stats.frags += 1;
                        if record.is_headshot {
                            stats.headshot_frags += 1;
                        }
                        if !entry_taken {
                            stats.entry_frag = true;
                        }
                    }
                    if !entry_taken {
                        if let Some(stats) = players.get_mut(&record.target) {
                            stats.entry_death = true;
                        }
                        entry_taken = true;
                    }

                    eliminations.push(Elimination {
                        tick: record.tick,
                        killer,
                        victim: record.target,
                        victim_side: record.target_side,
                    });
                }
            }
        }

        let frags: u32 = players.values().map(|p| p.frags).sum();
        if frags as usize > self.kill_count {
            return Err(EngineError::InconsistentBattleLog {
                round_number,
                frags: frags as usize,
                kills: self.kill_count,
            });
        }

        let players = players
            .into_values()
            .map(|mut p| {
                p.kast = p.frags > 0 || p.assists > 0 || p.survived || p.traded_deaths > 0;
                p.kda = Decimal::from(p.frags + p.assists) / Decimal::from(p.deaths.max(1));
                p
            })
            .collect();

        Ok(BattleStats {
            round_number,
            kill_count: self.kill_count,
            players,
        })
    }
}
