//! Mutable state tree for one replay

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

use super::battle::{BattleContext, HitRecord};
use super::clutch::{ClutchContext, ClutchStatus};
use super::round_context::{RoundContext, RoundType};
use crate::common::errors::{EngineError, Result};
use crate::common::types::{ResourceOwner, TeamSide};
use crate::config::{EconomyThresholds, MatchRules};
use crate::decoder::{GameState, Player, ReplayHeader};

/// One per parse invocation, owned by the adapter and lent to handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchContext {
    pub match_id: Uuid,
    pub header: ReplayHeader,
    pub resource_owner: ResourceOwner,
    /// Rounds announced by the decoder at match start; 0 until known
    pub max_rounds: usize,
    rounds: BTreeMap<usize, RoundContext>,
    /// Round between its RoundStart and RoundEnd, if any
    #[serde(default)]
    live_round: Option<usize>,
    #[serde(default)]
    last_closed_round: Option<usize>,
    #[serde(skip)]
    rules: MatchRules,
    #[serde(skip)]
    thresholds: EconomyThresholds,
}

impl MatchContext {
    pub fn new(match_id: Uuid, resource_owner: ResourceOwner) -> Self {
        Self::with_rules(
            match_id,
            resource_owner,
            MatchRules::default(),
            EconomyThresholds::default(),
        )
    }

    pub fn with_rules(
        match_id: Uuid,
        resource_owner: ResourceOwner,
        rules: MatchRules,
        thresholds: EconomyThresholds,
    ) -> Self {
        Self {
            match_id,
            header: ReplayHeader::default(),
            resource_owner,
            max_rounds: 0,
            rounds: BTreeMap::new(),
            live_round: None,
            last_closed_round: None,
            rules,
            thresholds,
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn thresholds(&self) -> &EconomyThresholds {
        &self.thresholds
    }

    pub fn set_header(&mut self, header: ReplayHeader) {
        self.header = header;
    }

    /// Record the announced round count and re-mark round types accordingly
    pub fn set_max_rounds(&mut self, max_rounds: usize) {
        self.max_rounds = max_rounds;
        let types: Vec<(usize, RoundType)> = self
            .rounds
            .keys()
            .map(|index| (*index, self.round_type_for(index + 1)))
            .collect();
        for (index, round_type) in types {
            if let Some(round) = self.rounds.get_mut(&index) {
                round.round_type = round_type;
            }
        }
    }

    fn round_type_for(&self, round_number: usize) -> RoundType {
        if self.rules.is_pistol_round(round_number) {
            RoundType::Pistol
        } else if self.max_rounds > 0 && round_number == self.max_rounds {
            RoundType::Last
        } else {
            RoundType::Normal
        }
    }

    /// Idempotent upsert of the round at `round_index`.
    ///
    /// An existing context is returned untouched even if the roster changed
    /// since it was opened. Indices the decoder skipped are back-filled with
    /// empty contexts.
    pub fn ensure_round(&mut self, round_index: usize, state: &GameState) -> &mut RoundContext {
        if !self.rounds.contains_key(&round_index) {
            for gap in 0..round_index {
                if !self.rounds.contains_key(&gap) {
                    debug!(round_index = gap, "Back-filling skipped round");
                    let round = RoundContext::empty(gap + 1, self.round_type_for(gap + 1));
                    self.rounds.insert(gap, round);
                }
            }

            let round_number = round_index + 1;
            let round = RoundContext::open(
                round_number,
                self.round_type_for(round_number),
                state,
                &self.resource_owner,
                &self.thresholds,
            );
            debug!(round_number, teams = round.teams.len(), "Opened round context");
            self.rounds.insert(round_index, round);
        }

        self.rounds
            .entry(round_index)
            .or_insert_with(|| RoundContext::empty(round_index + 1, RoundType::Normal))
    }

    /// Open the round at `round_index` as live.
    ///
    /// The first start of a round re-derives the side-to-team mapping from
    /// `state`, so a context created early by a stray event (or carried over
    /// a halftime swap) ends up with the rosters that actually play it.
    pub fn start_round(&mut self, round_index: usize, state: &GameState) -> &mut RoundContext {
        self.live_round = Some(round_index);
        let owner = self.resource_owner;
        let thresholds = self.thresholds.clone();

        let round = self.ensure_round(round_index, state);
        if !round.started {
            round.assign_teams(state, &owner, &thresholds);
            round.clutch = ClutchContext::new(round.round_number);
            round.battle = BattleContext::new();
            round.started = true;
        }
        round
    }

    /// Close play; events until the next start belong to `round_index`
    pub fn end_round(&mut self, round_index: usize) {
        self.live_round = None;
        self.last_closed_round = Some(round_index);
    }

    pub fn live_round(&self) -> Option<usize> {
        self.live_round
    }

    /// Round that owns in-play events: the live one, else the one that
    /// just closed
    pub fn play_round(&self) -> Option<usize> {
        self.live_round.or(self.last_closed_round)
    }

    pub fn round(&self, round_index: usize) -> Result<&RoundContext> {
        self.rounds
            .get(&round_index)
            .ok_or(EngineError::RoundNotFound { round_index })
    }

    pub fn round_mut(&mut self, round_index: usize) -> Result<&mut RoundContext> {
        self.rounds
            .get_mut(&round_index)
            .ok_or(EngineError::RoundNotFound { round_index })
    }

    /// Round contexts in index order
    pub fn rounds(&self) -> impl Iterator<Item = (usize, &RoundContext)> {
        self.rounds.iter().map(|(index, round)| (*index, round))
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn refresh_economy(&mut self, round_index: usize, state: &GameState) -> Result<()> {
        let thresholds = self.thresholds.clone();
        self.round_mut(round_index)?
            .refresh_economy(state, &thresholds);
        Ok(())
    }

    pub fn in_clutch(&self, round_index: usize) -> bool {
        self.rounds
            .get(&round_index)
            .map(|round| round.clutch.in_clutch())
            .unwrap_or(false)
    }

    /// Start tracking a clutch if the state shows one and none exists yet
    pub fn begin_clutch(&mut self, round_index: usize, state: &GameState) -> Result<bool> {
        let rules = self.rules.clone();
        let round = self.round_mut(round_index)?;
        if round.clutch.in_clutch() {
            return Ok(false);
        }

        match ClutchContext::detect(state, &rules) {
            Some((player, opponents)) => Ok(round.clutch.initiate(player, opponents)),
            None => Ok(false),
        }
    }

    /// Advance an active clutch on a kill by the clutch player
    pub fn progress_clutch(
        &mut self,
        round_index: usize,
        killer: &Player,
        victim: &Player,
        state: &GameState,
    ) -> Result<bool> {
        let round = self.round_mut(round_index)?;
        let alive_opponents = killer
            .side
            .opponent()
            .map(|side| state.alive_on(side).into_iter().cloned().collect())
            .unwrap_or_default();

        Ok(round.clutch.progress(killer, victim, alive_opponents))
    }

    /// Close an active clutch once the round winner is known
    pub fn resolve_clutch(&mut self, round_index: usize, winner: TeamSide) -> Result<Option<ClutchStatus>> {
        Ok(self.round_mut(round_index)?.clutch.resolve(winner))
    }

    pub fn record_damage(&mut self, round_index: usize, record: HitRecord) -> Result<()> {
        self.round_mut(round_index)?.battle.record_damage(record);
        Ok(())
    }

    pub fn record_kill(&mut self, round_index: usize, record: HitRecord) -> Result<()> {
        self.round_mut(round_index)?.battle.record_kill(record);
        Ok(())
    }
}
