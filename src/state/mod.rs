//! Match state reconstruction
//!
//! The tree is `MatchContext` → `RoundContext` (by zero-based index) →
//! `TeamContext`/`ClutchContext`/`BattleContext`. Handlers mutate it in place
//! through a single `&mut MatchContext`.

pub mod battle;
pub mod clutch;
pub mod economy;
pub mod match_context;
pub mod round_context;
pub mod team_context;

pub use battle::{BattleContext, BattleStats, HitRecord, HitStage, PlayerBattleStats};
pub use clutch::{ClutchContext, ClutchSituation, ClutchStatus};
pub use economy::{determine_buy_type, EconomyContext, EconomyMetrics, EconomyState};
pub use match_context::MatchContext;
pub use round_context::{PlayerMetadata, RoundContext, RoundType};
pub use team_context::TeamContext;
