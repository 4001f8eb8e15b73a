//! Match statistics

pub mod builder;
pub mod entities;

pub use builder::MatchStatsBuilder;
pub use entities::{
    calculate_adr, calculate_kdr, ClutchStats, MatchStats, PlayerStats,
    RoundStats, TeamEconomyStats,
};
