//! # tf-optimizer
//!
//! Team formation core: a score over candidate teams, a randomized
//! round-robin initial partition, and a hill-climbing search that swaps
//! members between pairs of teams until it stops finding improvements.

mod partition;
mod score;
mod search;

pub use partition::{initial_partition, team_count};
pub use score::{TeamScore, WeightedScore};
pub use search::{
    accepts, SearchOutcome, SearchState, SearchStats, StopReason, TeamOptimizer,
};
