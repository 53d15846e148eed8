//! Hill-climbing search over team partitions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tf_types::{FormationConfig, ParticipantRequest, Team};
use tracing::{debug, info, trace};

use crate::partition::initial_partition;
use crate::score::{TeamScore, WeightedScore};

/// Where the search is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchState {
    Searching,
    Converged,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Fewer than two teams, nothing to swap.
    Bypassed,
    /// The stall budget of consecutive rejections was used up.
    Stalled,
    /// The configured wall-clock cap elapsed first.
    DeadlineReached,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub proposals: u64,
    pub accepted: u64,
    pub stall_limit: u64,
    pub state: SearchState,
    pub stop_reason: StopReason,
    pub elapsed_ms: u64,
}

/// Final partition plus per-team scores, index-aligned with `teams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub teams: Vec<Team>,
    pub scores: Vec<f64>,
    /// Scores of the round-robin partition before any swap.
    pub initial_scores: Vec<f64>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn total_score(&self) -> f64 {
        self.scores.iter().sum()
    }
}

/// A swap is kept when neither team gets worse and at least one improves.
pub fn accepts(current: (f64, f64), candidate: (f64, f64)) -> bool {
    let (old1, old2) = current;
    let (new1, new2) = candidate;
    new1 >= old1 && new2 >= old2 && (new1 > old1 || new2 > old2)
}

/// Partitions a roster into teams by randomized pairwise swaps.
#[derive(Debug, Clone)]
pub struct TeamOptimizer<S = WeightedScore> {
    scorer: S,
    config: FormationConfig,
}

impl TeamOptimizer<WeightedScore> {
    /// Optimizer using the default score over the configured speciality tags.
    pub fn from_config(config: &FormationConfig) -> Self {
        Self::with_scorer(WeightedScore::new(config.specialities.clone()), config)
    }
}

impl<S: TeamScore> TeamOptimizer<S> {
    pub fn with_scorer(scorer: S, config: &FormationConfig) -> Self {
        Self {
            scorer,
            config: config.clone(),
        }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn team_size(&self) -> usize {
        self.config.team_size.max(1)
    }

    /// Runs the search with a ChaCha stream seeded from `seed`.
    pub fn optimize_seeded(&self, roster: &[ParticipantRequest], seed: u64) -> SearchOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.optimize(roster, &mut rng)
    }

    /// Partitions `roster` and hill-climbs until the stall budget runs out.
    ///
    /// The roster is copied up front; the caller's records are never touched.
    /// Usernames must be unique, which is not checked here.
    pub fn optimize<R>(&self, roster: &[ParticipantRequest], rng: &mut R) -> SearchOutcome
    where
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let roster: Vec<ParticipantRequest> = roster.to_vec();

        let team_size = self.team_size();
        let mut teams = initial_partition(roster.len(), team_size, rng);
        let mut scores: Vec<f64> = teams.iter().map(|t| self.score_slots(&roster, t)).collect();
        let initial_scores = scores.clone();

        let num_teams = teams.len();
        let stall_limit = self.config.stall_limit(num_teams);
        let mut stats = SearchStats {
            proposals: 0,
            accepted: 0,
            stall_limit,
            state: SearchState::Searching,
            stop_reason: StopReason::Stalled,
            elapsed_ms: 0,
        };

        if num_teams < 2 {
            debug!(participants = roster.len(), teams = num_teams, "roster fits one team, skipping search");
            stats.state = SearchState::Converged;
            stats.stop_reason = StopReason::Bypassed;
            return self.finish(roster, teams, scores, initial_scores, stats, started);
        }

        info!(
            participants = roster.len(),
            teams = num_teams,
            team_size,
            stall_limit,
            "starting team search"
        );

        let deadline = self.config.max_duration().map(|d| started + d);
        let mut stalled: u64 = 0;
        let mut candidate1: Vec<usize> = Vec::new();
        let mut candidate2: Vec<usize> = Vec::new();

        while stalled < stall_limit {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stats.stop_reason = StopReason::DeadlineReached;
                break;
            }
            stats.proposals += 1;

            let (t1, t2) = pick_two(num_teams, rng);
            candidate1.clone_from(&teams[t1]);
            candidate2.clone_from(&teams[t2]);

            let rounds = rng.random_range(0..team_size);
            for _ in 0..rounds {
                let p1 = rng.random_range(0..candidate1.len());
                let p2 = rng.random_range(0..candidate2.len());
                std::mem::swap(&mut candidate1[p1], &mut candidate2[p2]);
            }

            let score1 = self.score_slots(&roster, &candidate1);
            let score2 = self.score_slots(&roster, &candidate2);

            if accepts((scores[t1], scores[t2]), (score1, score2)) {
                trace!(
                    team1 = t1,
                    team2 = t2,
                    from = ?(scores[t1], scores[t2]),
                    to = ?(score1, score2),
                    "accepted swap"
                );
                std::mem::swap(&mut teams[t1], &mut candidate1);
                std::mem::swap(&mut teams[t2], &mut candidate2);
                scores[t1] = score1;
                scores[t2] = score2;
                stats.accepted += 1;
                stalled = 0;
            } else {
                stalled += 1;
            }
        }

        stats.state = SearchState::Converged;
        self.finish(roster, teams, scores, initial_scores, stats, started)
    }

    fn score_slots(&self, roster: &[ParticipantRequest], slots: &[usize]) -> f64 {
        let members: Vec<&ParticipantRequest> = slots.iter().map(|&i| &roster[i]).collect();
        self.scorer.score(&members)
    }

    fn finish(
        &self,
        roster: Vec<ParticipantRequest>,
        teams: Vec<Vec<usize>>,
        scores: Vec<f64>,
        initial_scores: Vec<f64>,
        mut stats: SearchStats,
        started: Instant,
    ) -> SearchOutcome {
        stats.elapsed_ms = started.elapsed().as_millis().min(u64::MAX as u128) as u64;

        let mut slots: Vec<Option<ParticipantRequest>> = roster.into_iter().map(Some).collect();
        let teams: Vec<Team> = teams
            .iter()
            .map(|members| Team::new(members.iter().filter_map(|&i| slots[i].take()).collect()))
            .collect();

        if stats.stop_reason != StopReason::Bypassed {
            info!(
                teams = teams.len(),
                proposals = stats.proposals,
                accepted = stats.accepted,
                stop_reason = ?stats.stop_reason,
                elapsed_ms = stats.elapsed_ms,
                total_score = scores.iter().sum::<f64>(),
                "team search finished"
            );
        }

        SearchOutcome {
            teams,
            scores,
            initial_scores,
            stats,
        }
    }
}

/// Two distinct indices in `0..n`, uniformly. `n` must be at least 2.
fn pick_two<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let first = rng.random_range(0..n);
    let mut second = rng.random_range(0..n - 1);
    if second >= first {
        second += 1;
    }
    (first, second)
}
