// Formation engine: validates a request, runs the search off the async
// runtime and merges locked teams back into the result

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tf_optimizer::{SearchStats, TeamOptimizer, TeamScore, WeightedScore};
use tf_types::{FormationConfig, FormationError, MemberSummary, Team, TfResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::gate::RunGate;
use crate::roster::FormationRequest;

/// Unique formation run identifier
pub type RunId = Uuid;

/// One team in a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormedTeam {
    pub index: usize,
    /// Pre-confirmed team that bypassed optimization.
    pub locked: bool,
    pub score: f64,
    pub members: Vec<MemberSummary>,
}

impl FormedTeam {
    pub fn usernames(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.iter().map(|m| m.username.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Result of a formation run: optimized teams first, locked teams after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormationResult {
    pub run_id: RunId,
    /// Seed the search ran with; reuse it to reproduce the run.
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub teams: Vec<FormedTeam>,
    pub stats: SearchStats,
}

impl FormationResult {
    pub fn team_of(&self, username: &str) -> Option<&FormedTeam> {
        self.teams
            .iter()
            .find(|t| t.members.iter().any(|m| m.username == username))
    }

    pub fn optimized_teams(&self) -> impl Iterator<Item = &FormedTeam> {
        self.teams.iter().filter(|t| !t.locked)
    }

    pub fn locked_teams(&self) -> impl Iterator<Item = &FormedTeam> {
        self.teams.iter().filter(|t| t.locked)
    }

    pub fn total_score(&self) -> f64 {
        self.teams.iter().map(|t| t.score).sum()
    }
}

/// Entry point for team formation. Only one run may be active at a time
/// across every engine sharing the same gate.
#[derive(Debug, Clone)]
pub struct FormationEngine {
    config: FormationConfig,
    gate: RunGate,
}

impl FormationEngine {
    /// Builds an engine on the process-wide run gate.
    pub fn new(config: FormationConfig) -> TfResult<Self> {
        Self::with_gate(config, RunGate::global())
    }

    /// Builds an engine on `gate`; engines holding clones of one gate exclude
    /// each other.
    pub fn with_gate(config: FormationConfig, gate: RunGate) -> TfResult<Self> {
        config.validate()?;
        info!(
            team_size = config.team_size,
            stall_multiplier = config.stall_multiplier,
            specialities = config.specialities.len(),
            "team formation engine ready"
        );
        Ok(Self { config, gate })
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    pub fn gate(&self) -> &RunGate {
        &self.gate
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Forms teams for `request`.
    ///
    /// Fails fast with `TfError::Busy` if another run holds the gate. The
    /// search itself runs on the blocking pool and keeps the gate closed until
    /// it finishes, even if this future is dropped.
    pub async fn form_teams(&self, request: FormationRequest) -> TfResult<FormationResult> {
        let permit = match self.gate.try_enter() {
            Ok(permit) => permit,
            Err(e) => {
                warn!("formation run rejected: another run is in progress");
                return Err(e);
            }
        };

        if let Err(e) = request.validate(&self.config.specialities) {
            warn!(error = %e, "formation request rejected");
            return Err(e);
        }

        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let (locked, free) = request.split();

        info!(
            %run_id,
            seed,
            free = free.len(),
            locked_teams = locked.len(),
            "starting formation run"
        );

        let optimizer = TeamOptimizer::from_config(&self.config);
        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            optimizer.optimize_seeded(&free, seed)
        })
        .await
        .map_err(|e| FormationError::WorkerFailed {
            message: e.to_string(),
        })?;

        let scorer = WeightedScore::new(self.config.specialities.clone());
        let teams = merge_teams(&scorer, outcome.teams, outcome.scores, locked);
        let finished_at = Utc::now();

        info!(
            %run_id,
            teams = teams.len(),
            accepted = outcome.stats.accepted,
            elapsed_ms = outcome.stats.elapsed_ms,
            "formation run complete"
        );

        Ok(FormationResult {
            run_id,
            seed,
            started_at,
            finished_at,
            teams,
            stats: outcome.stats,
        })
    }
}

fn merge_teams(
    scorer: &WeightedScore,
    optimized: Vec<Team>,
    scores: Vec<f64>,
    locked: Vec<Team>,
) -> Vec<FormedTeam> {
    let optimized = optimized
        .into_iter()
        .zip(scores)
        .map(|(team, score)| (team, score, false));
    let locked = locked.into_iter().map(|team| {
        let score = scorer.score_team(&team.members);
        (team, score, true)
    });

    optimized
        .chain(locked)
        .enumerate()
        .map(|(index, (team, score, locked))| FormedTeam {
            index,
            locked,
            score,
            members: team.summaries(),
        })
        .collect()
}
