use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::TfResult;
use crate::participant::SpecialitySet;
use crate::config_error;

/// Target number of members per team.
pub const DEFAULT_TEAM_SIZE: usize = 2;

/// Consecutive rejected swaps allowed per team before the search stops.
pub const DEFAULT_STALL_MULTIPLIER: u64 = 20_000;

pub const ENV_TEAM_SIZE: &str = "TEAMFORM_TEAM_SIZE";
pub const ENV_STALL_MULTIPLIER: &str = "TEAMFORM_STALL_MULTIPLIER";
pub const ENV_SEED: &str = "TEAMFORM_SEED";
pub const ENV_MAX_DURATION_MS: &str = "TEAMFORM_MAX_DURATION_MS";

/// Settings for a team formation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormationConfig {
    pub team_size: usize,
    pub specialities: SpecialitySet,
    /// The search stops after `teams * stall_multiplier` consecutive rejections.
    pub stall_multiplier: u64,
    /// Fixed RNG seed; a fresh one is drawn per run when absent.
    pub seed: Option<u64>,
    /// Optional wall-clock cap on the search, checked between steps.
    pub max_duration_ms: Option<u64>,
}

impl Default for FormationConfig {
    fn default() -> Self {
        Self {
            team_size: DEFAULT_TEAM_SIZE,
            specialities: SpecialitySet::default(),
            stall_multiplier: DEFAULT_STALL_MULTIPLIER,
            seed: None,
            max_duration_ms: None,
        }
    }
}

impl FormationConfig {
    pub fn new(team_size: usize) -> Self {
        Self {
            team_size,
            ..Self::default()
        }
    }

    pub fn with_specialities(mut self, specialities: SpecialitySet) -> Self {
        self.specialities = specialities;
        self
    }

    pub fn with_stall_multiplier(mut self, multiplier: u64) -> Self {
        self.stall_multiplier = multiplier;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration_ms = Some(duration.as_millis().min(u64::MAX as u128) as u64);
        self
    }

    pub fn max_duration(&self) -> Option<Duration> {
        self.max_duration_ms.map(Duration::from_millis)
    }

    /// Stall budget for a partition with `num_teams` teams.
    pub fn stall_limit(&self, num_teams: usize) -> u64 {
        (num_teams as u64).saturating_mul(self.stall_multiplier)
    }

    pub fn validate(&self) -> TfResult<()> {
        if self.team_size == 0 {
            return Err(config_error!("team_size must be at least 1"));
        }
        if self.specialities.is_empty() {
            return Err(config_error!("at least one speciality tag is required"));
        }
        if self.specialities.iter().any(|tag| tag.trim().is_empty()) {
            return Err(config_error!("speciality tags must not be blank"));
        }
        if self.stall_multiplier == 0 {
            return Err(config_error!("stall_multiplier must be at least 1"));
        }
        Ok(())
    }

    /// Overlays `TEAMFORM_*` environment variables onto this config.
    pub fn apply_env(self) -> TfResult<Self> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    pub fn apply_env_from<F>(mut self, lookup: F) -> TfResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_TEAM_SIZE) {
            self.team_size = parse_var(ENV_TEAM_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_STALL_MULTIPLIER) {
            self.stall_multiplier = parse_var(ENV_STALL_MULTIPLIER, &v)?;
        }
        if let Some(v) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &v)?);
        }
        if let Some(v) = lookup(ENV_MAX_DURATION_MS) {
            self.max_duration_ms = Some(parse_var(ENV_MAX_DURATION_MS, &v)?);
        }
        Ok(self)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> TfResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| config_error!("{key} has invalid value {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TfError;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = FormationConfig::default();
        assert_eq!(config.team_size, 2);
        assert_eq!(config.stall_multiplier, 20_000);
        assert_eq!(config.specialities.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_team_size() {
        let err = FormationConfig::new(0).validate().unwrap_err();
        assert!(matches!(err, TfError::Config(_)));
    }

    #[test]
    fn rejects_empty_specialities() {
        let config = FormationConfig::default().with_specialities(SpecialitySet::new(Vec::<String>::new()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_speciality_tags() {
        for tags in [vec![""], vec!["software", ""], vec!["software", "  "]] {
            let config = FormationConfig::default().with_specialities(SpecialitySet::new(tags.clone()));
            let err = config.validate().unwrap_err();
            assert!(matches!(err, TfError::Config(_)), "{tags:?} accepted");
        }
    }

    #[test]
    fn rejects_zero_stall_multiplier() {
        assert!(FormationConfig::default().with_stall_multiplier(0).validate().is_err());
    }

    #[test]
    fn stall_limit_scales_with_teams() {
        let config = FormationConfig::default();
        assert_eq!(config.stall_limit(4), 80_000);
        assert_eq!(config.with_stall_multiplier(u64::MAX).stall_limit(3), u64::MAX);
    }

    #[test]
    fn env_overrides_fields() {
        let vars: HashMap<&str, &str> = [
            (ENV_TEAM_SIZE, "4"),
            (ENV_SEED, "42"),
            (ENV_MAX_DURATION_MS, " 1500 "),
        ]
        .into_iter()
        .collect();

        let config = FormationConfig::default()
            .apply_env_from(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.team_size, 4);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_duration(), Some(Duration::from_millis(1500)));
        assert_eq!(config.stall_multiplier, DEFAULT_STALL_MULTIPLIER);
    }

    #[test]
    fn env_rejects_garbage() {
        let err = FormationConfig::default()
            .apply_env_from(|k| (k == ENV_TEAM_SIZE).then(|| "four".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TEAM_SIZE));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: FormationConfig = serde_json::from_str(r#"{"team_size": 4}"#).unwrap();
        assert_eq!(config.team_size, 4);
        assert_eq!(config.stall_multiplier, DEFAULT_STALL_MULTIPLIER);
        assert!(config.seed.is_none());
    }
}
