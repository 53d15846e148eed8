use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tf_engine::{FormationEngine, FormationRequest};
use tf_types::{FormationConfig, SpecialitySet};
use tracing_subscriber::EnvFilter;

/// Assign hackathon participants to teams.
#[derive(Debug, Parser)]
#[command(name = "teamform", version)]
struct Cli {
    /// JSON file with `participants` and optional `locked_teams`
    roster: PathBuf,

    /// Target members per team
    #[arg(long)]
    team_size: Option<usize>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Consecutive rejected swaps allowed per team
    #[arg(long)]
    stall_multiplier: Option<u64>,

    /// Stop searching after this many milliseconds
    #[arg(long)]
    max_duration_ms: Option<u64>,

    /// Recognized speciality tags, comma separated
    #[arg(long, value_delimiter = ',')]
    specialities: Option<Vec<String>>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<FormationConfig> {
        let mut config = FormationConfig::default().apply_env()?;
        if let Some(team_size) = self.team_size {
            config.team_size = team_size;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(multiplier) = self.stall_multiplier {
            config.stall_multiplier = multiplier;
        }
        if let Some(ms) = self.max_duration_ms {
            config.max_duration_ms = Some(ms);
        }
        if let Some(tags) = &self.specialities {
            config.specialities = SpecialitySet::new(tags.iter().map(|t| t.trim()));
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;
    let engine = FormationEngine::new(config)?;

    let request = FormationRequest::load(&cli.roster)
        .with_context(|| format!("reading roster {}", cli.roster.display()))?;
    let result = engine.form_teams(request).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{output}");

    Ok(())
}
