//! Prime Trust CLI
//!
//! Scores raw metrics or stored members and prints JSON to stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prime_trust::{commands, Badge, TrustConfig, TrustLevel, TrustMetrics, TrustRequirements, TrustState};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "prime-trust")]
#[command(about = "Prime Trust member scoring")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score raw metrics read from a JSON file (stdin when omitted)
    Score {
        #[arg(long)]
        metrics: Option<PathBuf>,
    },
    /// Score a stored member
    Member { id: String },
    /// Check a stored member against trust requirements
    Verify {
        id: String,
        #[arg(long)]
        level: Option<TrustLevel>,
        #[arg(long)]
        min_total: Option<f64>,
        #[arg(long = "badge")]
        badges: Vec<Badge>,
    },
    /// Rank stored members by total score
    Leaderboard {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List every badge and its threshold
    Badges,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrustConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrustConfig::default(),
    };
    prime_trust::logging::init(&config)?;

    match cli.command {
        Commands::Score { metrics } => {
            let raw = match metrics {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let metrics: TrustMetrics =
                serde_json::from_str(&raw).context("parsing trust metrics")?;
            print_json(&commands::score_metrics(&metrics))?;
        }
        Commands::Member { id } => {
            let state = TrustState::from_config(config)?;
            print_json(&commands::get_trust_score(&state, &id).await?)?;
        }
        Commands::Verify {
            id,
            level,
            min_total,
            badges,
        } => {
            let requirements =
                requirements_from_flags(level, min_total, badges).context("invalid verify flags")?;
            let state = TrustState::from_config(config)?;
            print_json(&commands::verify_member(&state, &id, requirements).await?)?;
        }
        Commands::Leaderboard { limit } => {
            let state = TrustState::from_config(config)?;
            let storage = state
                .storage()
                .context("leaderboard needs a member store")?;
            let ids: Vec<String> = storage.list_members()?.into_iter().map(|m| m.id).collect();
            let board = commands::leaderboard(&state, &ids, limit).await?;
            let rows: Vec<serde_json::Value> = board
                .into_iter()
                .map(|(id, score)| {
                    serde_json::json!({
                        "memberId": id,
                        "total": score.total,
                        "level": score.level,
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        Commands::Badges => {
            for badge in Badge::ALL {
                println!(
                    "{:<20} {:<22} >= {:<4} {}",
                    badge.label(),
                    badge.metric().display_name(),
                    badge.threshold(),
                    badge.description()
                );
            }
        }
    }

    Ok(())
}

/// Explicit requirements from the `verify` flags, or `None` when no flag was
/// given and the configured defaults apply.
fn requirements_from_flags(
    level: Option<TrustLevel>,
    min_total: Option<f64>,
    badges: Vec<Badge>,
) -> prime_trust::Result<Option<TrustRequirements>> {
    if level.is_none() && min_total.is_none() && badges.is_empty() {
        return Ok(None);
    }

    let requirements = TrustRequirements {
        min_total: min_total.unwrap_or(0.0),
        required_level: level,
        required_badges: badges,
    };
    requirements.validate()?;
    Ok(Some(requirements))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
