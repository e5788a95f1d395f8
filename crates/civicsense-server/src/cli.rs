//! One-shot subcommands that run the engine over a snapshot file.

use std::path::{Path, PathBuf};

use civicsense_cluster::PriorityTier;
use civicsense_core::Report;

use crate::snapshot;
use crate::state::AppState;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Serve,
    Cluster(PathBuf),
    Priority(PathBuf, Option<String>),
    Help,
}

impl Command {
    /// Parse `args` (program name first). Errors carry the usage line to show.
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let Some(command) = args.get(1) else {
            return Ok(Self::Serve);
        };
        match command.as_str() {
            "serve" => Ok(Self::Serve),
            "cluster" => match args.get(2) {
                Some(path) => Ok(Self::Cluster(PathBuf::from(path))),
                None => Err("Usage: civicsense cluster <snapshot.json>".into()),
            },
            "priority" => match args.get(2) {
                Some(path) => Ok(Self::Priority(PathBuf::from(path), args.get(3).cloned())),
                None => Err("Usage: civicsense priority <snapshot.json> [high|medium|low]".into()),
            },
            "--help" | "-h" | "help" => Ok(Self::Help),
            other => Err(format!(
                "Unknown command: {}. Use 'civicsense help' for usage.",
                other
            )),
        }
    }
}

/// `civicsense cluster <snapshot.json>`
pub fn cluster(state: &AppState, path: &Path) -> anyhow::Result<serde_json::Value> {
    let reports = snapshot::load(path)?;
    let result = state.cluster_snapshot(reports);
    Ok(serde_json::to_value(&result)?)
}

/// `civicsense priority <snapshot.json> [tier]`
pub fn priority(
    state: &AppState,
    path: &Path,
    tier: Option<&str>,
) -> anyhow::Result<serde_json::Value> {
    let reports = snapshot::load(path)?;
    match tier {
        Some(raw) => {
            let tier = PriorityTier::parse(raw)
                .ok_or_else(|| anyhow::anyhow!("unknown priority tier: {}", raw))?;
            let matching: Vec<&Report> = state.priorities.filter(&reports, tier);
            Ok(serde_json::json!({
                "tier": tier,
                "label": tier.label(),
                "total": matching.len(),
                "reports": matching,
            }))
        }
        None => {
            let ranked = state.priorities.rank(&reports);
            Ok(serde_json::json!({
                "total": ranked.len(),
                "reports": ranked,
            }))
        }
    }
}

pub fn print_help() {
    println!("CivicSense — civic report clustering and routing");
    println!();
    println!("Usage: civicsense [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve                  Start the HTTP server");
    println!("  cluster <snapshot.json>         Cluster open reports and print JSON");
    println!("  priority <snapshot.json> [tier] Rank reports by urgency (high|medium|low)");
    println!("  help                            Show this help message");
    println!();
    println!("Environment:");
    println!("  PORT, CIVICSENSE_CONFIG, CIVICSENSE_THRESHOLDS (standard|relaxed),");
    println!("  CIVICSENSE_SIM_THRESHOLD, CIVICSENSE_DIST_METERS, CIVICSENSE_MAX_HOURS,");
    println!("  CIVICSENSE_PLACEHOLDER, RUST_LOG");
}
