//! Twinlink - Main entry point
//!
//! Replays hierarchy reconciliation for a single twin event and prints the
//! resulting state and the messages that would be sent to parent twins.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::FmtSubscriber;
use twinlink_core::{HierarchyReference, ReconcileContext, Reconciler};

#[derive(Parser, Debug)]
#[command(name = "twinlink")]
#[command(about = "Digital twin hierarchy reconciliation")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "twinlink.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error), overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a twin reference
    Classify {
        /// Twin name, e.g. `/floor1/room2`, `dev1/temp` or `dev1`
        name: String,
    },
    /// Run a reconciliation pass over an event file
    Reconcile {
        /// JSON file with `action`, `currentState` and `newState`
        event: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Write a default configuration file
    InitConfig {
        #[arg(default_value = "twinlink.toml")]
        path: PathBuf,
    },
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Filter from `RUST_LOG`, defaulting to the configured level
fn log_filter(level: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = config::load_config(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let config = loaded.config;

    // Initialize logging; stdout is reserved for command output
    let level = parse_level(args.log_level.as_deref().unwrap_or(&config.log.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if loaded.from_file {
        info!(path = %args.config.display(), "Loaded configuration");
    } else {
        info!(
            path = %args.config.display(),
            "Configuration file not found, using defaults"
        );
    }

    debug!(
        facet = %config.reconciler.facet,
        parent_property = %config.reconciler.parent_property,
        "Reconciler settings"
    );

    match args.command {
        Command::Classify { name } => {
            print_json(&HierarchyReference::classify(&name), false)?;
        }
        Command::Reconcile { event, pretty } => {
            let ctx = ReconcileContext::from_file(&event)
                .with_context(|| format!("reading event {}", event.display()))?;
            info!(
                reference = %ctx.new_state.name(),
                action = ?ctx.action,
                "Reconciling event"
            );

            let outcome = Reconciler::new(config.reconciler).run(ctx);
            info!(messages = outcome.messages.len(), "Reconciliation complete");
            print_json(&outcome, pretty)?;
        }
        Command::InitConfig { path } => {
            config::save_default_config(&path)?;
            info!(path = %path.display(), "Wrote default configuration");
        }
    }

    Ok(())
}
