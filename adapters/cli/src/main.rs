#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that exposes stage balancing to level designers.

mod layout;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledgejump_core::{CheatToken, Difficulty, Stage};
use ledgejump_system_cheat_codes::CheatSession;
use ledgejump_system_collectibles::Placer;
use ledgejump_system_difficulty::compute_spawn_specs;
use ledgejump_system_stage_setup::StageSetup;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::layout::{load_tuning, StageLayout};

/// Inspect spawn tables, collectible placement and cheat recognition.
#[derive(Debug, Parser)]
#[command(name = "ledgejump", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the spawn table of a single stage.
    Spawns {
        /// Stage number, starting at 1.
        #[arg(short, long, value_parser = parse_stage)]
        stage: Stage,
        /// easy, normal or hard. Anything else is treated as normal.
        #[arg(short, long, default_value = "normal")]
        difficulty: String,
    },
    /// Print the spawn tables of every campaign stage.
    Sweep {
        /// easy, normal or hard. Anything else is treated as normal.
        #[arg(short, long, default_value = "normal")]
        difficulty: String,
    },
    /// Prepare a stage from a TOML platform layout and print the plan.
    Place {
        /// Stage number, starting at 1.
        #[arg(short, long, value_parser = parse_stage)]
        stage: Stage,
        /// easy, normal or hard. Anything else is treated as normal.
        #[arg(short, long, default_value = "normal")]
        difficulty: String,
        /// TOML file containing `[[platforms]]` tables.
        #[arg(short, long)]
        layout: PathBuf,
        /// Optional TOML file overriding placement tuning.
        #[arg(short, long)]
        tuning: Option<PathBuf>,
    },
    /// Feed tokens such as `UP DOWN JUMP` through a fresh cheat session.
    Cheat {
        /// Tokens in input order.
        #[arg(required = true)]
        tokens: Vec<String>,
    },
}

#[derive(Serialize)]
struct SweepRow {
    stage: Stage,
    spawns: ledgejump_core::SpawnTable,
}

/// Entry point for the Ledgejump command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ledgejump=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Spawns { stage, difficulty } => {
            let difficulty = Difficulty::from_label(&difficulty);
            print_json(&compute_spawn_specs(stage, difficulty))
        }
        Command::Sweep { difficulty } => {
            let difficulty = Difficulty::from_label(&difficulty);
            let rows: Vec<SweepRow> = Stage::campaign()
                .map(|stage| SweepRow {
                    stage,
                    spawns: compute_spawn_specs(stage, difficulty),
                })
                .collect();
            print_json(&rows)
        }
        Command::Place {
            stage,
            difficulty,
            layout,
            tuning,
        } => {
            let difficulty = Difficulty::from_label(&difficulty);
            let stage_layout = StageLayout::load(&layout)?;
            let tuning = match tuning {
                Some(path) => load_tuning(&path)?,
                None => Default::default(),
            };
            info!(layout = %layout.display(), platforms = stage_layout.platforms.len(), "loaded layout");

            let setup = StageSetup::new(Placer::new(tuning));
            print_json(&setup.prepare(stage, difficulty, &stage_layout.platforms))
        }
        Command::Cheat { tokens } => {
            let tokens = tokens
                .iter()
                .map(|label| label.parse::<CheatToken>())
                .collect::<Result<Vec<_>, _>>()
                .context("cheat tokens must be UP, DOWN, LEFT, RIGHT, JUMP, SHOOT, A or B")?;

            let mut session = CheatSession::default();
            let mut events = Vec::new();
            for token in tokens {
                session.push_token(token, &mut events);
            }
            print_json(&events)
        }
    }
}

fn parse_stage(value: &str) -> Result<Stage> {
    let number: u32 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a stage number"))?;
    Ok(Stage::new(number)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
