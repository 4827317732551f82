// ABOUTME: FormIQ CLI - analyze recorded pose streams and inspect rubrics and progress
// ABOUTME: Replays JSON-lines frame files through the pipeline and prints session reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Analyze a recorded squat set and store the summary
//! formiq-cli analyze --exercise squat --input squat.jsonl --user athlete-1 --history-dir ./history
//!
//! # Print the full report as JSON
//! formiq-cli analyze --exercise "Bench Press" --input bench.jsonl --json
//!
//! # List supported exercises, or show one rubric
//! formiq-cli rubrics
//! formiq-cli rubrics --exercise deadlift
//!
//! # Show progress across stored sessions
//! formiq-cli history --user athlete-1 --history-dir ./history
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use clap::{Parser, Subcommand};
use formiq::logging::LoggingConfig;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "formiq-cli",
    about = "FormIQ form-analysis CLI",
    long_about = "Score exercise form from recorded pose streams, inspect rubrics, and review progress."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON rubric catalog replacing the built-in one
    #[arg(long, global = true)]
    rubrics: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines pose recording through the analysis pipeline
    Analyze {
        /// Exercise name (e.g. "squat", "Bench Press")
        #[arg(long, short = 'e')]
        exercise: String,

        /// JSON-lines file of frames or raw pose-model output
        #[arg(long, short = 'i')]
        input: PathBuf,

        /// Owner of the recording
        #[arg(long, default_value = "local")]
        user: String,

        /// Store the summary in this directory and compare with earlier sessions
        #[arg(long)]
        history_dir: Option<PathBuf>,

        /// Score unsupported exercises with the generic rubric
        #[arg(long)]
        generic_fallback: bool,

        /// Recording comes from a mirrored (front-facing) camera
        #[arg(long)]
        mirrored: bool,

        /// Frames per extractor batch
        #[arg(long)]
        batch_size: Option<usize>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported exercises and their rubrics
    Rubrics {
        /// Show one exercise in detail
        #[arg(long, short = 'e')]
        exercise: Option<String>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show form progress from stored sessions
    History {
        /// Owner of the recordings
        #[arg(long, default_value = "local")]
        user: String,

        /// History directory (defaults to `FORMIQ_HISTORY_DIR`)
        #[arg(long)]
        history_dir: Option<PathBuf>,

        /// Limit to one exercise
        #[arg(long, short = 'e')]
        exercise: Option<String>,

        /// Print progress as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::for_cli(cli.verbose).init()?;
    debug!("FormIQ CLI");

    match cli.command {
        Command::Analyze {
            exercise,
            input,
            user,
            history_dir,
            generic_fallback,
            mirrored,
            batch_size,
            json,
        } => {
            commands::analyze::run(commands::analyze::AnalyzeArgs {
                exercise,
                input,
                user,
                history_dir,
                rubrics: cli.rubrics,
                generic_fallback,
                mirrored,
                batch_size,
                json,
            })
            .await?;
        }
        Command::Rubrics { exercise, json } => {
            commands::rubrics::run(cli.rubrics, exercise.as_deref(), json)?;
        }
        Command::History {
            user,
            history_dir,
            exercise,
            json,
        } => {
            commands::history::run(&user, history_dir, exercise.as_deref(), json).await?;
        }
    }

    Ok(())
}
