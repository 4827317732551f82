// ABOUTME: History command for formiq-cli
// ABOUTME: Loads stored session summaries and prints per-exercise progress trends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{anyhow, Result};
use formiq::config::PipelineConfig;
use formiq::history::{FileHistoryStore, HistoryStore};
use formiq::models::ExerciseId;
use formiq::progress::ProgressAnalyzer;
use std::path::PathBuf;
use tracing::info;

use crate::helpers::display::{display_exercise_progress, display_overview};

/// Print progress for a user
pub async fn run(
    user: &str,
    history_dir: Option<PathBuf>,
    exercise: Option<&str>,
    json: bool,
) -> Result<()> {
    let dir = match history_dir {
        Some(dir) => dir,
        None => PipelineConfig::from_env()?
            .history_dir
            .ok_or_else(|| anyhow!("No history directory: pass --history-dir or set FORMIQ_HISTORY_DIR"))?,
    };

    let store = FileHistoryStore::new(dir);
    let summaries = store.list(user).await?;
    info!(user, sessions = summaries.len(), "History loaded");

    match exercise {
        Some(name) => {
            let progress = ProgressAnalyzer::exercise_progress(&ExerciseId::new(name), &summaries);
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                display_exercise_progress(&progress);
            }
        }
        None => {
            let overview = ProgressAnalyzer::overview(&summaries);
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                display_overview(user, &overview);
            }
        }
    }

    Ok(())
}
