// ABOUTME: Analyze command for formiq-cli
// ABOUTME: Replays a recorded pose stream through the pipeline with Ctrl-C cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use formiq::errors::extraction_error;
use formiq::history::{FileHistoryStore, HistoryStore, InMemoryHistoryStore};
use formiq::models::{ExerciseId, SessionMeta};
use formiq::pipeline::{AnalysisPipeline, PoseAdapter, ReplayExtractor};
use formiq::rubric::FallbackPolicy;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::helpers::catalog::{load_catalog, load_config};
use crate::helpers::display::display_report;

/// Options of the analyze command
pub struct AnalyzeArgs {
    pub exercise: String,
    pub input: PathBuf,
    pub user: String,
    pub history_dir: Option<PathBuf>,
    pub rubrics: Option<PathBuf>,
    pub generic_fallback: bool,
    pub mirrored: bool,
    pub batch_size: Option<usize>,
    pub json: bool,
}

/// Analyze one recording and print the report
pub async fn run(args: AnalyzeArgs) -> Result<()> {
    let mut config = load_config(args.rubrics)?;
    if args.generic_fallback {
        config.rubric_fallback = FallbackPolicy::Generic;
    }
    if args.history_dir.is_some() {
        config.history_dir = args.history_dir;
    }

    let catalog = Arc::new(load_catalog(&config)?);
    let history: Arc<dyn HistoryStore> = match &config.history_dir {
        Some(dir) => Arc::new(FileHistoryStore::new(dir)),
        None => Arc::new(InMemoryHistoryStore::new()),
    };
    let stores_history = config.history_dir.is_some();

    let adapter = if args.mirrored {
        PoseAdapter::mirrored()
    } else {
        PoseAdapter::new()
    };
    let source = args.input.display().to_string();
    let mut extractor = ReplayExtractor::from_file(&args.input, &adapter)
        .await
        .map_err(|e| extraction_error(&source, &e))?;
    if let Some(batch_size) = args.batch_size {
        extractor = extractor.with_batch_size(batch_size);
    }
    info!(input = %source, frames = extractor.remaining(), "Recording loaded");

    let meta = SessionMeta::new(args.user, ExerciseId::new(&args.exercise));
    let pipeline = AnalysisPipeline::new(catalog, history, config);

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, finishing the current repetition");
                cancel.cancel();
            }
        }
    });

    let result = pipeline.analyze(&meta, Box::new(extractor), &cancel).await;
    interrupt.abort();
    let report = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&report, stores_history);
    }

    Ok(())
}
