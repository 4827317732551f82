// ABOUTME: Main library entry point for the FormIQ form-analysis engine
// ABOUTME: Streaming pipeline from pose frames to scored sessions, with history and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `FormIQ`
//!
//! Scores strength-training form from pose-estimation output. A recording
//! flows through four stages:
//!
//! - **Pose extraction**: a [`pipeline::PoseExtractor`] yields timestamped frames
//! - **Rep segmentation**: motion cycles are cut into repetitions
//! - **Form scoring**: each repetition is scored 0-100 against the exercise rubric
//! - **Session aggregation**: scores, trend and recurring faults are summarized
//!
//! The algorithms live in `formiq-intelligence` and the shared types in
//! `formiq-core`; this crate wires them into an async pipeline, persists
//! summaries, and provides logging and configuration.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use formiq::config::PipelineConfig;
//! use formiq::history::InMemoryHistoryStore;
//! use formiq::pipeline::{AnalysisPipeline, PoseAdapter, ReplayExtractor};
//! use formiq_core::models::{ExerciseId, SessionMeta};
//! use std::path::Path;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::from_env()?;
//! let catalog = Arc::new(config.load_catalog()?);
//! let pipeline = AnalysisPipeline::new(catalog, Arc::new(InMemoryHistoryStore::new()), config);
//!
//! let extractor =
//!     ReplayExtractor::from_file(Path::new("squat.jsonl"), &PoseAdapter::new()).await?;
//! let meta = SessionMeta::new("athlete-1", ExerciseId::new("Squat"));
//! let report = pipeline
//!     .analyze(&meta, Box::new(extractor), &CancellationToken::new())
//!     .await?;
//! println!("Form score: {:?}", report.summary.aggregate_score);
//! # Ok(())
//! # }
//! ```

/// Pipeline configuration from environment variables
pub mod config;

/// Error types and conversions
pub mod errors;

/// Session history stores
pub mod history;

/// Structured logging setup
pub mod logging;

/// Streaming analysis pipeline
pub mod pipeline;

pub use formiq_core::models;
pub use formiq_intelligence::{progress, rubric};
