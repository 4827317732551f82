// ABOUTME: Form-analysis engine: rep segmentation, rubric scoring, and session aggregation
// ABOUTME: Deterministic algorithms shared by the streaming pipeline and batch tooling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `FormIQ` Intelligence
//!
//! The algorithmic core of form analysis. Everything here is synchronous and
//! free of hidden state so the same inputs always produce the same outputs;
//! concurrency, timeouts and persistence live in the root crate.
//!
//! - [`rep_segmenter`]: motion state machine turning frames into repetitions
//! - [`rubric`]: exercise profiles, biomechanical rules, and the validated catalog
//! - [`form_scorer`]: rubric evaluation of a single repetition
//! - [`session_aggregator`]: per-session mean, trend delta, and recurring deviations
//! - [`progress`]: historical trends across stored session summaries

/// Intelligence configuration (segmentation, scoring, aggregation)
pub mod config;

/// Joint-angle and alignment geometry
pub mod geometry;

/// Exercise profiles, rubric rules, and the rubric catalog
pub mod rubric;

/// Motion state machine that groups frames into repetitions
pub mod rep_segmenter;

/// Rubric-based scoring of individual repetitions
pub mod form_scorer;

/// Aggregation of rep scores into session summaries
pub mod session_aggregator;

/// Historical progress trends across sessions
pub mod progress;

pub use config::IntelligenceConfig;
pub use form_scorer::FormScorer;
pub use progress::{ExerciseProgress, ProgressAnalyzer, ProgressDirection, ProgressOverview};
pub use rep_segmenter::{MotionPhase, RepSegmenter, SegmentEvent, Segments};
pub use rubric::{ExerciseProfile, FallbackPolicy, RubricCatalog, RubricRule};
pub use session_aggregator::SessionAggregator;
