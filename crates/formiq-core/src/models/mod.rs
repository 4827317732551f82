// ABOUTME: Core data models for the form-analysis pipeline
// ABOUTME: Re-exports Frame, Repetition, RepScore, SessionSummary and supporting types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! The pipeline is a strict forward data flow. Each stage owns and emits one of
//! these types and never mutates the output of a previous stage:
//!
//! - `Frame`: timestamped joint positions emitted by the pose extractor
//! - `Repetition`: one motion cycle emitted by the rep segmenter
//! - `RepScore` / `Deviation`: rubric evaluation emitted by the form scorer
//! - `SessionSummary`: per-recording aggregate emitted by the session aggregator

mod exercise;
mod frame;
mod joint;
mod repetition;
mod scoring;
mod session;

pub use exercise::ExerciseId;
pub use frame::Frame;
pub use joint::{Joint, JointPosition};
pub use repetition::Repetition;
pub use scoring::{Deviation, RepScore, RuleOutcome, ScoreLabel, Severity, TargetRange};
pub use session::{
    ExcludedRepetition, RecurringDeviation, SessionMeta, SessionSummary, TrendDelta,
};
