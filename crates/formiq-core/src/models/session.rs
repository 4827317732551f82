// ABOUTME: Session-level models: summary, trend delta, recurring deviations, exclusions
// ABOUTME: Built once per recording by the session aggregator and persisted by history stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::exercise::ExerciseId;
use super::scoring::{RepScore, ScoreLabel};
use crate::errors::ErrorCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one recording session, supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// Unique session identifier
    pub session_id: Uuid,
    /// Owner of the recording
    pub user_id: String,
    /// Exercise performed
    pub exercise: ExerciseId,
    /// When the recording was made
    pub recorded_at: DateTime<Utc>,
}

impl SessionMeta {
    /// Create session metadata with a fresh session id recorded now
    #[must_use]
    pub fn new(user_id: impl Into<String>, exercise: ExerciseId) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: user_id.into(),
            exercise,
            recorded_at: Utc::now(),
        }
    }
}

/// Change in aggregate score relative to the previous session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendDelta {
    /// No earlier session exists for this exercise
    FirstSession,
    /// One side of the comparison has no aggregate score
    NotComparable,
    /// Aggregate score moved by `delta` from `previous`
    Change {
        /// Aggregate score of the prior session
        previous: f64,
        /// Current aggregate minus previous aggregate
        delta: f64,
    },
}

impl TrendDelta {
    /// Numeric delta when a comparison was possible
    #[must_use]
    pub const fn delta(&self) -> Option<f64> {
        match self {
            Self::Change { delta, .. } => Some(*delta),
            Self::FirstSession | Self::NotComparable => None,
        }
    }
}

/// A rule violated repeatedly across a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringDeviation {
    /// Violated rule
    pub rule_id: String,
    /// Rule title
    pub title: String,
    /// Number of repetitions in which the rule was surfaced
    pub occurrences: usize,
    /// Mean severity weight (low = 1, medium = 2, high = 3)
    pub average_severity: f64,
    /// Ranking value: occurrences x average severity
    pub rank: f64,
    /// Penalty points summed across occurrences
    pub total_penalty: f64,
    /// Coaching tip
    pub tip: String,
    /// Indices of affected repetitions
    pub reps: Vec<u32>,
}

/// Repetition left out of the aggregate, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRepetition {
    /// Index of the excluded repetition
    pub rep_index: u32,
    /// Error code explaining the exclusion
    pub code: ErrorCode,
    /// Human-readable reason
    pub reason: String,
}

/// Aggregated result of one recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub session_id: Uuid,
    /// Owner of the recording
    pub user_id: String,
    /// Exercise performed
    pub exercise: ExerciseId,
    /// When the recording was made
    pub recorded_at: DateTime<Utc>,
    /// Scores of every included repetition, in rep order
    pub rep_scores: Vec<RepScore>,
    /// Mean rep score, absent when no repetition was scored
    pub aggregate_score: Option<f64>,
    /// Change relative to the previous session for this exercise
    pub trend: TrendDelta,
    /// Most significant recurring deviations, highest rank first
    pub top_deviations: Vec<RecurringDeviation>,
    /// Rules that were evaluated and clean in every repetition
    pub clean_rules: Vec<String>,
    /// Repetitions excluded from the aggregate
    pub excluded: Vec<ExcludedRepetition>,
}

impl SessionSummary {
    /// Number of scored repetitions
    #[must_use]
    pub fn rep_count(&self) -> usize {
        self.rep_scores.len()
    }

    /// Number of scored repetitions flagged incomplete
    #[must_use]
    pub fn incomplete_count(&self) -> usize {
        self.rep_scores.iter().filter(|rep| rep.incomplete).count()
    }

    /// Label of the aggregate score
    #[must_use]
    pub fn label(&self) -> Option<ScoreLabel> {
        self.aggregate_score.map(ScoreLabel::from_score)
    }

    /// Best scoring repetition
    #[must_use]
    pub fn best_rep(&self) -> Option<&RepScore> {
        self.rep_scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score).then(b.rep_index.cmp(&a.rep_index)))
    }
}
