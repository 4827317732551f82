// ABOUTME: Historical progress analysis over stored session summaries
// ABOUTME: Per-exercise best/latest scores, least-squares slope, and trend direction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use formiq_core::models::{ExerciseId, SessionSummary, TrendDelta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Scored sessions required before a slope is reported
const MIN_SESSIONS_FOR_TREND: usize = 3;

/// Slope (points per session) below which form is considered stable
const STABLE_SLOPE_THRESHOLD: f64 = 0.5;

/// Direction of an exercise's form score over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressDirection {
    /// Scores are rising
    Improving,
    /// Scores are flat
    Stable,
    /// Scores are falling
    Declining,
    /// Too few scored sessions to tell
    InsufficientData,
}

/// Progress for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    /// Exercise
    pub exercise: ExerciseId,
    /// Sessions recorded, scored or not
    pub sessions: usize,
    /// Aggregate of the most recent scored session
    pub latest_score: Option<f64>,
    /// Best aggregate across all sessions
    pub best_score: Option<f64>,
    /// Trend delta stored with the most recent session
    pub latest_trend: Option<TrendDelta>,
    /// Least-squares slope of aggregates, in points per session
    pub slope_per_session: Option<f64>,
    /// Overall direction
    pub direction: ProgressDirection,
    /// When the most recent session was recorded
    pub last_recorded_at: Option<DateTime<Utc>>,
}

/// Progress across every exercise of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressOverview {
    /// Per-exercise progress, best score first
    pub exercises: Vec<ExerciseProgress>,
    /// Mean aggregate over all scored sessions
    pub average_score: Option<f64>,
    /// Sessions considered
    pub total_sessions: usize,
}

/// Computes progress from session history
pub struct ProgressAnalyzer;

impl ProgressAnalyzer {
    /// Progress for one exercise; summaries for other exercises are ignored
    #[must_use]
    pub fn exercise_progress(exercise: &ExerciseId, summaries: &[SessionSummary]) -> ExerciseProgress {
        let mut sessions: Vec<&SessionSummary> = summaries
            .iter()
            .filter(|summary| &summary.exercise == exercise)
            .collect();
        sessions.sort_by_key(|summary| summary.recorded_at);

        let scores: Vec<f64> = sessions
            .iter()
            .filter_map(|summary| summary.aggregate_score)
            .collect();

        let slope = Self::slope(&scores);
        let direction = slope.map_or(ProgressDirection::InsufficientData, |slope| {
            if slope.abs() < STABLE_SLOPE_THRESHOLD {
                ProgressDirection::Stable
            } else if slope > 0.0 {
                ProgressDirection::Improving
            } else {
                ProgressDirection::Declining
            }
        });

        ExerciseProgress {
            exercise: exercise.clone(),
            sessions: sessions.len(),
            latest_score: scores.last().copied(),
            best_score: scores.iter().copied().max_by(f64::total_cmp),
            latest_trend: sessions.last().map(|summary| summary.trend),
            slope_per_session: slope,
            direction,
            last_recorded_at: sessions.last().map(|summary| summary.recorded_at),
        }
    }

    /// Progress for every exercise present in the history
    #[must_use]
    pub fn overview(summaries: &[SessionSummary]) -> ProgressOverview {
        let exercises: BTreeSet<&ExerciseId> =
            summaries.iter().map(|summary| &summary.exercise).collect();

        let mut progress: Vec<ExerciseProgress> = exercises
            .into_iter()
            .map(|exercise| Self::exercise_progress(exercise, summaries))
            .collect();
        progress.sort_by(|a, b| {
            b.best_score
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&a.best_score.unwrap_or(f64::NEG_INFINITY))
                .then_with(|| a.exercise.cmp(&b.exercise))
        });

        let scores: Vec<f64> = summaries
            .iter()
            .filter_map(|summary| summary.aggregate_score)
            .collect();
        let average_score =
            (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

        ProgressOverview {
            exercises: progress,
            average_score,
            total_sessions: summaries.len(),
        }
    }

    /// Least-squares slope of `values` against their index
    fn slope(values: &[f64]) -> Option<f64> {
        if values.len() < MIN_SESSIONS_FOR_TREND {
            return None;
        }

        let n = values.len() as f64;
        let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
        let sum_y: f64 = values.iter().sum();
        let sum_x_y: f64 = values
            .iter()
            .enumerate()
            .map(|(i, value)| i as f64 * value)
            .sum();
        let sum_x_squared: f64 = (0..values.len()).map(|i| (i as f64).powi(2)).sum();

        let denominator = n.mul_add(sum_x_squared, -sum_x.powi(2));
        if denominator == 0.0 {
            return None;
        }
        Some(n.mul_add(sum_x_y, -(sum_x * sum_y)) / denominator)
    }
}
