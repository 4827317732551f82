// ABOUTME: Per-repetition scoring models: deviations, severities, labels, and rep scores
// ABOUTME: Produced by the form scorer and consumed read-only by the session aggregator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::{scoring, severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a surfaced deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor issue, worth a mention
    Low,
    /// Noticeable issue affecting quality
    Medium,
    /// Significant issue, fix first
    High,
}

impl Severity {
    /// Numeric weight used when ranking recurring deviations
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::Low => severity::LOW_WEIGHT,
            Self::Medium => severity::MEDIUM_WEIGHT,
            Self::High => severity::HIGH_WEIGHT,
        }
    }

    /// Lowercase name as shown in the UI
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Inclusive target range for a rubric metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetRange {
    /// Lowest acceptable value
    pub min: f64,
    /// Highest acceptable value
    pub max: f64,
}

impl TargetRange {
    /// Create a target range
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether the value lies inside the range
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from the value to the nearest bound, `0.0` inside the range
    #[must_use]
    pub fn deviation(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// A rubric rule violation found within one repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deviation {
    /// Identifier of the violated rule
    pub rule_id: String,
    /// Short title shown in the rep breakdown (e.g. "Elbow flare")
    pub title: String,
    /// Index of the worst frame within the repetition
    pub frame_offset: usize,
    /// Milliseconds from the repetition start to the worst frame
    pub offset_ms: u64,
    /// Observed metric value at the worst frame
    pub observed: f64,
    /// Target range of the rule
    pub target: TargetRange,
    /// Distance between observed value and target range
    pub magnitude: f64,
    /// Score points deducted for this deviation
    pub penalty: f64,
    /// Severity bucket derived from the penalty
    pub severity: Severity,
    /// Coaching tip for the user
    pub tip: String,
}

/// Penalty outcome of a single rule, surfaced or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Rule identifier
    pub rule_id: String,
    /// Score points deducted (zero when within range)
    pub penalty: f64,
    /// False when no frame had confident joints for this rule
    pub evaluated: bool,
}

/// Qualitative label derived from a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    /// Score of 90 or more
    Excellent,
    /// Score of 75 or more
    Good,
    /// Score of 60 or more
    Fair,
    /// Score below 60
    NeedsWork,
}

impl ScoreLabel {
    /// Label for a score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= scoring::EXCELLENT_THRESHOLD {
            Self::Excellent
        } else if score >= scoring::GOOD_THRESHOLD {
            Self::Good
        } else if score >= scoring::FAIR_THRESHOLD {
            Self::Fair
        } else {
            Self::NeedsWork
        }
    }

    /// Display text
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::NeedsWork => "Needs Work",
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score of a single repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepScore {
    /// 1-based index of the scored repetition
    pub rep_index: u32,
    /// Whether the repetition was flagged incomplete by the segmenter
    pub incomplete: bool,
    /// Repetition start timestamp
    pub start_ms: u64,
    /// Repetition end timestamp
    pub end_ms: u64,
    /// Score in `[0, 100]`
    pub score: f64,
    /// Qualitative label derived from the score
    pub label: ScoreLabel,
    /// Surfaced deviations, most actionable first
    pub deviations: Vec<Deviation>,
    /// Penalty of every rule in the rubric, in rubric order
    pub outcomes: Vec<RuleOutcome>,
}

impl RepScore {
    /// Short note for the rep breakdown: the top deviation title, else the label
    #[must_use]
    pub fn note(&self) -> &str {
        self.deviations
            .first()
            .map_or_else(|| self.label.as_str(), |deviation| deviation.title.as_str())
    }

    /// Sum of penalties of every evaluated rule before capping
    #[must_use]
    pub fn total_penalty(&self) -> f64 {
        self.outcomes.iter().map(|outcome| outcome.penalty).sum()
    }
}
