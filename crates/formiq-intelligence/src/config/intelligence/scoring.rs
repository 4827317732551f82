// ABOUTME: Form scoring configuration: sample confidence, visibility, severity buckets
// ABOUTME: Controls which rule violations are surfaced and how they are classified
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use formiq_core::models::Severity;
use serde::{Deserialize, Serialize};

/// Scorer thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Joints below this confidence are not sampled by rubric rules
    pub min_sample_confidence: f64,
    /// A rule penalty must exceed this to surface as a deviation
    pub visibility_threshold: f64,
    /// Penalty at which a deviation becomes medium severity
    pub medium_severity_penalty: f64,
    /// Penalty at which a deviation becomes high severity
    pub high_severity_penalty: f64,
}

impl ScoringConfig {
    /// Severity bucket for a penalty
    #[must_use]
    pub fn severity_for(&self, penalty: f64) -> Severity {
        if penalty >= self.high_severity_penalty {
            Severity::High
        } else if penalty >= self.medium_severity_penalty {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_sample_confidence: 0.5,
            visibility_threshold: 2.0,
            medium_severity_penalty: 10.0,
            high_severity_penalty: 25.0,
        }
    }
}
