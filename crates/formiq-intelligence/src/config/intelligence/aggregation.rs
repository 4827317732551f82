// ABOUTME: Session aggregation configuration
// ABOUTME: Number of recurring deviations surfaced per session summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Session aggregator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Recurring deviations kept in a summary
    pub top_deviations: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { top_deviations: 3 }
    }
}
