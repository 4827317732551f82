// ABOUTME: Rep segmentation configuration: tracking confidence, frame gaps, tail handling
// ABOUTME: Exercise-independent limits applied by every segmenter instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Segmenter limits shared by all exercises
///
/// Exercise-specific motion thresholds (start displacement, bottom depth,
/// debounce) live in the exercise profile instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Minimum tracking-joint confidence for a frame to drive the state machine
    pub min_tracking_confidence: f64,
    /// Consecutive low-confidence frames tolerated; one more loses tracking
    pub max_low_confidence_frames: usize,
    /// Largest gap between consecutive frames that keeps a rep intact (ms)
    pub max_frame_gap_ms: u64,
    /// Fraction of the return path a trailing rep must cover to be kept as incomplete
    pub near_complete_ratio: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            min_tracking_confidence: 0.5,
            max_low_confidence_frames: 9,
            max_frame_gap_ms: 250,
            near_complete_ratio: 0.7,
        }
    }
}
