// ABOUTME: Repetition model - a validated contiguous span of frames for one motion cycle
// ABOUTME: Enforces time ordering, positive duration, and the frame gap tolerance on construction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::exercise::ExerciseId;
use super::frame::Frame;
use crate::errors::{AnalysisError, AnalysisResult};
use serde::Serialize;

/// One complete (or near-complete) cycle of an exercise movement
///
/// Constructed only through [`Repetition::new`], which guarantees:
/// - at least two frames
/// - strictly increasing timestamps, hence `end_ms > start_ms`
/// - no gap between consecutive frames larger than the tolerance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Repetition {
    index: u32,
    exercise: ExerciseId,
    frames: Vec<Frame>,
    peak_displacement: f64,
    incomplete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    descent_sign: Option<f64>,
}

impl Repetition {
    /// Build a repetition, validating its invariants
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidRepetition` when there are fewer than two
    /// frames, timestamps do not strictly increase, or two consecutive frames
    /// are more than `max_gap_ms` apart.
    pub fn new(
        index: u32,
        exercise: ExerciseId,
        frames: Vec<Frame>,
        peak_displacement: f64,
        incomplete: bool,
        max_gap_ms: u64,
    ) -> AnalysisResult<Self> {
        if frames.len() < 2 {
            return Err(AnalysisError::invalid_repetition(format!(
                "repetition {index} has {} frame(s), at least 2 required",
                frames.len()
            )));
        }

        for pair in frames.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.timestamp_ms <= previous.timestamp_ms {
                return Err(AnalysisError::invalid_repetition(format!(
                    "repetition {index} frames out of order at {}ms",
                    current.timestamp_ms
                )));
            }
            let gap = current.timestamp_ms - previous.timestamp_ms;
            if gap > max_gap_ms {
                return Err(AnalysisError::invalid_repetition(format!(
                    "repetition {index} has a {gap}ms gap at {}ms (tolerance {max_gap_ms}ms)",
                    current.timestamp_ms
                )));
            }
        }

        Ok(Self {
            index,
            exercise,
            frames,
            peak_displacement,
            incomplete,
            descent_sign: None,
        })
    }

    /// Record the sign of the descent the segmenter followed
    ///
    /// `1.0` when the tracking joint moved down the image, `-1.0` when it
    /// moved up.
    #[must_use]
    pub const fn with_descent_sign(mut self, sign: Option<f64>) -> Self {
        self.descent_sign = sign;
        self
    }

    /// 1-based position of this repetition within its session
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Exercise this repetition belongs to
    #[must_use]
    pub const fn exercise(&self) -> &ExerciseId {
        &self.exercise
    }

    /// Frames covering the repetition, time-ordered
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Timestamp of the first frame
    #[must_use]
    pub fn start_ms(&self) -> u64 {
        self.frames.first().map_or(0, |frame| frame.timestamp_ms)
    }

    /// Timestamp of the last frame
    #[must_use]
    pub fn end_ms(&self) -> u64 {
        self.frames.last().map_or(0, |frame| frame.timestamp_ms)
    }

    /// Duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.end_ms() - self.start_ms()
    }

    /// Largest displacement of the tracking joint from the top position
    #[must_use]
    pub const fn peak_displacement(&self) -> f64 {
        self.peak_displacement
    }

    /// Sign of the descent, when the segmenter recorded one
    #[must_use]
    pub const fn descent_sign(&self) -> Option<f64> {
        self.descent_sign
    }

    /// Whether the cycle was cut short at the end of the stream
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        self.incomplete
    }
}
