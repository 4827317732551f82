// ABOUTME: Exercise profile: display metadata, motion profile for segmentation, and rubric
// ABOUTME: The motion profile defines the tracking signal and rep phase thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::rule::Rubric;
use formiq_core::models::{ExerciseId, Frame, Joint};
use serde::{Deserialize, Serialize};

/// Image direction in which the tracking joint moves away from the top position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescentDirection {
    /// Tracking joint moves down the image (squat hips, bench press bar)
    Down,
    /// Tracking joint moves up the image (overhead press, row)
    Up,
    /// Locked to the direction of the first significant movement
    Auto,
}

impl DescentDirection {
    /// Sign applied to `y - top` to obtain displacement, `None` for `Auto`
    #[must_use]
    pub const fn sign(self) -> Option<f64> {
        match self {
            Self::Down => Some(1.0),
            Self::Up => Some(-1.0),
            Self::Auto => None,
        }
    }
}

/// Rep phase thresholds, in normalized image units and units per second
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionThresholds {
    /// Displacement that marks the start of the eccentric phase
    pub start_displacement: f64,
    /// Displacement the movement must reach to count as a repetition
    pub min_displacement: f64,
    /// Displacement within which the joint counts as back at the top
    pub top_tolerance: f64,
    /// Speed separating movement from a hold
    pub min_velocity: f64,
    /// Consecutive frames a transition condition must hold
    pub debounce_frames: usize,
}

impl Default for MotionThresholds {
    fn default() -> Self {
        Self {
            start_displacement: 0.03,
            min_displacement: 0.10,
            top_tolerance: 0.02,
            min_velocity: 0.05,
            debounce_frames: 2,
        }
    }
}

/// How the segmenter follows an exercise's movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Joints averaged into the tracking signal (e.g. both hips)
    pub tracking_joints: Vec<Joint>,
    /// Direction of the eccentric phase
    pub direction: DescentDirection,
    /// Phase thresholds
    #[serde(default)]
    pub thresholds: MotionThresholds,
}

impl MotionProfile {
    /// Create a motion profile with default thresholds
    #[must_use]
    pub fn new(tracking_joints: Vec<Joint>, direction: DescentDirection) -> Self {
        Self {
            tracking_joints,
            direction,
            thresholds: MotionThresholds::default(),
        }
    }

    /// Replace the thresholds
    #[must_use]
    pub const fn with_thresholds(mut self, thresholds: MotionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Vertical tracking signal of a frame
    ///
    /// Mean `y` of the tracking joints detected with at least `min_confidence`;
    /// `None` when none qualifies.
    #[must_use]
    pub fn tracking_signal(&self, frame: &Frame, min_confidence: f64) -> Option<f64> {
        let (sum, count) = self
            .tracking_joints
            .iter()
            .filter_map(|joint| frame.confident_joint(*joint, min_confidence))
            .fold((0.0, 0_u32), |(sum, count), position| {
                (sum + position.y, count + 1)
            });
        (count > 0).then(|| sum / f64::from(count))
    }

    /// Index of the deepest frame of a span, measured from its first frame
    ///
    /// `descent_sign` is the direction the segmenter locked for the span.
    /// Without it an `Auto` profile takes the direction of the first movement
    /// beyond the start displacement.
    #[must_use]
    pub fn deepest_frame(
        &self,
        frames: &[Frame],
        descent_sign: Option<f64>,
        min_confidence: f64,
    ) -> Option<usize> {
        let signals: Vec<(usize, f64)> = frames
            .iter()
            .enumerate()
            .filter_map(|(index, frame)| {
                self.tracking_signal(frame, min_confidence)
                    .map(|signal| (index, signal))
            })
            .collect();
        let (_, top) = *signals.first()?;

        let sign = descent_sign
            .or_else(|| self.direction.sign())
            .or_else(|| {
                signals
                    .iter()
                    .map(|&(_, signal)| signal - top)
                    .find(|offset| offset.abs() >= self.thresholds.start_displacement)
                    .map(f64::signum)
            });

        signals
            .iter()
            .map(|&(index, signal)| {
                let offset = signal - top;
                (index, sign.map_or_else(|| offset.abs(), |sign| sign * offset))
            })
            .max_by(|a, b| a.1.total_cmp(&b.1).then(b.0.cmp(&a.0)))
            .map(|(index, _)| index)
    }
}

/// Everything known about one exercise: metadata, motion, and rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProfile {
    /// Canonical identifier
    pub id: ExerciseId,
    /// Alternative names that resolve to this profile
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<ExerciseId>,
    /// Human-readable name
    pub display_name: String,
    /// Short description of the movement
    #[serde(default)]
    pub description: String,
    /// Muscles primarily worked
    #[serde(default)]
    pub primary_muscles: Vec<String>,
    /// Muscles secondarily worked
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    /// General coaching tips
    #[serde(default)]
    pub tips: Vec<String>,
    /// Segmentation settings
    pub motion: MotionProfile,
    /// Scoring rules
    pub rubric: Rubric,
}

impl ExerciseProfile {
    /// Create a profile without display metadata
    #[must_use]
    pub fn new(id: impl Into<ExerciseId>, motion: MotionProfile, rubric: Rubric) -> Self {
        let id = id.into();
        Self {
            display_name: id.to_string(),
            id,
            aliases: Vec::new(),
            description: String::new(),
            primary_muscles: Vec::new(),
            secondary_muscles: Vec::new(),
            tips: Vec::new(),
            motion,
            rubric,
        }
    }
}
