// ABOUTME: Rubric rule definitions: measured metric, sampling, target range, penalty curve
// ABOUTME: Metric evaluation turns a repetition's frames into per-frame samples for one rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::geometry::{self, Axis};
use formiq_core::models::{Frame, Joint, TargetRange};
use serde::{Deserialize, Serialize};

/// Biomechanical quantity measured by a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleMetric {
    /// Interior angle at `vertex`, in degrees
    JointAngle {
        /// Joint on the proximal segment
        proximal: Joint,
        /// Joint where the angle is measured
        vertex: Joint,
        /// Joint on the distal segment
        distal: Joint,
    },
    /// Absolute difference between the same angle on both sides, in degrees
    AngleAsymmetry {
        /// Joint on the proximal segment (left side; mirrored for the right)
        proximal: Joint,
        /// Vertex joint (left side)
        vertex: Joint,
        /// Joint on the distal segment (left side)
        distal: Joint,
    },
    /// Inclination of `lower -> upper` away from vertical, in degrees
    SegmentInclination {
        /// Upper end of the segment
        upper: Joint,
        /// Lower end of the segment
        lower: Joint,
    },
    /// Absolute distance between two joints along an axis, in image units
    JointOffset {
        /// Measured joint
        joint: Joint,
        /// Reference joint
        reference: Joint,
        /// Axis of the offset
        axis: Axis,
    },
    /// Horizontal travel of a joint from its first confident position in the rep
    HorizontalDrift {
        /// Tracked joint
        joint: Joint,
    },
    /// Duration of the repetition, in seconds
    RepDuration,
}

impl RuleMetric {
    /// Every joint the metric reads
    #[must_use]
    pub fn joints(&self) -> Vec<Joint> {
        match self {
            Self::JointAngle {
                proximal,
                vertex,
                distal,
            } => vec![*proximal, *vertex, *distal],
            Self::AngleAsymmetry {
                proximal,
                vertex,
                distal,
            } => vec![
                *proximal,
                *vertex,
                *distal,
                proximal.mirror(),
                vertex.mirror(),
                distal.mirror(),
            ],
            Self::SegmentInclination { upper, lower } => vec![*upper, *lower],
            Self::JointOffset {
                joint, reference, ..
            } => vec![*joint, *reference],
            Self::HorizontalDrift { joint } => vec![*joint],
            Self::RepDuration => Vec::new(),
        }
    }

    /// The same metric measured on the opposite side of the body
    #[must_use]
    pub fn mirrored(&self) -> Self {
        match self {
            Self::JointAngle {
                proximal,
                vertex,
                distal,
            } => Self::JointAngle {
                proximal: proximal.mirror(),
                vertex: vertex.mirror(),
                distal: distal.mirror(),
            },
            Self::SegmentInclination { upper, lower } => Self::SegmentInclination {
                upper: upper.mirror(),
                lower: lower.mirror(),
            },
            Self::JointOffset {
                joint,
                reference,
                axis,
            } => Self::JointOffset {
                joint: joint.mirror(),
                reference: reference.mirror(),
                axis: *axis,
            },
            Self::HorizontalDrift { joint } => Self::HorizontalDrift {
                joint: joint.mirror(),
            },
            Self::AngleAsymmetry { .. } | Self::RepDuration => self.clone(),
        }
    }

    /// Per-frame samples of this metric over a repetition's frames
    ///
    /// `None` marks frames where a required joint was missing or below
    /// `min_confidence`.
    #[must_use]
    pub fn series(&self, frames: &[Frame], min_confidence: f64) -> Vec<Option<f64>> {
        match self {
            Self::HorizontalDrift { joint } => {
                let mut origin = None;
                frames
                    .iter()
                    .map(|frame| {
                        let x = frame.confident_joint(*joint, min_confidence)?.x;
                        let start = *origin.get_or_insert(x);
                        Some((x - start).abs())
                    })
                    .collect()
            }
            Self::RepDuration => {
                let mut series = vec![None; frames.len()];
                if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
                    let seconds = (last.timestamp_ms - first.timestamp_ms) as f64 / 1000.0;
                    if let Some(slot) = series.last_mut() {
                        *slot = Some(seconds);
                    }
                }
                series
            }
            _ => frames
                .iter()
                .map(|frame| self.sample(frame, min_confidence))
                .collect(),
        }
    }

    fn sample(&self, frame: &Frame, min_confidence: f64) -> Option<f64> {
        let get = |joint: Joint| frame.confident_joint(joint, min_confidence);
        match self {
            Self::JointAngle {
                proximal,
                vertex,
                distal,
            } => geometry::joint_angle(get(*proximal)?, get(*vertex)?, get(*distal)?),
            Self::AngleAsymmetry {
                proximal,
                vertex,
                distal,
            } => {
                let left = geometry::joint_angle(get(*proximal)?, get(*vertex)?, get(*distal)?)?;
                let right = geometry::joint_angle(
                    get(proximal.mirror())?,
                    get(vertex.mirror())?,
                    get(distal.mirror())?,
                )?;
                Some((left - right).abs())
            }
            Self::SegmentInclination { upper, lower } => {
                geometry::inclination_from_vertical(get(*upper)?, get(*lower)?)
            }
            Self::JointOffset {
                joint,
                reference,
                axis,
            } => Some(geometry::axis_offset(get(*joint)?, get(*reference)?, *axis)),
            Self::HorizontalDrift { .. } | Self::RepDuration => None,
        }
    }
}

/// Which frames of a repetition a rule inspects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Every frame; the frame deviating most from the target is reported
    #[default]
    AllFrames,
    /// Only the smallest observed value
    Minimum,
    /// Only the largest observed value
    Maximum,
    /// Only the frame of deepest displacement of the tracking joint
    AtBottom,
}

/// Mapping from deviation magnitude to penalty points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PenaltyCurve {
    /// `per_unit * magnitude`, optionally capped
    Linear {
        /// Points per unit of deviation
        per_unit: f64,
        /// Maximum penalty for this rule
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// `per_unit_squared * magnitude^2`, optionally capped
    Quadratic {
        /// Points per squared unit of deviation
        per_unit_squared: f64,
        /// Maximum penalty for this rule
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cap: Option<f64>,
    },
    /// Fixed penalty for any deviation
    Flat {
        /// Points deducted
        penalty: f64,
    },
}

impl PenaltyCurve {
    /// Penalty for a deviation magnitude; zero magnitude never costs points
    #[must_use]
    pub fn penalty(&self, magnitude: f64) -> f64 {
        if magnitude <= 0.0 {
            return 0.0;
        }
        match *self {
            Self::Linear { per_unit, cap } => Self::capped(per_unit * magnitude, cap),
            Self::Quadratic {
                per_unit_squared,
                cap,
            } => Self::capped(per_unit_squared * magnitude * magnitude, cap),
            Self::Flat { penalty } => penalty,
        }
    }

    fn capped(value: f64, cap: Option<f64>) -> f64 {
        cap.map_or(value, |cap| value.min(cap))
    }

    pub(crate) fn parameters(&self) -> Vec<f64> {
        match *self {
            Self::Linear { per_unit, cap } => [Some(per_unit), cap].into_iter().flatten().collect(),
            Self::Quadratic {
                per_unit_squared,
                cap,
            } => [Some(per_unit_squared), cap].into_iter().flatten().collect(),
            Self::Flat { penalty } => vec![penalty],
        }
    }
}

/// One biomechanical check within a rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricRule {
    /// Stable rule identifier, unique within the rubric
    pub id: String,
    /// Short title shown when the rule is violated (e.g. "Elbow flare")
    pub title: String,
    /// Measured quantity
    pub metric: RuleMetric,
    /// Frames inspected
    #[serde(default)]
    pub sampling: Sampling,
    /// Acceptable range of the metric
    pub target: TargetRange,
    /// Penalty curve applied to the deviation magnitude
    pub penalty: PenaltyCurve,
    /// Lower values are more actionable and listed first among equal severities
    #[serde(default)]
    pub priority: u8,
    /// Also measure the mirrored joints and keep the worse side
    #[serde(default)]
    pub bilateral: bool,
    /// Coaching tip shown with the deviation
    pub tip: String,
    /// Praise shown when the rule is clean for a whole session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub praise: Option<String>,
}

impl RubricRule {
    /// Create a rule sampling every frame with priority 0
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        metric: RuleMetric,
        target: TargetRange,
        penalty: PenaltyCurve,
        tip: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            metric,
            sampling: Sampling::AllFrames,
            target,
            penalty,
            priority: 0,
            bilateral: false,
            tip: tip.into(),
            praise: None,
        }
    }

    /// Set the sampling mode
    #[must_use]
    pub const fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Measure both sides of the body
    #[must_use]
    pub const fn bilateral(mut self) -> Self {
        self.bilateral = true;
        self
    }

    /// Set the praise text
    #[must_use]
    pub fn with_praise(mut self, praise: impl Into<String>) -> Self {
        self.praise = Some(praise.into());
        self
    }

    /// Metric variants evaluated for this rule (one per measured side)
    #[must_use]
    pub fn metrics(&self) -> Vec<RuleMetric> {
        let mirrored = self.metric.mirrored();
        if self.bilateral && mirrored != self.metric {
            vec![self.metric.clone(), mirrored]
        } else {
            vec![self.metric.clone()]
        }
    }
}

/// Ordered set of rules for one exercise
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rubric {
    /// Rules in evaluation order
    pub rules: Vec<RubricRule>,
}

impl Rubric {
    /// Create a rubric from rules
    #[must_use]
    pub const fn new(rules: Vec<RubricRule>) -> Self {
        Self { rules }
    }

    /// Look up a rule by identifier
    #[must_use]
    pub fn rule(&self, id: &str) -> Option<&RubricRule> {
        self.rules.iter().find(|rule| rule.id == id)
    }
}
