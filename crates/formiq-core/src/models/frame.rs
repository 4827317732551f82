// ABOUTME: Timestamped pose frame holding normalized joint positions
// ABOUTME: Immutable unit of data flowing from the pose extractor to the segmenter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::joint::{Joint, JointPosition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One pose estimate at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,
    /// Detected joints (missing joints were not detected at all)
    pub joints: BTreeMap<Joint, JointPosition>,
}

impl Frame {
    /// Create an empty frame at the given timestamp
    #[must_use]
    pub const fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            joints: BTreeMap::new(),
        }
    }

    /// Builder-style joint insertion
    #[must_use]
    pub fn with_joint(mut self, joint: Joint, position: JointPosition) -> Self {
        self.joints.insert(joint, position);
        self
    }

    /// Position of a joint, if detected
    #[must_use]
    pub fn joint(&self, joint: Joint) -> Option<&JointPosition> {
        self.joints.get(&joint)
    }

    /// Position of a joint, if detected with at least `min_confidence`
    #[must_use]
    pub fn confident_joint(&self, joint: Joint, min_confidence: f64) -> Option<&JointPosition> {
        self.joints
            .get(&joint)
            .filter(|position| position.is_confident(min_confidence))
    }

    /// Confidence of a joint, `0.0` when not detected
    #[must_use]
    pub fn confidence(&self, joint: Joint) -> f64 {
        self.joints.get(&joint).map_or(0.0, |position| position.confidence)
    }
}
