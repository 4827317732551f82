// ABOUTME: Normalizes raw pose-model keypoints (pixel coordinates, named, scored) into Frames
// ABOUTME: Maps keypoint names onto joints and scales coordinates by the image size
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::extractor::ExtractorError;
use formiq_core::models::{Frame, Joint, JointPosition};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One keypoint as reported by a pose model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawKeypoint {
    /// Model keypoint name, e.g. `left_shoulder` or `leftShoulder`
    pub name: String,
    /// Horizontal pixel coordinate
    pub x: f64,
    /// Vertical pixel coordinate (grows downward)
    pub y: f64,
    /// Depth in pixel units, when the model estimates it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection score
    pub score: f64,
}

/// Pose model output for one video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPose {
    /// Milliseconds since the start of the recording
    pub timestamp_ms: u64,
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
    /// Detected keypoints
    pub keypoints: Vec<RawKeypoint>,
}

/// Converts raw pose output into normalized frames
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseAdapter {
    mirrored: bool,
}

impl PoseAdapter {
    /// Create an adapter for an unmirrored camera
    #[must_use]
    pub const fn new() -> Self {
        Self { mirrored: false }
    }

    /// Adapter for a mirrored (front-facing) camera
    ///
    /// Horizontal coordinates are flipped and left/right joints swapped so
    /// that frames describe the athlete's own left and right.
    #[must_use]
    pub const fn mirrored() -> Self {
        Self { mirrored: true }
    }

    /// Normalize one raw pose
    ///
    /// Coordinates are divided by the image size (depth by the width), scores
    /// are clamped to `[0, 1]`. Unknown keypoint names and non-finite
    /// coordinates are skipped. When a joint appears twice the higher score wins.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Malformed` if the image size is not positive
    pub fn normalize(&self, raw: &RawPose) -> Result<Frame, ExtractorError> {
        if !(raw.width.is_finite() && raw.width > 0.0 && raw.height.is_finite() && raw.height > 0.0)
        {
            return Err(ExtractorError::Malformed(format!(
                "image size {}x{} at {}ms is not positive",
                raw.width, raw.height, raw.timestamp_ms
            )));
        }

        let mut frame = Frame::new(raw.timestamp_ms);
        for keypoint in &raw.keypoints {
            let Some(joint) = Joint::from_name(&keypoint.name) else {
                debug!(name = %keypoint.name, "Skipping unknown keypoint");
                continue;
            };
            let joint = if self.mirrored { joint.mirror() } else { joint };
            if !(keypoint.x.is_finite() && keypoint.y.is_finite()) {
                continue;
            }

            let confidence = if keypoint.score.is_finite() {
                keypoint.score.clamp(0.0, 1.0)
            } else {
                0.0
            };
            if frame
                .joint(joint)
                .is_some_and(|existing| existing.confidence >= confidence)
            {
                continue;
            }

            let x = if self.mirrored {
                1.0 - keypoint.x / raw.width
            } else {
                keypoint.x / raw.width
            };
            let y = keypoint.y / raw.height;
            let position = match keypoint.z.filter(|z| z.is_finite()) {
                Some(z) => JointPosition::with_depth(x, y, z / raw.width, confidence),
                None => JointPosition::new(x, y, confidence),
            };
            frame.joints.insert(joint, position);
        }

        Ok(frame)
    }

    /// Normalize a batch, failing on the first malformed pose
    ///
    /// # Errors
    ///
    /// Returns the first normalization failure
    pub fn normalize_batch(&self, raw: &[RawPose]) -> Result<Vec<Frame>, ExtractorError> {
        raw.iter().map(|pose| self.normalize(pose)).collect()
    }
}
