// ABOUTME: Planar and spatial geometry over joint positions
// ABOUTME: Joint angles, segment inclination from vertical, and axis offsets in degrees/units
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use formiq_core::models::JointPosition;
use serde::{Deserialize, Serialize};

/// Squared vector length below which a segment is considered degenerate
const DEGENERATE_EPSILON: f64 = 1e-12;

/// Image axis used by offset metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Horizontal
    X,
    /// Vertical (grows downward)
    Y,
}

impl Axis {
    /// Coordinate of a position along this axis
    #[must_use]
    pub const fn coordinate(self, position: &JointPosition) -> f64 {
        match self {
            Self::X => position.x,
            Self::Y => position.y,
        }
    }
}

/// Interior angle at `vertex` formed by `proximal` and `distal`, in degrees
///
/// Uses depth when all three positions carry it. Returns `None` when either
/// segment has zero length.
#[must_use]
pub fn joint_angle(
    proximal: &JointPosition,
    vertex: &JointPosition,
    distal: &JointPosition,
) -> Option<f64> {
    let depth = match (proximal.z, vertex.z, distal.z) {
        (Some(a), Some(b), Some(c)) => Some((a - b, c - b)),
        _ => None,
    };
    let (az, cz) = depth.unwrap_or((0.0, 0.0));

    let a = (proximal.x - vertex.x, proximal.y - vertex.y, az);
    let c = (distal.x - vertex.x, distal.y - vertex.y, cz);

    let len_a = a.0.mul_add(a.0, a.1.mul_add(a.1, a.2 * a.2));
    let len_c = c.0.mul_add(c.0, c.1.mul_add(c.1, c.2 * c.2));
    if len_a < DEGENERATE_EPSILON || len_c < DEGENERATE_EPSILON {
        return None;
    }

    let dot = a.0.mul_add(c.0, a.1.mul_add(c.1, a.2 * c.2));
    let cosine = (dot / (len_a.sqrt() * len_c.sqrt())).clamp(-1.0, 1.0);
    Some(cosine.acos().to_degrees())
}

/// Inclination of the segment `lower -> upper` away from upright, in degrees
///
/// `0` means `upper` is directly above `lower`, `90` horizontal, and values
/// above `90` mean `upper` has dropped below `lower`.
#[must_use]
pub fn inclination_from_vertical(upper: &JointPosition, lower: &JointPosition) -> Option<f64> {
    let dx = upper.x - lower.x;
    let rise = lower.y - upper.y;
    if dx.mul_add(dx, rise * rise) < DEGENERATE_EPSILON {
        return None;
    }
    Some(dx.abs().atan2(rise).to_degrees())
}

/// Absolute distance between two joints along one axis
#[must_use]
pub fn axis_offset(joint: &JointPosition, reference: &JointPosition, axis: Axis) -> f64 {
    (axis.coordinate(joint) - axis.coordinate(reference)).abs()
}

