// ABOUTME: Unit tests for joint-angle and alignment geometry
// ABOUTME: Validates angles, inclination from vertical, offsets, and degenerate segments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use formiq::models::{Frame, Joint, JointPosition};
use formiq::rubric::RuleMetric;
use formiq_intelligence::geometry::{axis_offset, inclination_from_vertical, joint_angle, Axis};

const EPSILON: f64 = 1e-9;

fn at(x: f64, y: f64) -> JointPosition {
    JointPosition::new(x, y, 1.0)
}

#[test]
fn test_right_angle() {
    let angle = joint_angle(&at(0.5, 0.3), &at(0.5, 0.5), &at(0.7, 0.5)).unwrap();
    assert!((angle - 90.0).abs() < EPSILON, "got {angle}");
}

#[test]
fn test_straight_limb_is_180_degrees() {
    let angle = joint_angle(&at(0.5, 0.2), &at(0.5, 0.5), &at(0.5, 0.8)).unwrap();
    assert!((angle - 180.0).abs() < EPSILON, "got {angle}");
}

#[test]
fn test_angle_is_symmetric_in_its_arms() {
    let a = at(0.31, 0.42);
    let vertex = at(0.5, 0.5);
    let c = at(0.66, 0.71);
    let forward = joint_angle(&a, &vertex, &c).unwrap();
    let backward = joint_angle(&c, &vertex, &a).unwrap();
    assert!((forward - backward).abs() < EPSILON);
}

#[test]
fn test_depth_is_used_when_every_joint_has_it() {
    let proximal = JointPosition::with_depth(0.5, 0.3, 0.0, 1.0);
    let vertex = JointPosition::with_depth(0.5, 0.5, 0.0, 1.0);
    let distal = JointPosition::with_depth(0.5, 0.5, 0.2, 1.0);
    let angle = joint_angle(&proximal, &vertex, &distal).unwrap();
    assert!((angle - 90.0).abs() < EPSILON, "got {angle}");

    // Without depth on the distal joint the arm collapses onto the vertex
    let flat = JointPosition::new(0.5, 0.5, 1.0);
    assert!(joint_angle(&proximal, &vertex, &flat).is_none());
}

#[test]
fn test_degenerate_segment_has_no_angle() {
    let vertex = at(0.5, 0.5);
    assert!(joint_angle(&at(0.5, 0.5), &vertex, &at(0.7, 0.5)).is_none());
    assert!(joint_angle(&at(0.3, 0.5), &vertex, &at(0.5, 0.5)).is_none());
}

#[test]
fn test_inclination_from_vertical() {
    let hip = at(0.5, 0.6);

    let upright = inclination_from_vertical(&at(0.5, 0.3), &hip).unwrap();
    assert!(upright.abs() < EPSILON);

    let horizontal = inclination_from_vertical(&at(0.8, 0.6), &hip).unwrap();
    assert!((horizontal - 90.0).abs() < EPSILON);

    let leaning = inclination_from_vertical(&at(0.3, 0.4), &hip).unwrap();
    assert!((leaning - 45.0).abs() < EPSILON);

    // Leaning backwards measures the same as leaning forwards
    let back = inclination_from_vertical(&at(0.7, 0.4), &hip).unwrap();
    assert!((back - leaning).abs() < EPSILON);

    assert!(inclination_from_vertical(&hip, &hip).is_none());
}

#[test]
fn test_axis_offset_is_absolute() {
    let knee = at(0.62, 0.75);
    let ankle = at(0.5, 0.95);
    assert!((axis_offset(&knee, &ankle, Axis::X) - 0.12).abs() < EPSILON);
    assert!((axis_offset(&ankle, &knee, Axis::X) - 0.12).abs() < EPSILON);
    assert!((axis_offset(&knee, &ankle, Axis::Y) - 0.2).abs() < EPSILON);
}

#[test]
fn test_metric_series_skips_low_confidence_frames() {
    let metric = RuleMetric::JointAngle {
        proximal: Joint::LeftShoulder,
        vertex: Joint::LeftElbow,
        distal: Joint::LeftWrist,
    };
    let confident = Frame::new(0)
        .with_joint(Joint::LeftShoulder, at(0.5, 0.3))
        .with_joint(Joint::LeftElbow, at(0.5, 0.5))
        .with_joint(Joint::LeftWrist, at(0.7, 0.5));
    let occluded = Frame::new(33)
        .with_joint(Joint::LeftShoulder, at(0.5, 0.3))
        .with_joint(Joint::LeftElbow, JointPosition::new(0.5, 0.5, 0.1))
        .with_joint(Joint::LeftWrist, at(0.7, 0.5));
    let missing = Frame::new(66).with_joint(Joint::LeftShoulder, at(0.5, 0.3));

    let series = metric.series(&[confident, occluded, missing], 0.5);
    assert_eq!(series.len(), 3);
    assert!((series[0].unwrap() - 90.0).abs() < EPSILON);
    assert_eq!(series[1], None);
    assert_eq!(series[2], None);
}

#[test]
fn test_horizontal_drift_is_measured_from_first_confident_position() {
    let metric = RuleMetric::HorizontalDrift {
        joint: Joint::LeftShoulder,
    };
    let frames = [
        Frame::new(0).with_joint(Joint::LeftShoulder, JointPosition::new(0.1, 0.3, 0.1)),
        Frame::new(33).with_joint(Joint::LeftShoulder, at(0.5, 0.3)),
        Frame::new(66).with_joint(Joint::LeftShoulder, at(0.46, 0.35)),
        Frame::new(99).with_joint(Joint::LeftShoulder, at(0.53, 0.4)),
    ];

    let series = metric.series(&frames, 0.5);
    assert_eq!(series[0], None);
    assert!(series[1].unwrap().abs() < EPSILON);
    assert!((series[2].unwrap() - 0.04).abs() < EPSILON);
    assert!((series[3].unwrap() - 0.03).abs() < EPSILON);
}

#[test]
fn test_rep_duration_sampled_once_on_last_frame() {
    let frames = [Frame::new(1_000), Frame::new(1_500), Frame::new(2_800)];
    let series = RuleMetric::RepDuration.series(&frames, 0.5);
    assert_eq!(series[..2], [None, None]);
    assert!((series[2].unwrap() - 1.8).abs() < EPSILON);
}

#[test]
fn test_mirrored_metric_swaps_sides() {
    let metric = RuleMetric::JointOffset {
        joint: Joint::LeftKnee,
        reference: Joint::LeftAnkle,
        axis: Axis::X,
    };
    assert_eq!(
        metric.mirrored(),
        RuleMetric::JointOffset {
            joint: Joint::RightKnee,
            reference: Joint::RightAnkle,
            axis: Axis::X,
        }
    );
    assert_eq!(RuleMetric::RepDuration.mirrored(), RuleMetric::RepDuration);
}
