// ABOUTME: Tests for pose normalization, replay extraction, and the timeout/retry guard
// ABOUTME: Covers keypoint mapping, mirroring, JSON-lines replay files, and stall escalation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{fast_extractor_config, squat_frame, ScriptedExtractor, StalledExtractor, Step};
use formiq::errors::ErrorCode;
use formiq::models::{Frame, Joint};
use formiq::pipeline::{
    ExtractorError, GuardedExtractor, PoseAdapter, PoseExtractor, RawKeypoint, RawPose,
    ReplayExtractor,
};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio_stream::StreamExt;

const EPSILON: f64 = 1e-9;

fn keypoint(name: &str, x: f64, y: f64, score: f64) -> RawKeypoint {
    RawKeypoint {
        name: name.to_owned(),
        x,
        y,
        z: None,
        score,
    }
}

fn raw_pose(timestamp_ms: u64, keypoints: Vec<RawKeypoint>) -> RawPose {
    RawPose {
        timestamp_ms,
        width: 640.0,
        height: 480.0,
        keypoints,
    }
}

#[test]
fn test_normalize_scales_by_image_size() {
    let raw = raw_pose(
        120,
        vec![
            keypoint("left_shoulder", 320.0, 120.0, 0.9),
            keypoint("rightHip", 160.0, 240.0, 0.8),
        ],
    );
    let frame = PoseAdapter::new().normalize(&raw).unwrap();

    assert_eq!(frame.timestamp_ms, 120);
    let shoulder = frame.joint(Joint::LeftShoulder).unwrap();
    assert!((shoulder.x - 0.5).abs() < EPSILON);
    assert!((shoulder.y - 0.25).abs() < EPSILON);
    assert!((shoulder.confidence - 0.9).abs() < EPSILON);
    assert!(shoulder.z.is_none());

    let hip = frame.joint(Joint::RightHip).unwrap();
    assert!((hip.x - 0.25).abs() < EPSILON);
    assert!((hip.y - 0.5).abs() < EPSILON);
}

#[test]
fn test_normalize_scales_depth_by_width() {
    let mut nose = keypoint("nose", 320.0, 240.0, 0.9);
    nose.z = Some(-64.0);
    let frame = PoseAdapter::new().normalize(&raw_pose(0, vec![nose])).unwrap();
    assert!((frame.joint(Joint::Nose).unwrap().z.unwrap() + 0.1).abs() < EPSILON);
}

#[test]
fn test_normalize_skips_unknown_and_non_finite_keypoints() {
    let raw = raw_pose(
        0,
        vec![
            keypoint("left_pinky", 10.0, 10.0, 0.9),
            keypoint("left_knee", f64::NAN, 10.0, 0.9),
            keypoint("right_knee", 64.0, 48.0, 0.9),
        ],
    );
    let frame = PoseAdapter::new().normalize(&raw).unwrap();
    assert_eq!(frame.joints.len(), 1);
    assert!(frame.joint(Joint::LeftKnee).is_none());
    assert!(frame.joint(Joint::RightKnee).is_some());
}

#[test]
fn test_normalize_clamps_scores() {
    let raw = raw_pose(
        0,
        vec![
            keypoint("left_wrist", 10.0, 10.0, 1.7),
            keypoint("right_wrist", 10.0, 10.0, -0.3),
            keypoint("nose", 10.0, 10.0, f64::NAN),
        ],
    );
    let frame = PoseAdapter::new().normalize(&raw).unwrap();
    assert!((frame.confidence(Joint::LeftWrist) - 1.0).abs() < EPSILON);
    assert!(frame.confidence(Joint::RightWrist).abs() < EPSILON);
    assert!(frame.confidence(Joint::Nose).abs() < EPSILON);
}

#[test]
fn test_duplicate_keypoint_keeps_higher_score() {
    let raw = raw_pose(
        0,
        vec![
            keypoint("left_ankle", 64.0, 48.0, 0.4),
            keypoint("LEFT-ANKLE", 128.0, 96.0, 0.8),
            keypoint("left_ankle", 320.0, 240.0, 0.6),
        ],
    );
    let frame = PoseAdapter::new().normalize(&raw).unwrap();
    let ankle = frame.joint(Joint::LeftAnkle).unwrap();
    assert!((ankle.x - 0.2).abs() < EPSILON);
    assert!((ankle.confidence - 0.8).abs() < EPSILON);
}

#[test]
fn test_mirrored_adapter_swaps_sides() {
    let raw = raw_pose(0, vec![keypoint("left_elbow", 160.0, 240.0, 0.9)]);
    let frame = PoseAdapter::mirrored().normalize(&raw).unwrap();

    assert!(frame.joint(Joint::LeftElbow).is_none());
    let elbow = frame.joint(Joint::RightElbow).unwrap();
    assert!((elbow.x - 0.75).abs() < EPSILON);
    assert!((elbow.y - 0.5).abs() < EPSILON);
}

#[test]
fn test_non_positive_image_size_is_malformed() {
    let mut raw = raw_pose(0, vec![keypoint("nose", 1.0, 1.0, 0.9)]);
    raw.width = 0.0;
    assert!(matches!(
        PoseAdapter::new().normalize(&raw),
        Err(ExtractorError::Malformed(_))
    ));

    let good = raw_pose(33, Vec::new());
    let batch = PoseAdapter::new().normalize_batch(&[good, raw]);
    assert!(batch.is_err());
}

#[test]
fn test_json_lines_accept_frames_and_raw_poses() {
    let frame = squat_frame(0, 0.0, 0.0, 0.9);
    let raw = raw_pose(33, vec![keypoint("left_hip", 320.0, 240.0, 0.9)]);
    let text = format!(
        "{}\n\n{}\n",
        serde_json::to_string(&frame).unwrap(),
        serde_json::to_string(&raw).unwrap()
    );

    let replay = ReplayExtractor::from_json_lines(&text, &PoseAdapter::new()).unwrap();
    assert_eq!(replay.remaining(), 2);
}

#[test]
fn test_json_lines_report_bad_line_number() {
    let frame = serde_json::to_string(&squat_frame(0, 0.0, 0.0, 0.9)).unwrap();
    let text = format!("{frame}\n{{\"timestamp_ms\": \"soon\"}}\n");

    match ReplayExtractor::from_json_lines(&text, &PoseAdapter::new()) {
        Err(ExtractorError::Malformed(reason)) => assert!(reason.starts_with("line 2"), "{reason}"),
        other => panic!("expected malformed line, got {other:?}"),
    }

    let zero_size = r#"{"timestamp_ms": 0, "width": 0, "height": 480, "keypoints": []}"#;
    match ReplayExtractor::from_json_lines(zero_size, &PoseAdapter::new()) {
        Err(ExtractorError::Malformed(reason)) => assert!(reason.starts_with("line 1"), "{reason}"),
        other => panic!("expected malformed pose, got {other:?}"),
    }
}

#[tokio::test]
async fn test_replay_batches_then_ends() {
    let frames: Vec<Frame> = (0..7).map(|i| squat_frame(i * 33, 0.0, 0.0, 0.9)).collect();
    let mut replay = ReplayExtractor::new(frames).with_batch_size(3);
    assert_eq!(replay.name(), "replay");

    let mut sizes = Vec::new();
    while let Some(batch) = replay.next_batch().await.unwrap() {
        sizes.push(batch.len());
    }
    assert_eq!(sizes, vec![3, 3, 1]);
    assert_eq!(replay.remaining(), 0);
    assert!(replay.next_batch().await.unwrap().is_none());
}

#[tokio::test]
async fn test_replay_from_file_uses_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("squat.jsonl");
    let lines: Vec<String> = (0..3)
        .map(|i| serde_json::to_string(&squat_frame(i * 33, 0.0, 0.0, 0.9)).unwrap())
        .collect();
    std::fs::write(&path, lines.join("\n")).unwrap();

    let replay = ReplayExtractor::from_file(&path, &PoseAdapter::new()).await.unwrap();
    assert_eq!(replay.name(), "squat.jsonl");
    assert_eq!(replay.remaining(), 3);

    let missing = ReplayExtractor::from_file(&dir.path().join("missing.jsonl"), &PoseAdapter::new())
        .await
        .unwrap_err();
    assert!(matches!(missing, ExtractorError::Source(_)));
}

#[tokio::test]
async fn test_guard_passes_batches_through() {
    let frames = vec![squat_frame(0, 0.0, 0.0, 0.9), squat_frame(33, 0.0, 0.0, 0.9)];
    let extractor = ScriptedExtractor::new(vec![
        Step::Batch(frames[..1].to_vec()),
        Step::Batch(frames[1..].to_vec()),
    ]);

    let batches: Vec<_> = GuardedExtractor::new(Box::new(extractor), fast_extractor_config())
        .into_stream()
        .collect()
        .await;
    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(Result::is_ok));
}

#[tokio::test]
async fn test_guard_retries_transient_failures() {
    let extractor = ScriptedExtractor::new(vec![
        Step::Fail(ExtractorError::Unavailable("camera warming up".into())),
        Step::Hang(Duration::from_millis(500)),
        Step::Batch(vec![squat_frame(0, 0.0, 0.0, 0.9)]),
    ]);
    let calls = extractor.calls();

    let batches: Vec<_> = GuardedExtractor::new(Box::new(extractor), fast_extractor_config())
        .into_stream()
        .collect()
        .await;

    // One failure and one timeout stay within the budget of two retries
    assert_eq!(batches.len(), 1);
    assert!(batches[0].is_ok());
    assert!(calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_guard_escalates_after_retry_budget() {
    let batches: Vec<_> = GuardedExtractor::new(Box::new(StalledExtractor), fast_extractor_config())
        .into_stream()
        .collect()
        .await;

    assert_eq!(batches.len(), 1);
    let error = batches.into_iter().next().unwrap().unwrap_err();
    assert_eq!(error.code(), ErrorCode::ExtractionStalled);
    match error {
        formiq::errors::AnalysisError::ExtractionStalled {
            extractor,
            attempts,
            ..
        } => {
            assert_eq!(extractor, "stalled");
            assert_eq!(attempts, 3);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn test_guard_reports_last_transient_failure_when_stalled() {
    let extractor = ScriptedExtractor::new(vec![
        Step::Fail(ExtractorError::Unavailable("camera busy".into())),
        Step::Fail(ExtractorError::Unavailable("camera busy".into())),
        Step::Fail(ExtractorError::Unavailable("camera unplugged".into())),
        Step::Batch(vec![squat_frame(0, 0.0, 0.0, 0.9)]),
    ]);
    let calls = extractor.calls();

    let batches: Vec<_> = GuardedExtractor::new(Box::new(extractor), fast_extractor_config())
        .into_stream()
        .collect()
        .await;

    assert_eq!(batches.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match batches.into_iter().next().unwrap() {
        Err(formiq::errors::AnalysisError::ExtractionStalled {
            extractor,
            attempts,
            last_error,
        }) => {
            assert_eq!(extractor, "scripted");
            assert_eq!(attempts, 3);
            assert!(last_error.contains("camera unplugged"), "{last_error}");
        }
        other => panic!("expected stall, got {other:?}"),
    }
}

#[tokio::test]
async fn test_guard_fails_fast_on_permanent_errors() {
    let extractor = ScriptedExtractor::new(vec![
        Step::Fail(ExtractorError::Source("file truncated".into())),
        Step::Batch(vec![squat_frame(0, 0.0, 0.0, 0.9)]),
    ]);
    let calls = extractor.calls();

    let batches: Vec<_> = GuardedExtractor::new(Box::new(extractor), fast_extractor_config())
        .into_stream()
        .collect()
        .await;

    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0].as_ref().unwrap_err().code(),
        ErrorCode::ExtractionFailed
    );
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_only_unavailable_is_retryable() {
    assert!(ExtractorError::Unavailable("x".into()).is_retryable());
    assert!(!ExtractorError::Malformed("x".into()).is_retryable());
    assert!(!ExtractorError::Source("x".into()).is_retryable());

    let error = formiq::errors::extraction_error("replay", &ExtractorError::Malformed("x".into()));
    assert_eq!(error.code(), ErrorCode::ExtractionFailed);
    let error = formiq::errors::extraction_error("replay", &ExtractorError::Unavailable("x".into()));
    assert_eq!(error.code(), ErrorCode::ExtractionStalled);
}
