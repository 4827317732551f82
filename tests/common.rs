// ABOUTME: Shared test utilities and synthetic pose data for integration tests
// ABOUTME: Provides logging setup, squat motion generators, and scripted pose extractors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cast_precision_loss
)]
//! Shared test utilities for `formiq`
//!
//! Synthetic squats are generated side-on: the ankles stay fixed, the hips
//! travel down and back, the shoulders stay stacked over the midfoot. With
//! `knee_shift == 0.0` every built-in squat rule is satisfied.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use formiq::config::{ExtractorConfig, PipelineConfig};
use formiq::history::{HistoryStore, InMemoryHistoryStore};
use formiq::models::{
    ExerciseId, Frame, Joint, JointPosition, RepScore, ScoreLabel, SessionMeta, SessionSummary,
    TrendDelta,
};
use formiq::pipeline::{AnalysisPipeline, ExtractorError, PoseExtractor};
use formiq::rubric::RubricCatalog;
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Capture interval (about 30 fps)
pub const FRAME_INTERVAL_MS: u64 = 33;
/// Duration of one squat cycle, top to top
pub const CYCLE_MS: u64 = 2_000;
/// Frames sampled per squat cycle
pub const FRAMES_PER_CYCLE: usize = 61;
/// Resting frames before the first cycle
pub const LEAD_IN_FRAMES: usize = 10;
/// Resting frames between cycles
pub const REST_FRAMES: usize = 5;

/// Confidence of joints in a normal frame
pub const CONFIDENT: f64 = 0.95;
/// Confidence below every tracking and sampling threshold
pub const OCCLUDED: f64 = 0.2;

/// Squat depth (0 = standing, 1 = bottom) at `elapsed_ms` into a cycle
pub fn cycle_depth(elapsed_ms: u64) -> f64 {
    let phase = 2.0 * PI * (elapsed_ms as f64) / (CYCLE_MS as f64);
    (1.0 - phase.cos()) / 2.0
}

/// One side-on squat pose
///
/// `knee_shift` pushes the knees forward past the ankles at depth, which
/// violates the knee tracking rule once it exceeds 0.02.
pub fn squat_frame(timestamp_ms: u64, depth: f64, knee_shift: f64, confidence: f64) -> Frame {
    let hip_x = 0.14_f64.mul_add(-depth, 0.5);
    let hip_y = 0.25_f64.mul_add(depth, 0.5);
    let shoulder_y = hip_y - 0.3;
    let knee_x = knee_shift.mul_add(depth, 0.56);

    let joints = [
        (Joint::Nose, 0.52, shoulder_y - 0.12),
        (Joint::LeftShoulder, 0.5, shoulder_y),
        (Joint::LeftElbow, 0.56, shoulder_y + 0.1),
        (Joint::LeftWrist, 0.52, shoulder_y + 0.02),
        (Joint::LeftHip, hip_x, hip_y),
        (Joint::LeftKnee, knee_x, 0.75),
        (Joint::LeftAnkle, 0.5, 0.95),
    ];

    joints
        .into_iter()
        .flat_map(|(joint, x, y)| [(joint, x, y), (joint.mirror(), x, y)])
        .fold(Frame::new(timestamp_ms), |frame, (joint, x, y)| {
            frame.with_joint(joint, JointPosition::new(x, y, confidence))
        })
}

/// Builder for synthetic squat recordings
#[derive(Debug, Clone)]
pub struct SquatRecording {
    frames: Vec<Frame>,
    next_ms: u64,
    knee_shift: f64,
}

impl Default for SquatRecording {
    fn default() -> Self {
        Self::new()
    }
}

impl SquatRecording {
    /// Start a recording with a standing lead-in
    pub fn new() -> Self {
        let mut recording = Self {
            frames: Vec::new(),
            next_ms: 0,
            knee_shift: 0.0,
        };
        recording.rest(LEAD_IN_FRAMES);
        recording
    }

    /// Knee shift applied to every following cycle
    pub fn with_knee_shift(mut self, knee_shift: f64) -> Self {
        self.knee_shift = knee_shift;
        self
    }

    fn push(&mut self, depth: f64, confidence: f64) {
        let frame = squat_frame(self.next_ms, depth, self.knee_shift, confidence);
        self.frames.push(frame);
        self.next_ms += FRAME_INTERVAL_MS;
    }

    /// Standing frames
    pub fn rest(&mut self, frames: usize) -> &mut Self {
        for _ in 0..frames {
            self.push(0.0, CONFIDENT);
        }
        self
    }

    /// Full cycles, each followed by a rest
    pub fn cycles(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.cycle_with(|_, depth| (depth, CONFIDENT));
            self.rest(REST_FRAMES);
        }
        self
    }

    /// One cycle whose frames `occluded` (by index within the cycle) are low confidence
    pub fn occluded_cycle(&mut self, occluded: std::ops::Range<usize>) -> &mut Self {
        self.cycle_with(|index, depth| {
            let confidence = if occluded.contains(&index) {
                OCCLUDED
            } else {
                CONFIDENT
            };
            (depth, confidence)
        });
        self.rest(REST_FRAMES)
    }

    /// One cycle with a pause of `gap_ms` before frame `at_index`
    pub fn gapped_cycle(&mut self, at_index: usize, gap_ms: u64) -> &mut Self {
        for index in 0..FRAMES_PER_CYCLE {
            if index == at_index {
                self.next_ms += gap_ms;
            }
            let depth = cycle_depth(index as u64 * FRAME_INTERVAL_MS);
            self.push(depth, CONFIDENT);
        }
        self.rest(REST_FRAMES)
    }

    /// The first `frames` frames of a cycle, ending the recording mid-movement
    pub fn truncated_cycle(&mut self, frames: usize) -> &mut Self {
        for index in 0..frames.min(FRAMES_PER_CYCLE) {
            let depth = cycle_depth(index as u64 * FRAME_INTERVAL_MS);
            self.push(depth, CONFIDENT);
        }
        self
    }

    fn cycle_with(&mut self, shape: impl Fn(usize, f64) -> (f64, f64)) {
        for index in 0..FRAMES_PER_CYCLE {
            let (depth, confidence) = shape(index, cycle_depth(index as u64 * FRAME_INTERVAL_MS));
            self.push(depth, confidence);
        }
    }

    /// Recorded frames
    pub fn frames(&self) -> Vec<Frame> {
        self.frames.clone()
    }
}

/// Frames of `count` clean squats
pub fn clean_squats(count: usize) -> Vec<Frame> {
    SquatRecording::new().cycles(count).frames()
}

/// Frames of `count` squats with the knees drifting past the toes
pub fn knee_forward_squats(count: usize) -> Vec<Frame> {
    SquatRecording::new()
        .with_knee_shift(0.1)
        .cycles(count)
        .frames()
}

/// Session metadata recorded `hours_ago` hours before now
pub fn session_meta(user: &str, exercise: &str, hours_ago: i64) -> SessionMeta {
    SessionMeta {
        session_id: Uuid::new_v4(),
        user_id: user.to_owned(),
        exercise: ExerciseId::new(exercise),
        recorded_at: Utc::now() - ChronoDuration::hours(hours_ago),
    }
}

/// Minimal rep score for aggregation tests
pub fn rep_score(rep_index: u32, score: f64) -> RepScore {
    RepScore {
        rep_index,
        incomplete: false,
        start_ms: u64::from(rep_index) * CYCLE_MS,
        end_ms: u64::from(rep_index + 1) * CYCLE_MS,
        score,
        label: ScoreLabel::from_score(score),
        deviations: Vec::new(),
        outcomes: Vec::new(),
    }
}

/// Stored summary with only an aggregate score
pub fn stored_summary(
    user: &str,
    exercise: &str,
    recorded_at: DateTime<Utc>,
    aggregate_score: Option<f64>,
) -> SessionSummary {
    SessionSummary {
        session_id: Uuid::new_v4(),
        user_id: user.to_owned(),
        exercise: ExerciseId::new(exercise),
        recorded_at,
        rep_scores: aggregate_score
            .map(|score| vec![rep_score(1, score)])
            .unwrap_or_default(),
        aggregate_score,
        trend: TrendDelta::FirstSession,
        top_deviations: Vec::new(),
        clean_rules: Vec::new(),
        excluded: Vec::new(),
    }
}

/// Extractor limits short enough for tests
pub fn fast_extractor_config() -> ExtractorConfig {
    ExtractorConfig {
        batch_timeout: Duration::from_millis(100),
        max_retries: 2,
        retry_backoff: Duration::from_millis(5),
    }
}

/// Pipeline over the built-in catalog and an in-memory history
pub fn test_pipeline() -> (AnalysisPipeline, InMemoryHistoryStore) {
    test_pipeline_with(PipelineConfig {
        extractor: fast_extractor_config(),
        ..PipelineConfig::default()
    })
}

/// Pipeline with a custom configuration
pub fn test_pipeline_with(config: PipelineConfig) -> (AnalysisPipeline, InMemoryHistoryStore) {
    init_test_logging();
    let catalog = RubricCatalog::builtin().expect("built-in catalog is valid");
    let history = InMemoryHistoryStore::new();
    let pipeline = AnalysisPipeline::new(
        Arc::new(catalog),
        Arc::new(history.clone()) as Arc<dyn HistoryStore>,
        config,
    );
    (pipeline, history)
}

/// One scripted extractor response
#[derive(Debug, Clone)]
pub enum Step {
    /// Return a batch
    Batch(Vec<Frame>),
    /// Return an error
    Fail(ExtractorError),
    /// Sleep before answering with the next step
    Hang(Duration),
}

/// Extractor that plays back a script, then reports the end of the recording
#[derive(Debug)]
pub struct ScriptedExtractor {
    steps: VecDeque<Step>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedExtractor {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of `next_batch` calls, shared with the caller
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl PoseExtractor for ScriptedExtractor {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Frame>>, ExtractorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        loop {
            match self.steps.pop_front() {
                None => return Ok(None),
                Some(Step::Batch(frames)) => return Ok(Some(frames)),
                Some(Step::Fail(error)) => return Err(error),
                Some(Step::Hang(duration)) => tokio::time::sleep(duration).await,
            }
        }
    }
}

/// Extractor that never produces a batch
#[derive(Debug, Default)]
pub struct StalledExtractor;

#[async_trait]
impl PoseExtractor for StalledExtractor {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Frame>>, ExtractorError> {
        tokio::time::sleep(Duration::from_secs(3_600)).await;
        Ok(None)
    }
}
