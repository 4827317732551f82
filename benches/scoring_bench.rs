// ABOUTME: Criterion benchmarks for rep segmentation, rubric scoring, and the full pipeline
// ABOUTME: Runs on synthetic side-on squat recordings of increasing length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the form-analysis engine.
//!
//! Measures frame throughput of the segmenter, per-repetition scoring cost,
//! parallel batch scoring, and an end-to-end pipeline run over a replayed
//! recording.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use formiq::config::PipelineConfig;
use formiq::history::InMemoryHistoryStore;
use formiq::models::{ExerciseId, Frame, Joint, JointPosition, Repetition, SessionMeta};
use formiq::pipeline::{AnalysisPipeline, ReplayExtractor};
use formiq::rubric::RubricCatalog;
use formiq_intelligence::config::{ScoringConfig, SegmentationConfig};
use formiq_intelligence::form_scorer::score_repetition;
use formiq_intelligence::{FormScorer, RepSegmenter};
use std::f64::consts::PI;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

const FRAME_INTERVAL_MS: u64 = 33;
const FRAMES_PER_CYCLE: u64 = 61;
const REST_FRAMES: u64 = 5;

/// Side-on squat pose at `depth` (0 = standing, 1 = bottom)
fn squat_frame(timestamp_ms: u64, depth: f64, knee_shift: f64) -> Frame {
    let hip_x = 0.14_f64.mul_add(-depth, 0.5);
    let hip_y = 0.25_f64.mul_add(depth, 0.5);
    let shoulder_y = hip_y - 0.3;
    let joints = [
        (Joint::Nose, 0.52, shoulder_y - 0.12),
        (Joint::LeftShoulder, 0.5, shoulder_y),
        (Joint::LeftElbow, 0.56, shoulder_y + 0.1),
        (Joint::LeftWrist, 0.52, shoulder_y + 0.02),
        (Joint::LeftHip, hip_x, hip_y),
        (Joint::LeftKnee, knee_shift.mul_add(depth, 0.56), 0.75),
        (Joint::LeftAnkle, 0.5, 0.95),
    ];

    joints
        .into_iter()
        .flat_map(|(joint, x, y)| [(joint, x, y), (joint.mirror(), x, y)])
        .fold(Frame::new(timestamp_ms), |frame, (joint, x, y)| {
            frame.with_joint(joint, JointPosition::new(x, y, 0.95))
        })
}

/// Recording of `reps` squat cycles with short rests in between
fn squat_recording(reps: u64, knee_shift: f64) -> Vec<Frame> {
    let mut frames = Vec::new();
    let mut at_ms = 0;
    let mut push = |depth: f64| {
        frames.push(squat_frame(at_ms, depth, knee_shift));
        at_ms += FRAME_INTERVAL_MS;
    };

    for _ in 0..10 {
        push(0.0);
    }
    for _ in 0..reps {
        for index in 0..FRAMES_PER_CYCLE {
            let phase = 2.0 * PI * (index * FRAME_INTERVAL_MS) as f64 / 2_000.0;
            push((1.0 - phase.cos()) / 2.0);
        }
        for _ in 0..REST_FRAMES {
            push(0.0);
        }
    }
    frames
}

fn squat_segmenter(catalog: &RubricCatalog) -> RepSegmenter {
    let profile = catalog.get(&ExerciseId::new("squat")).unwrap();
    RepSegmenter::for_profile(profile, SegmentationConfig::default())
}

fn bench_segmentation(c: &mut Criterion) {
    let catalog = RubricCatalog::builtin().unwrap();
    let mut group = c.benchmark_group("segmentation");

    for reps in [5_u64, 20, 100] {
        let frames = squat_recording(reps, 0.0);
        group.throughput(Throughput::Elements(frames.len() as u64));
        group.bench_with_input(BenchmarkId::new("squat_reps", reps), &frames, |b, frames| {
            b.iter(|| {
                let segmenter = squat_segmenter(&catalog);
                let count = segmenter.segment(black_box(frames.clone())).repetitions().count();
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let catalog = RubricCatalog::builtin().unwrap();
    let profile = catalog.get(&ExerciseId::new("squat")).unwrap().clone();
    let config = ScoringConfig::default();
    let mut group = c.benchmark_group("scoring");

    let clean: Vec<Repetition> = squat_segmenter(&catalog)
        .segment(squat_recording(1, 0.0))
        .repetitions()
        .collect();
    let faulty: Vec<Repetition> = squat_segmenter(&catalog)
        .segment(squat_recording(1, 0.1))
        .repetitions()
        .collect();

    group.bench_function("score_repetition_clean", |b| {
        b.iter(|| black_box(score_repetition(&profile, black_box(&clean[0]), &config)));
    });
    group.bench_function("score_repetition_with_deviation", |b| {
        b.iter(|| black_box(score_repetition(&profile, black_box(&faulty[0]), &config)));
    });

    let scorer = FormScorer::new(Arc::new(catalog.clone()), config.clone());
    let session: Vec<Repetition> = squat_segmenter(&catalog)
        .segment(squat_recording(50, 0.1))
        .repetitions()
        .collect();
    group.throughput(Throughput::Elements(session.len() as u64));
    group.bench_function("score_batch_50_reps", |b| {
        b.iter(|| black_box(scorer.score_batch(black_box(&session))));
    });

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let catalog = Arc::new(RubricCatalog::builtin().unwrap());
    let pipeline = AnalysisPipeline::new(
        catalog,
        Arc::new(InMemoryHistoryStore::new()),
        PipelineConfig::default(),
    );
    let frames = squat_recording(20, 0.05);

    let mut group = c.benchmark_group("pipeline");
    group.throughput(Throughput::Elements(frames.len() as u64));
    group.bench_function("analyze_20_squats", |b| {
        b.to_async(&runtime).iter(|| {
            let extractor = ReplayExtractor::new(frames.clone());
            let meta = SessionMeta::new("bench-user", ExerciseId::new("squat"));
            let pipeline = pipeline.clone();
            async move {
                let report = pipeline
                    .analyze(&meta, Box::new(extractor), &CancellationToken::new())
                    .await
                    .unwrap();
                black_box(report.summary.aggregate_score)
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_scoring, bench_pipeline);
criterion_main!(benches);
