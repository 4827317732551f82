// ABOUTME: Streaming analysis pipeline: extraction, segmentation and scoring as tokio tasks
// ABOUTME: Bounded queues between stages, cooperative cancellation, history lookup and persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Pipeline
//!
//! One pipeline run analyzes one recording:
//!
//! ```text
//! PoseExtractor ──batches──▶ RepSegmenter ──repetitions──▶ FormScorer
//!                 (bounded)                  (bounded)          │
//!                                                               ▼
//!            HistoryStore ◀── SessionSummary ◀── SessionAggregator
//! ```
//!
//! Each stage runs in its own task. Queues are bounded so a slow consumer
//! blocks its producer instead of dropping data. Cancellation is cooperative:
//! extraction and segmentation stop before pulling their next input, the
//! segmenter then applies its end-of-stream rule to the truncated tail, and
//! the scorer drains whatever repetitions were already queued.

/// Raw pose normalization
pub mod adapter;
/// Pose extractor trait, replay extractor and timeout/retry guard
pub mod extractor;
/// Session report and highlights
pub mod report;

pub use adapter::{PoseAdapter, RawKeypoint, RawPose};
pub use extractor::{
    ExtractorError, FrameStream, GuardedExtractor, PoseExtractor, ReplayExtractor,
};
pub use report::{Diagnostic, Highlight, HighlightKind, SessionReport, SessionStatus};

use crate::config::PipelineConfig;
use crate::history::HistoryStore;
use formiq_core::errors::{AnalysisError, AnalysisResult};
use formiq_core::models::{
    ExcludedRepetition, Frame, RepScore, Repetition, SessionMeta, SessionSummary, TrendDelta,
};
use formiq_intelligence::config::ScoringConfig;
use formiq_intelligence::rubric::{ExerciseProfile, RubricCatalog};
use formiq_intelligence::{FormScorer, RepSegmenter, SegmentEvent, SessionAggregator};
use std::sync::Arc;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::task::{JoinError, JoinHandle};
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

/// What the segmentation stage observed
#[derive(Debug, Default)]
struct SegmentationOutcome {
    frames_processed: usize,
    diagnostics: Vec<AnalysisError>,
    excluded: Vec<ExcludedRepetition>,
}

impl SegmentationOutcome {
    /// Route segmenter events: repetitions downstream, problems into diagnostics
    ///
    /// Returns `false` once the scoring stage has gone away.
    async fn route(&mut self, events: Vec<SegmentEvent>, repetitions: &Sender<Repetition>) -> bool {
        for event in events {
            match event {
                SegmentEvent::Repetition(repetition) => {
                    if repetitions.send(repetition).await.is_err() {
                        return false;
                    }
                }
                SegmentEvent::RepetitionRejected { rep_index, error } => {
                    self.excluded.push(ExcludedRepetition {
                        rep_index,
                        code: error.code(),
                        reason: error.to_string(),
                    });
                    self.diagnostics.push(error);
                }
                SegmentEvent::TrackingRecovered { .. } => {}
                other => self.diagnostics.extend(other.diagnostic()),
            }
        }
        true
    }
}

/// Analyzes recordings against a rubric catalog
#[derive(Clone)]
pub struct AnalysisPipeline {
    catalog: Arc<RubricCatalog>,
    history: Arc<dyn HistoryStore>,
    config: PipelineConfig,
}

impl AnalysisPipeline {
    /// Create a pipeline over a validated catalog and a history store
    #[must_use]
    pub fn new(
        catalog: Arc<RubricCatalog>,
        history: Arc<dyn HistoryStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            catalog,
            history,
            config,
        }
    }

    /// Catalog used to resolve exercises
    #[must_use]
    pub fn catalog(&self) -> &RubricCatalog {
        &self.catalog
    }

    /// Pipeline settings
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze one recording
    ///
    /// The returned report is `Cancelled` when `cancel` fired before the
    /// extractor finished; cancelled sessions are summarized but not
    /// persisted. Segmentation problems, excluded repetitions and history
    /// failures are reported as diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `UnknownExercise` when the exercise has no rubric (and the
    /// fallback policy is `reject`), `ExtractionStalled`/`ExtractionFailed`
    /// when the extractor gives up, and `Internal` if a stage task panics
    pub async fn analyze(
        &self,
        meta: &SessionMeta,
        extractor: Box<dyn PoseExtractor>,
        cancel: &CancellationToken,
    ) -> AnalysisResult<SessionReport> {
        let span = info_span!(
            "analyze_session",
            session.id = %meta.session_id,
            user.id = %meta.user_id,
            exercise = %meta.exercise,
        );
        self.run(meta, extractor, cancel).instrument(span).await
    }

    async fn run(
        &self,
        meta: &SessionMeta,
        extractor: Box<dyn PoseExtractor>,
        cancel: &CancellationToken,
    ) -> AnalysisResult<SessionReport> {
        let profile = Arc::new(
            self.catalog
                .resolve(&meta.exercise, self.config.rubric_fallback)?
                .clone(),
        );
        info!(
            extractor = extractor.name(),
            rubric = %profile.id,
            rules = profile.rubric.rules.len(),
            "Session analysis started"
        );

        let mut diagnostics: Vec<AnalysisError> = Vec::new();
        let (prior, history_failed) = match self
            .history
            .latest(&meta.user_id, &meta.exercise, meta.recorded_at)
            .await
        {
            Ok(prior) => (prior, false),
            Err(error) => {
                warn!(error = %error, "Prior session unavailable, trend not comparable");
                diagnostics.push(error.into());
                (None, true)
            }
        };

        let (frame_tx, frame_rx) = mpsc::channel::<Vec<Frame>>(self.config.frame_queue_capacity);
        let (rep_tx, rep_rx) = mpsc::channel::<Repetition>(self.config.rep_queue_capacity);

        let stream = GuardedExtractor::new(extractor, self.config.extractor.clone()).into_stream();
        let segmenter = RepSegmenter::new(
            meta.exercise.clone(),
            profile.motion.clone(),
            self.config.intelligence.segmentation.clone(),
        );

        let extraction: JoinHandle<AnalysisResult<usize>> = tokio::spawn(
            run_extraction(stream, frame_tx, cancel.clone()).in_current_span(),
        );
        let segmentation: JoinHandle<SegmentationOutcome> = tokio::spawn(
            run_segmentation(segmenter, frame_rx, rep_tx, cancel.clone()).in_current_span(),
        );
        let scoring: JoinHandle<Vec<RepScore>> = tokio::spawn(
            run_scoring(
                Arc::clone(&profile),
                self.config.intelligence.scoring.clone(),
                Arc::clone(&self.catalog),
                rep_rx,
            )
            .in_current_span(),
        );

        let (extracted, segmented, scored) = tokio::join!(extraction, segmentation, scoring);
        let batches = extracted.map_err(|e| stage_failed("extraction", &e))??;
        let segmented = segmented.map_err(|e| stage_failed("segmentation", &e))?;
        let rep_scores = scored.map_err(|e| stage_failed("scoring", &e))?;

        let status = if cancel.is_cancelled() {
            SessionStatus::Cancelled
        } else {
            SessionStatus::Completed
        };
        debug!(batches, frames = segmented.frames_processed, ?status, "Stages finished");
        diagnostics.extend(segmented.diagnostics);

        let aggregator = SessionAggregator::new(self.config.intelligence.aggregation.clone());
        let mut summary =
            aggregator.aggregate(meta, rep_scores, segmented.excluded, prior.as_ref());
        if history_failed {
            summary.trend = TrendDelta::NotComparable;
        }

        let persisted = self.persist(&summary, status, &mut diagnostics).await;
        let highlights = report::highlights(&summary, &profile);

        info!(
            status = ?status,
            reps = summary.rep_count(),
            aggregate = ?summary.aggregate_score,
            diagnostics = diagnostics.len(),
            persisted,
            "Session analysis finished"
        );

        Ok(SessionReport {
            summary,
            status,
            diagnostics: diagnostics.iter().map(Diagnostic::from).collect(),
            highlights,
            persisted,
            frames_processed: segmented.frames_processed,
        })
    }

    async fn persist(
        &self,
        summary: &SessionSummary,
        status: SessionStatus,
        diagnostics: &mut Vec<AnalysisError>,
    ) -> bool {
        if status == SessionStatus::Cancelled {
            debug!("Cancelled session not persisted");
            return false;
        }
        match self.history.save(summary).await {
            Ok(key) => {
                debug!(key = %key, "Session summary persisted");
                true
            }
            Err(error) => {
                warn!(error = %error, "Failed to persist session summary");
                diagnostics.push(error.into());
                false
            }
        }
    }
}

/// Pull batches from the guarded extractor into the frame queue
async fn run_extraction(
    mut stream: FrameStream,
    frames: Sender<Vec<Frame>>,
    cancel: CancellationToken,
) -> AnalysisResult<usize> {
    let mut batches = 0;
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(batches, "Extraction cancelled");
                break;
            }
            next = stream.next() => next,
        };
        let Some(batch) = next else {
            break;
        };
        if frames.send(batch?).await.is_err() {
            debug!("Segmentation stage closed, stopping extraction");
            break;
        }
        batches += 1;
    }
    Ok(batches)
}

/// Feed frames through the segmenter and forward repetitions
async fn run_segmentation(
    mut segmenter: RepSegmenter,
    mut frames: Receiver<Vec<Frame>>,
    repetitions: Sender<Repetition>,
    cancel: CancellationToken,
) -> SegmentationOutcome {
    let mut outcome = SegmentationOutcome::default();
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(frames = outcome.frames_processed, "Segmentation cancelled");
                break;
            }
            next = frames.recv() => next,
        };
        let Some(batch) = next else {
            break;
        };
        for frame in batch {
            outcome.frames_processed += 1;
            let events = segmenter.push(frame);
            if !outcome.route(events, &repetitions).await {
                return outcome;
            }
        }
    }

    let tail = segmenter.finish();
    outcome.route(tail, &repetitions).await;
    outcome
}

/// Score repetitions until the segmentation stage closes the queue
async fn run_scoring(
    profile: Arc<ExerciseProfile>,
    config: ScoringConfig,
    catalog: Arc<RubricCatalog>,
    mut repetitions: Receiver<Repetition>,
) -> Vec<RepScore> {
    let scorer = FormScorer::new(catalog, config);
    let mut scores = Vec::new();
    while let Some(repetition) = repetitions.recv().await {
        let score = scorer.score_with_profile(&profile, &repetition);
        info!(
            rep.index = score.rep_index,
            rep.score = score.score,
            rep.incomplete = score.incomplete,
            deviations = score.deviations.len(),
            "Repetition scored"
        );
        scores.push(score);
    }
    scores
}

fn stage_failed(stage: &str, error: &JoinError) -> AnalysisError {
    AnalysisError::internal(format!("{stage} stage failed: {error}"))
}
