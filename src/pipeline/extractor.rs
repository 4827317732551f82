// ABOUTME: Pose extractor abstraction, replay extractor, and the timeout/retry guard
// ABOUTME: Turns any extractor into a frame batch stream that escalates to ExtractionStalled
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pose Extractors
//!
//! A [`PoseExtractor`] produces frame batches until the recording ends. The
//! pipeline never calls an extractor directly; it goes through
//! [`GuardedExtractor`], which bounds every call with a timeout and retries
//! transient failures up to a budget before giving up with
//! `AnalysisError::ExtractionStalled`.

use super::adapter::{PoseAdapter, RawPose};
use crate::config::ExtractorConfig;
use async_stream::try_stream;
use async_trait::async_trait;
use formiq_core::errors::AnalysisError;
use formiq_core::models::Frame;
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tokio::time::{sleep, timeout};
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Frames per batch emitted by the replay extractor unless configured
pub const DEFAULT_REPLAY_BATCH_SIZE: usize = 30;

/// Failure reported by a pose extractor
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractorError {
    /// Pose model or video source temporarily unavailable
    #[error("pose source unavailable: {0}")]
    Unavailable(String),

    /// Pose output could not be turned into frames
    #[error("malformed pose output: {0}")]
    Malformed(String),

    /// Video source failed permanently
    #[error("video source failed: {0}")]
    Source(String),
}

impl ExtractorError {
    /// Whether the call may succeed if retried
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Source of pose frames for one recording
#[async_trait]
pub trait PoseExtractor: Send {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Next batch of frames in timestamp order, `None` once the recording ends
    ///
    /// # Errors
    ///
    /// Returns an error when the pose model or video source fails
    async fn next_batch(&mut self) -> Result<Option<Vec<Frame>>, ExtractorError>;
}

/// Stream of frame batches produced by a guarded extractor
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Vec<Frame>, AnalysisError>> + Send>>;

/// Timeout and retry guard around an extractor
pub struct GuardedExtractor {
    inner: Box<dyn PoseExtractor>,
    config: ExtractorConfig,
}

impl GuardedExtractor {
    /// Guard `inner` with the given limits
    #[must_use]
    pub fn new(inner: Box<dyn PoseExtractor>, config: ExtractorConfig) -> Self {
        Self { inner, config }
    }

    /// Convert into a stream of frame batches
    ///
    /// The stream ends when the extractor reports the end of the recording,
    /// and yields a single error (then ends) when the extractor fails
    /// permanently or exceeds the retry budget.
    #[must_use]
    pub fn into_stream(self) -> FrameStream {
        let Self { mut inner, config } = self;
        let timeout_ms = config.batch_timeout.as_millis();

        Box::pin(try_stream! {
            let mut failures: u32 = 0;

            loop {
                let failure = match timeout(config.batch_timeout, inner.next_batch()).await {
                    Ok(Ok(Some(batch))) => {
                        failures = 0;
                        yield batch;
                        continue;
                    }
                    Ok(Ok(None)) => {
                        debug!(extractor = inner.name(), "Extractor reached end of recording");
                        break;
                    }
                    Ok(Err(error)) if error.is_retryable() => error.to_string(),
                    Ok(Err(error)) => Err(AnalysisError::ExtractionFailed {
                        extractor: inner.name().to_owned(),
                        reason: error.to_string(),
                    })?,
                    Err(_) => format!("no frame batch within {timeout_ms}ms"),
                };

                failures += 1;
                if failures > config.max_retries {
                    warn!(
                        extractor = inner.name(),
                        attempts = failures,
                        last_error = %failure,
                        "Extractor stalled, retry budget exhausted"
                    );
                    Err(AnalysisError::ExtractionStalled {
                        extractor: inner.name().to_owned(),
                        attempts: failures,
                        last_error: failure,
                    })?;
                } else {
                    warn!(
                        extractor = inner.name(),
                        attempt = failures,
                        max_retries = config.max_retries,
                        error = %failure,
                        "Extractor call failed, retrying"
                    );
                    sleep(config.retry_backoff).await;
                }
            }
        })
    }
}

/// One line of a replay file: a normalized frame or raw model output
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayRecord {
    Frame(Frame),
    Raw(RawPose),
}

/// Replays previously captured frames
///
/// Used by the CLI to analyze recorded pose output and by tests to drive the
/// pipeline with synthetic motion.
#[derive(Debug, Clone)]
pub struct ReplayExtractor {
    name: String,
    frames: VecDeque<Frame>,
    batch_size: usize,
    pacing: Option<Duration>,
}

impl ReplayExtractor {
    /// Replay `frames` in batches of [`DEFAULT_REPLAY_BATCH_SIZE`]
    #[must_use]
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            name: "replay".into(),
            frames: frames.into(),
            batch_size: DEFAULT_REPLAY_BATCH_SIZE,
            pacing: None,
        }
    }

    /// Override the batch size (at least one frame)
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Wait `pacing` before every batch, imitating a live capture
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Override the name reported in logs
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Frames not yet handed out
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    /// Parse JSON lines, each holding a [`Frame`] or a [`RawPose`]
    ///
    /// Raw poses are normalized with `adapter`. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Malformed` naming the first line that cannot
    /// be parsed or normalized
    pub fn from_json_lines(text: &str, adapter: &PoseAdapter) -> Result<Self, ExtractorError> {
        let mut frames = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: ReplayRecord = serde_json::from_str(line).map_err(|e| {
                ExtractorError::Malformed(format!("line {}: {e}", line_no + 1))
            })?;
            let frame = match record {
                ReplayRecord::Frame(frame) => frame,
                ReplayRecord::Raw(raw) => adapter.normalize(&raw).map_err(|e| {
                    ExtractorError::Malformed(format!("line {}: {e}", line_no + 1))
                })?,
            };
            frames.push(frame);
        }
        Ok(Self::new(frames))
    }

    /// Load a JSON-lines replay file
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError::Source` if the file cannot be read and
    /// `ExtractorError::Malformed` if a line cannot be parsed
    pub async fn from_file(path: &Path, adapter: &PoseAdapter) -> Result<Self, ExtractorError> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| ExtractorError::Source(format!("{}: {e}", path.display())))?;
        let name = path
            .file_name()
            .map_or_else(|| "replay".into(), |name| name.to_string_lossy().into_owned());
        Ok(Self::from_json_lines(&text, adapter)?.with_name(name))
    }
}

#[async_trait]
impl PoseExtractor for ReplayExtractor {
    fn name(&self) -> &str {
        &self.name
    }

    async fn next_batch(&mut self) -> Result<Option<Vec<Frame>>, ExtractorError> {
        if self.frames.is_empty() {
            return Ok(None);
        }
        if let Some(pacing) = self.pacing {
            sleep(pacing).await;
        }
        let take = self.batch_size.min(self.frames.len());
        Ok(Some(self.frames.drain(..take).collect()))
    }
}
