// ABOUTME: Unified error taxonomy for the form-analysis pipeline
// ABOUTME: Defines AnalysisError, stable ErrorCode values, and fatality classification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analysis Error Handling
//!
//! Every stage of the pipeline reports failures through [`AnalysisError`].
//! Each variant maps to a stable [`ErrorCode`] so callers (the UI layer, the
//! CLI, log processors) can branch on the code instead of the message.
//!
//! Errors fall into two groups:
//! - **Recoverable** (`TrackingLost`, `InvalidFrame`, `InvalidRepetition`,
//!   `History`): accumulated as session diagnostics, the session continues.
//! - **Fatal** (`UnknownExercise`, `InvalidRubric`, `ExtractionStalled`,
//!   `ExtractionFailed`, `Config`, `Internal`): the recording is aborted.

/// History store error types
pub mod history;

pub use history::HistoryError;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result alias used across the analysis crates
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Stable error codes for the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Segmentation (1000-1999)
    /// Tracking joint confidence dropped for too long
    #[serde(rename = "TRACKING_LOST")]
    TrackingLost = 1000,
    /// Frame rejected (non-monotonic timestamp, malformed joints)
    #[serde(rename = "INVALID_FRAME")]
    InvalidFrame = 1001,
    /// Repetition violates its invariants and was excluded
    #[serde(rename = "INVALID_REPETITION")]
    InvalidRepetition = 1002,

    // Rubrics (2000-2999)
    /// No rubric registered for the exercise identifier
    #[serde(rename = "UNKNOWN_EXERCISE")]
    UnknownExercise = 2000,
    /// Rubric failed validation
    #[serde(rename = "INVALID_RUBRIC")]
    InvalidRubric = 2001,

    // Extraction (3000-3999)
    /// Extractor exhausted its retry budget
    #[serde(rename = "EXTRACTION_STALLED")]
    ExtractionStalled = 3000,
    /// Extractor reported a non-retryable failure
    #[serde(rename = "EXTRACTION_FAILED")]
    ExtractionFailed = 3001,

    // Storage (4000-4999)
    /// History store read or write failure
    #[serde(rename = "HISTORY_ERROR")]
    HistoryError = 4000,

    // Configuration (6000-6999)
    /// Invalid configuration value
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6000,

    // Internal (9000-9999)
    /// Unexpected internal failure (task panicked, channel closed early)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

impl ErrorCode {
    /// Get a user-facing description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::TrackingLost => "We lost sight of you for a moment during the recording",
            Self::InvalidFrame => "A video frame could not be analyzed",
            Self::InvalidRepetition => "A repetition could not be scored",
            Self::UnknownExercise => "This exercise is not supported for form analysis yet",
            Self::InvalidRubric => "The scoring rubric for this exercise is invalid",
            Self::ExtractionStalled | Self::ExtractionFailed => {
                "We couldn't analyze this recording"
            }
            Self::HistoryError => "Your previous sessions could not be loaded or saved",
            Self::ConfigInvalid => "The analysis engine is misconfigured",
            Self::InternalError => "An internal error occurred during analysis",
        }
    }

    /// Whether an error with this code aborts the recording
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        match self {
            Self::TrackingLost
            | Self::InvalidFrame
            | Self::InvalidRepetition
            | Self::HistoryError => false,
            Self::UnknownExercise
            | Self::InvalidRubric
            | Self::ExtractionStalled
            | Self::ExtractionFailed
            | Self::ConfigInvalid
            | Self::InternalError => true,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", *self as u16)
    }
}

/// Errors produced by the form-analysis pipeline
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalysisError {
    /// Tracking joint confidence stayed below threshold for too many frames
    #[error("tracking lost on '{joint}' for {frames} consecutive frames at {at_ms}ms")]
    TrackingLost {
        /// Joint used as the tracking signal
        joint: String,
        /// Number of consecutive low-confidence frames observed
        frames: usize,
        /// Timestamp at which tracking was declared lost
        at_ms: u64,
    },

    /// Frame was rejected before segmentation
    #[error("invalid frame at {at_ms}ms: {reason}")]
    InvalidFrame {
        /// Timestamp of the rejected frame
        at_ms: u64,
        /// Why the frame was rejected
        reason: String,
    },

    /// Repetition invariants violated
    #[error("invalid repetition: {reason}")]
    InvalidRepetition {
        /// Why the repetition is invalid
        reason: String,
    },

    /// No rubric exists for the exercise identifier
    #[error("unknown exercise '{exercise}'")]
    UnknownExercise {
        /// The normalized exercise identifier that was requested
        exercise: String,
    },

    /// Rubric failed validation at load time
    #[error("invalid rubric for '{exercise}': {reason}")]
    InvalidRubric {
        /// Exercise the rubric belongs to
        exercise: String,
        /// Validation failure details
        reason: String,
    },

    /// Extractor timed out or failed repeatedly
    #[error("extraction stalled in '{extractor}' after {attempts} attempts: {last_error}")]
    ExtractionStalled {
        /// Extractor name
        extractor: String,
        /// Consecutive failed attempts
        attempts: u32,
        /// Most recent failure
        last_error: String,
    },

    /// Extractor reported a failure that cannot be retried
    #[error("extraction failed in '{extractor}': {reason}")]
    ExtractionFailed {
        /// Extractor name
        extractor: String,
        /// Failure details
        reason: String,
    },

    /// History store failure
    #[error("history store error: {0}")]
    History(#[from] HistoryError),

    /// Configuration failure
    #[error("configuration error: {reason}")]
    Config {
        /// Failure details
        reason: String,
    },

    /// Unexpected internal failure
    #[error("internal error: {reason}")]
    Internal {
        /// Failure details
        reason: String,
    },
}

impl AnalysisError {
    /// Create an "unknown exercise" error
    #[must_use]
    pub fn unknown_exercise(exercise: impl Into<String>) -> Self {
        Self::UnknownExercise {
            exercise: exercise.into(),
        }
    }

    /// Create an "invalid repetition" error
    #[must_use]
    pub fn invalid_repetition(reason: impl Into<String>) -> Self {
        Self::InvalidRepetition {
            reason: reason.into(),
        }
    }

    /// Create an "invalid rubric" error
    #[must_use]
    pub fn invalid_rubric(exercise: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRubric {
            exercise: exercise.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Stable code for this error
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::TrackingLost { .. } => ErrorCode::TrackingLost,
            Self::InvalidFrame { .. } => ErrorCode::InvalidFrame,
            Self::InvalidRepetition { .. } => ErrorCode::InvalidRepetition,
            Self::UnknownExercise { .. } => ErrorCode::UnknownExercise,
            Self::InvalidRubric { .. } => ErrorCode::InvalidRubric,
            Self::ExtractionStalled { .. } => ErrorCode::ExtractionStalled,
            Self::ExtractionFailed { .. } => ErrorCode::ExtractionFailed,
            Self::History(_) => ErrorCode::HistoryError,
            Self::Config { .. } => ErrorCode::ConfigInvalid,
            Self::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Whether this error aborts the recording
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        self.code().is_fatal()
    }
}
