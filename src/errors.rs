// ABOUTME: Error types of the analysis engine gathered in one place for library users
// ABOUTME: Re-exports the core taxonomy and converts extractor failures into analysis errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! The taxonomy lives in `formiq-core`; this module re-exports it next to
//! the errors raised by configuration, rubric loading and extractors.

pub use crate::pipeline::ExtractorError;
pub use formiq_core::errors::{AnalysisError, AnalysisResult, ErrorCode, HistoryError};
pub use formiq_intelligence::config::ConfigError;
pub use formiq_intelligence::rubric::RubricError;

/// Convert an extractor failure that reached the caller outside the guard
///
/// Retryable failures become `ExtractionStalled` after a single attempt.
#[must_use]
pub fn extraction_error(extractor: &str, error: &ExtractorError) -> AnalysisError {
    if error.is_retryable() {
        AnalysisError::ExtractionStalled {
            extractor: extractor.to_owned(),
            attempts: 1,
            last_error: error.to_string(),
        }
    } else {
        AnalysisError::ExtractionFailed {
            extractor: extractor.to_owned(),
            reason: error.to_string(),
        }
    }
}
