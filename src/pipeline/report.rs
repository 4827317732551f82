// ABOUTME: Session report returned to the UI layer after a recording is analyzed
// ABOUTME: Summary, completion status, accumulated diagnostics, and feedback highlights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use formiq_core::errors::{AnalysisError, ErrorCode};
use formiq_core::models::SessionSummary;
use formiq_intelligence::rubric::ExerciseProfile;
use serde::{Deserialize, Serialize};

/// How the recording ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The extractor reached the end of the recording
    Completed,
    /// The caller cancelled; the summary covers the frames seen so far
    Cancelled,
}

/// Recoverable problem observed while analyzing a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable error code
    pub code: ErrorCode,
    /// Technical details
    pub message: String,
    /// User-facing description of the code
    pub description: String,
}

impl From<&AnalysisError> for Diagnostic {
    fn from(error: &AnalysisError) -> Self {
        let code = error.code();
        Self {
            code,
            message: error.to_string(),
            description: code.description().to_owned(),
        }
    }
}

impl From<AnalysisError> for Diagnostic {
    fn from(error: AnalysisError) -> Self {
        Self::from(&error)
    }
}

/// Kind of feedback highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightKind {
    /// Something done well in every repetition
    Success,
    /// A recurring fault worth correcting
    Warning,
}

/// One line of feedback for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    /// Success or warning
    pub kind: HighlightKind,
    /// Rule the highlight is about
    pub rule_id: String,
    /// Short headline
    pub text: String,
    /// Coaching tip, present for warnings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

/// Build highlights for a summary
///
/// Successes come first, one per clean rule that has praise text, in rubric
/// order. Warnings follow, one per top recurring deviation, highest rank first.
#[must_use]
pub fn highlights(summary: &SessionSummary, profile: &ExerciseProfile) -> Vec<Highlight> {
    let successes = summary.clean_rules.iter().filter_map(|rule_id| {
        let praise = profile.rubric.rule(rule_id)?.praise.clone()?;
        Some(Highlight {
            kind: HighlightKind::Success,
            rule_id: rule_id.clone(),
            text: praise,
            tip: None,
        })
    });

    let warnings = summary.top_deviations.iter().map(|deviation| Highlight {
        kind: HighlightKind::Warning,
        rule_id: deviation.rule_id.clone(),
        text: deviation.title.clone(),
        tip: Some(deviation.tip.clone()),
    });

    successes.chain(warnings).collect()
}

/// Result of analyzing one recording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Aggregated scores and deviations
    pub summary: SessionSummary,
    /// Whether the recording completed or was cancelled
    pub status: SessionStatus,
    /// Recoverable problems, in the order they were observed
    pub diagnostics: Vec<Diagnostic>,
    /// Feedback lines for the user
    pub highlights: Vec<Highlight>,
    /// Whether the summary was written to the history store
    pub persisted: bool,
    /// Frames received from the extractor
    pub frames_processed: usize,
}

impl SessionReport {
    /// Whether any diagnostic carries `code`
    #[must_use]
    pub fn has_diagnostic(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|diagnostic| diagnostic.code == code)
    }
}
