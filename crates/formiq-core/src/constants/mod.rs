// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Score bounds, label thresholds, severity weights, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into small domain modules rather than a single flat
//! namespace so call sites read as `scoring::MAX_SCORE`.

/// Form score bounds and qualitative label thresholds
pub mod scoring {
    /// Best possible repetition or session score
    pub const MAX_SCORE: f64 = 100.0;
    /// Worst possible repetition or session score
    pub const MIN_SCORE: f64 = 0.0;
    /// Lower bound of the "Excellent" label
    pub const EXCELLENT_THRESHOLD: f64 = 90.0;
    /// Lower bound of the "Good" label
    pub const GOOD_THRESHOLD: f64 = 75.0;
    /// Lower bound of the "Fair" label
    pub const FAIR_THRESHOLD: f64 = 60.0;
}

/// Weights used when ranking recurring deviations
pub mod severity {
    /// Weight of a low severity deviation
    pub const LOW_WEIGHT: f64 = 1.0;
    /// Weight of a medium severity deviation
    pub const MEDIUM_WEIGHT: f64 = 2.0;
    /// Weight of a high severity deviation
    pub const HIGH_WEIGHT: f64 = 3.0;
}

/// Exercise identifiers shipped with the built-in rubric catalog
pub mod exercises {
    /// Barbell back squat
    pub const SQUAT: &str = "squat";
    /// Flat barbell bench press
    pub const BENCH_PRESS: &str = "bench_press";
    /// Conventional deadlift
    pub const DEADLIFT: &str = "deadlift";
    /// Standing overhead press
    pub const OVERHEAD_PRESS: &str = "overhead_press";
    /// Bent-over barbell row
    pub const BARBELL_ROW: &str = "barbell_row";
    /// Generic fallback rubric for exercises without a dedicated rubric
    pub const GENERIC: &str = "generic";
}

/// Service names for structured logging
pub mod service_names {
    /// Default service name reported in log records
    pub const FORMIQ: &str = "formiq";
    /// Command-line tool name
    pub const FORMIQ_CLI: &str = "formiq-cli";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// Minimum tracking-joint confidence accepted by the segmenter
    pub const MIN_TRACKING_CONFIDENCE: &str = "FORMIQ_MIN_TRACKING_CONFIDENCE";
    /// Consecutive low-confidence frames tolerated before tracking is lost
    pub const MAX_LOW_CONFIDENCE_FRAMES: &str = "FORMIQ_MAX_LOW_CONFIDENCE_FRAMES";
    /// Largest tolerated gap between consecutive frames (milliseconds)
    pub const MAX_FRAME_GAP_MS: &str = "FORMIQ_MAX_FRAME_GAP_MS";
    /// Fraction of the return path that qualifies a trailing rep as near-complete
    pub const NEAR_COMPLETE_RATIO: &str = "FORMIQ_NEAR_COMPLETE_RATIO";
    /// Minimum joint confidence for a frame to be sampled by the scorer
    pub const MIN_SAMPLE_CONFIDENCE: &str = "FORMIQ_MIN_SAMPLE_CONFIDENCE";
    /// Penalty above which a deviation is surfaced to the user
    pub const VISIBILITY_THRESHOLD: &str = "FORMIQ_VISIBILITY_THRESHOLD";
    /// Number of recurring deviations kept in a session summary
    pub const TOP_DEVIATIONS: &str = "FORMIQ_TOP_DEVIATIONS";
    /// Capacity of the frame batch queue
    pub const FRAME_QUEUE_CAPACITY: &str = "FORMIQ_FRAME_QUEUE_CAPACITY";
    /// Capacity of the repetition queue
    pub const REP_QUEUE_CAPACITY: &str = "FORMIQ_REP_QUEUE_CAPACITY";
    /// Per-batch pose extractor timeout (milliseconds)
    pub const EXTRACTOR_TIMEOUT_MS: &str = "FORMIQ_EXTRACTOR_TIMEOUT_MS";
    /// Consecutive extractor failures tolerated before the pipeline stalls
    pub const EXTRACTOR_MAX_RETRIES: &str = "FORMIQ_EXTRACTOR_MAX_RETRIES";
    /// Delay between extractor retries (milliseconds)
    pub const EXTRACTOR_RETRY_BACKOFF_MS: &str = "FORMIQ_EXTRACTOR_RETRY_BACKOFF_MS";
    /// Policy applied when an exercise has no rubric (`reject` or `generic`)
    pub const RUBRIC_FALLBACK: &str = "FORMIQ_RUBRIC_FALLBACK";
    /// Path of a JSON rubric catalog replacing the built-in one
    pub const RUBRIC_PATH: &str = "FORMIQ_RUBRIC_PATH";
    /// Directory used by the JSON history store
    pub const HISTORY_DIR: &str = "FORMIQ_HISTORY_DIR";
}
