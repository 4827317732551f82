// ABOUTME: Core types and constants for the FormIQ form-analysis engine
// ABOUTME: Foundation crate with pose models, error taxonomy, and scoring constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # `FormIQ` Core
//!
//! Foundation crate providing the shared data model for the form-analysis
//! pipeline. Every stage of the pipeline (extraction, segmentation, scoring,
//! aggregation) exchanges the types defined here, so this crate is designed to
//! change infrequently.
//!
//! ## Modules
//!
//! - **errors**: Analysis error taxonomy with stable `ErrorCode`s
//! - **constants**: Score bounds, label thresholds, and service identifiers
//! - **models**: Frames, repetitions, deviations, rep scores, and session summaries

/// Analysis error taxonomy with stable error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Frame, Repetition, RepScore, `SessionSummary`, etc.)
pub mod models;
