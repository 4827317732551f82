// ABOUTME: Exercise rubrics: profiles, biomechanical rules, and the validated catalog
// ABOUTME: Rubrics are data; the form scorer and rep segmenter interpret them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rubrics
//!
//! An [`ExerciseProfile`] bundles everything the engine knows about one
//! exercise: display metadata, the [`MotionProfile`] that drives rep
//! segmentation, and the [`Rubric`] of rules used for scoring. Profiles are
//! validated when they enter a [`RubricCatalog`], never at scoring time.

/// Built-in exercise profiles
pub mod builtin;
mod catalog;
mod profile;
mod rule;

pub use catalog::{FallbackPolicy, RubricCatalog, RubricError};
pub use profile::{DescentDirection, ExerciseProfile, MotionProfile, MotionThresholds};
pub use rule::{PenaltyCurve, Rubric, RubricRule, RuleMetric, Sampling};
