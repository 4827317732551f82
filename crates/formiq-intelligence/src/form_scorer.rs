// ABOUTME: Rubric-based scoring of a single repetition into a RepScore with deviations
// ABOUTME: Deterministic: identical repetition and rubric always produce an identical score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Form Scorer
//!
//! For every rule of the exercise rubric the scorer samples the rule metric
//! over the repetition's frames (only joints at or above the sample
//! confidence), reduces the samples according to the rule's sampling mode,
//! and converts the distance to the target range into penalty points.
//!
//! `score = 100 - min(sum of penalties, 100)`
//!
//! Rules without a single confident sample are recorded as not evaluated and
//! cost nothing. Penalties above the visibility threshold surface as
//! deviations, ordered by severity and then rule priority.

use crate::config::ScoringConfig;
use crate::rubric::{ExerciseProfile, RubricCatalog, RubricRule, Sampling};
use formiq_core::constants::scoring;
use formiq_core::errors::AnalysisResult;
use formiq_core::models::{Deviation, RepScore, Repetition, RuleOutcome, ScoreLabel};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

/// Worst sample of a rule within one repetition
#[derive(Debug, Clone, Copy)]
struct WorstSample {
    frame_offset: usize,
    observed: f64,
    magnitude: f64,
}

/// Scores repetitions against the rubric catalog
#[derive(Debug, Clone)]
pub struct FormScorer {
    catalog: Arc<RubricCatalog>,
    config: ScoringConfig,
}

impl FormScorer {
    /// Create a scorer over a validated catalog
    #[must_use]
    pub const fn new(catalog: Arc<RubricCatalog>, config: ScoringConfig) -> Self {
        Self { catalog, config }
    }

    /// Catalog used for lookups
    #[must_use]
    pub fn catalog(&self) -> &RubricCatalog {
        &self.catalog
    }

    /// Score a repetition with the rubric registered for its exercise
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::UnknownExercise` when the catalog has no rubric
    /// for the repetition's exercise
    pub fn score(&self, repetition: &Repetition) -> AnalysisResult<RepScore> {
        let profile = self.catalog.get(repetition.exercise())?;
        Ok(score_repetition(profile, repetition, &self.config))
    }

    /// Score a repetition with an explicitly resolved profile
    #[must_use]
    pub fn score_with_profile(&self, profile: &ExerciseProfile, repetition: &Repetition) -> RepScore {
        score_repetition(profile, repetition, &self.config)
    }

    /// Score many repetitions in parallel, preserving input order
    #[must_use]
    pub fn score_batch(&self, repetitions: &[Repetition]) -> Vec<AnalysisResult<RepScore>> {
        repetitions
            .par_iter()
            .map(|repetition| self.score(repetition))
            .collect()
    }
}

/// Score one repetition against a profile's rubric
#[must_use]
pub fn score_repetition(
    profile: &ExerciseProfile,
    repetition: &Repetition,
    config: &ScoringConfig,
) -> RepScore {
    let frames = repetition.frames();
    let bottom = profile
        .motion
        .deepest_frame(
            frames,
            repetition.descent_sign(),
            config.min_sample_confidence,
        );

    let mut outcomes = Vec::with_capacity(profile.rubric.rules.len());
    let mut deviations: Vec<(usize, u8, Deviation)> = Vec::new();

    for (order, rule) in profile.rubric.rules.iter().enumerate() {
        let Some(worst) = worst_sample(rule, repetition, bottom, config) else {
            debug!(
                rep.index = repetition.index(),
                rule = %rule.id,
                "Rule not evaluated, no confident samples"
            );
            outcomes.push(RuleOutcome {
                rule_id: rule.id.clone(),
                penalty: 0.0,
                evaluated: false,
            });
            continue;
        };

        let penalty = rule.penalty.penalty(worst.magnitude);
        outcomes.push(RuleOutcome {
            rule_id: rule.id.clone(),
            penalty,
            evaluated: true,
        });

        if penalty > config.visibility_threshold {
            let offset_ms = frames
                .get(worst.frame_offset)
                .map_or(0, |frame| frame.timestamp_ms - repetition.start_ms());
            deviations.push((
                order,
                rule.priority,
                Deviation {
                    rule_id: rule.id.clone(),
                    title: rule.title.clone(),
                    frame_offset: worst.frame_offset,
                    offset_ms,
                    observed: worst.observed,
                    target: rule.target,
                    magnitude: worst.magnitude,
                    penalty,
                    severity: config.severity_for(penalty),
                    tip: rule.tip.clone(),
                },
            ));
        }
    }

    deviations.sort_by(|(order_a, priority_a, a), (order_b, priority_b, b)| {
        b.severity
            .cmp(&a.severity)
            .then(priority_a.cmp(priority_b))
            .then(order_a.cmp(order_b))
    });

    let total_penalty: f64 = outcomes.iter().map(|outcome| outcome.penalty).sum();
    let score = (scoring::MAX_SCORE - total_penalty.min(scoring::MAX_SCORE))
        .clamp(scoring::MIN_SCORE, scoring::MAX_SCORE);

    debug!(
        exercise = %profile.id,
        rep.index = repetition.index(),
        rep.score = score,
        deviations = deviations.len(),
        "Repetition scored"
    );

    RepScore {
        rep_index: repetition.index(),
        incomplete: repetition.is_incomplete(),
        start_ms: repetition.start_ms(),
        end_ms: repetition.end_ms(),
        score,
        label: ScoreLabel::from_score(score),
        deviations: deviations
            .into_iter()
            .map(|(_, _, deviation)| deviation)
            .collect(),
        outcomes,
    }
}

/// Reduce a rule's samples to the single worst one
fn worst_sample(
    rule: &RubricRule,
    repetition: &Repetition,
    bottom: Option<usize>,
    config: &ScoringConfig,
) -> Option<WorstSample> {
    let target = rule.target;
    let samples: Vec<(usize, f64)> = rule
        .metrics()
        .iter()
        .flat_map(|metric| {
            metric
                .series(repetition.frames(), config.min_sample_confidence)
                .into_iter()
                .enumerate()
                .filter_map(|(offset, value)| value.map(|value| (offset, value)))
        })
        .filter(|&(offset, _)| rule.sampling != Sampling::AtBottom || Some(offset) == bottom)
        .collect();

    let chosen = match rule.sampling {
        Sampling::AllFrames | Sampling::AtBottom => samples.iter().copied().max_by(|a, b| {
            target
                .deviation(a.1)
                .total_cmp(&target.deviation(b.1))
                .then(earliest(a.0, b.0))
        }),
        Sampling::Minimum => samples
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0))),
        Sampling::Maximum => samples
            .iter()
            .copied()
            .max_by(|a, b| a.1.total_cmp(&b.1).then(earliest(a.0, b.0))),
    }?;

    Some(WorstSample {
        frame_offset: chosen.0,
        observed: chosen.1,
        magnitude: target.deviation(chosen.1),
    })
}

/// Ordering that makes `max_by` prefer the earlier frame on ties
fn earliest(a: usize, b: usize) -> Ordering {
    b.cmp(&a)
}
