// ABOUTME: Aggregates rep scores into a session summary with trend delta and recurring deviations
// ABOUTME: Pure function of its inputs; history lookup and persistence happen in the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::config::AggregationConfig;
use formiq_core::models::{
    ExcludedRepetition, RecurringDeviation, RepScore, SessionMeta, SessionSummary, TrendDelta,
};
use std::collections::BTreeMap;
use tracing::info;

/// Running totals for one rule across a session
#[derive(Debug, Default)]
struct DeviationTally {
    title: String,
    tip: String,
    occurrences: usize,
    severity_sum: f64,
    total_penalty: f64,
    reps: Vec<u32>,
}

/// Builds session summaries
#[derive(Debug, Clone, Default)]
pub struct SessionAggregator {
    config: AggregationConfig,
}

impl SessionAggregator {
    /// Create an aggregator
    #[must_use]
    pub const fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Summarize a session
    ///
    /// `prior` is the most recent earlier summary for the same user and
    /// exercise, if any. Rep scores are ordered by rep index in the output.
    #[must_use]
    pub fn aggregate(
        &self,
        meta: &SessionMeta,
        mut rep_scores: Vec<RepScore>,
        excluded: Vec<ExcludedRepetition>,
        prior: Option<&SessionSummary>,
    ) -> SessionSummary {
        rep_scores.sort_by_key(|rep| rep.rep_index);

        let aggregate_score = Self::mean_score(&rep_scores);
        let trend = Self::trend(meta, aggregate_score, prior);
        let top_deviations = self.recurring_deviations(&rep_scores);
        let clean_rules = Self::clean_rules(&rep_scores);

        info!(
            session.id = %meta.session_id,
            exercise = %meta.exercise,
            reps = rep_scores.len(),
            excluded = excluded.len(),
            aggregate = ?aggregate_score,
            trend = ?trend,
            "Session aggregated"
        );

        SessionSummary {
            session_id: meta.session_id,
            user_id: meta.user_id.clone(),
            exercise: meta.exercise.clone(),
            recorded_at: meta.recorded_at,
            rep_scores,
            aggregate_score,
            trend,
            top_deviations,
            clean_rules,
            excluded,
        }
    }

    /// Arithmetic mean of rep scores, `None` for an empty session
    #[must_use]
    pub fn mean_score(rep_scores: &[RepScore]) -> Option<f64> {
        if rep_scores.is_empty() {
            return None;
        }
        let total: f64 = rep_scores.iter().map(|rep| rep.score).sum();
        Some(total / rep_scores.len() as f64)
    }

    /// Trend relative to the prior session
    #[must_use]
    pub fn trend(
        meta: &SessionMeta,
        aggregate_score: Option<f64>,
        prior: Option<&SessionSummary>,
    ) -> TrendDelta {
        let Some(prior) = prior.filter(|prior| prior.exercise == meta.exercise) else {
            return TrendDelta::FirstSession;
        };
        match (aggregate_score, prior.aggregate_score) {
            (Some(current), Some(previous)) => TrendDelta::Change {
                previous,
                delta: current - previous,
            },
            _ => TrendDelta::NotComparable,
        }
    }

    /// Rules ranked by occurrences x mean severity weight
    ///
    /// Ties fall back to total penalty, then rule identifier.
    #[must_use]
    pub fn recurring_deviations(&self, rep_scores: &[RepScore]) -> Vec<RecurringDeviation> {
        let mut tallies: BTreeMap<&str, DeviationTally> = BTreeMap::new();
        for rep in rep_scores {
            for deviation in &rep.deviations {
                let tally = tallies.entry(deviation.rule_id.as_str()).or_default();
                if tally.occurrences == 0 {
                    tally.title.clone_from(&deviation.title);
                    tally.tip.clone_from(&deviation.tip);
                }
                tally.occurrences += 1;
                tally.severity_sum += deviation.severity.weight();
                tally.total_penalty += deviation.penalty;
                tally.reps.push(rep.rep_index);
            }
        }

        let mut ranked: Vec<RecurringDeviation> = tallies
            .into_iter()
            .map(|(rule_id, tally)| {
                let average_severity = tally.severity_sum / tally.occurrences as f64;
                RecurringDeviation {
                    rule_id: rule_id.to_owned(),
                    title: tally.title,
                    occurrences: tally.occurrences,
                    average_severity,
                    rank: tally.occurrences as f64 * average_severity,
                    total_penalty: tally.total_penalty,
                    tip: tally.tip,
                    reps: tally.reps,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.rank
                .total_cmp(&a.rank)
                .then(b.total_penalty.total_cmp(&a.total_penalty))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        ranked.truncate(self.config.top_deviations);
        ranked
    }

    /// Rules evaluated with zero penalty in every repetition, in rubric order
    #[must_use]
    pub fn clean_rules(rep_scores: &[RepScore]) -> Vec<String> {
        let Some(first) = rep_scores.first() else {
            return Vec::new();
        };
        first
            .outcomes
            .iter()
            .map(|outcome| outcome.rule_id.as_str())
            .filter(|rule_id| {
                rep_scores.iter().all(|rep| {
                    rep.outcomes.iter().any(|outcome| {
                        outcome.rule_id == *rule_id && outcome.evaluated && outcome.penalty <= 0.0
                    })
                })
            })
            .map(str::to_owned)
            .collect()
    }
}
