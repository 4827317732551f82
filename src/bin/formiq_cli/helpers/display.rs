// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Output formatting helpers for formiq-cli
// ABOUTME: Provides consistent display functions for reports, rubrics, and progress

use formiq::models::{SessionSummary, TrendDelta};
use formiq::pipeline::{HighlightKind, SessionReport, SessionStatus};
use formiq::progress::{ExerciseProgress, ProgressDirection, ProgressOverview};
use formiq::rubric::{ExerciseProfile, RubricCatalog};

const RULE_WIDTH: usize = 72;

fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "-".into(), |score| format!("{score:.0}"))
}

fn format_trend(trend: &TrendDelta) -> String {
    match trend {
        TrendDelta::FirstSession => "first session".into(),
        TrendDelta::NotComparable => "not comparable".into(),
        TrendDelta::Change { previous, delta } => {
            format!("{delta:+.1} vs previous {previous:.0}")
        }
    }
}

fn display_summary_header(summary: &SessionSummary) {
    println!("\nForm Analysis: {}", summary.exercise);
    println!("{}", "=".repeat(RULE_WIDTH));
    println!(
        "   Score: {} ({})",
        format_score(summary.aggregate_score),
        summary.label().map_or("no reps scored", |label| label.as_str())
    );
    println!("   Trend: {}", format_trend(&summary.trend));
    println!(
        "   Reps: {} scored, {} incomplete, {} excluded",
        summary.rep_count(),
        summary.incomplete_count(),
        summary.excluded.len()
    );
}

/// Display a session report
pub fn display_report(report: &SessionReport, stores_history: bool) {
    let summary = &report.summary;
    display_summary_header(summary);
    if report.status == SessionStatus::Cancelled {
        println!("   Status: cancelled, partial results");
    }
    println!("   Frames analyzed: {}", report.frames_processed);

    if !summary.rep_scores.is_empty() {
        println!("\nRep Breakdown:");
        for rep in &summary.rep_scores {
            let flag = if rep.incomplete { " (incomplete)" } else { "" };
            println!(
                "   Rep {:>2}  {:>3.0}  {}{flag}",
                rep.rep_index,
                rep.score,
                rep.note()
            );
        }
    }

    if !report.highlights.is_empty() {
        println!("\nFeedback:");
        for highlight in &report.highlights {
            match highlight.kind {
                HighlightKind::Success => println!("   + {}", highlight.text),
                HighlightKind::Warning => {
                    println!("   ! {}", highlight.text);
                    if let Some(tip) = &highlight.tip {
                        println!("     Tip: {tip}");
                    }
                }
            }
        }
    }

    if !report.diagnostics.is_empty() {
        println!("\nNotes:");
        for diagnostic in &report.diagnostics {
            println!("   [{}] {}", diagnostic.code, diagnostic.message);
        }
    }

    if stores_history {
        println!(
            "\nSaved to history: {}",
            if report.persisted { "yes" } else { "no" }
        );
    }
}

/// Display every exercise in the catalog
pub fn display_catalog(catalog: &RubricCatalog) {
    println!("\nSupported Exercises ({})", catalog.len());
    println!("{}", "=".repeat(RULE_WIDTH));
    for profile in catalog.profiles() {
        let aliases = profile
            .aliases
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "   {:<16} {:<20} {} rules",
            profile.id.as_str(),
            profile.display_name,
            profile.rubric.rules.len()
        );
        if !aliases.is_empty() {
            println!("   {:<16} aliases: {aliases}", "");
        }
    }
}

/// Display one exercise profile with its rubric
pub fn display_profile(profile: &ExerciseProfile) {
    println!("\n{} ({})", profile.display_name, profile.id);
    println!("{}", "=".repeat(RULE_WIDTH));
    if !profile.description.is_empty() {
        println!("{}", profile.description);
    }
    if !profile.primary_muscles.is_empty() {
        println!("\nPrimary muscles: {}", profile.primary_muscles.join(", "));
    }
    if !profile.secondary_muscles.is_empty() {
        println!("Secondary muscles: {}", profile.secondary_muscles.join(", "));
    }

    println!("\nRubric:");
    for rule in &profile.rubric.rules {
        println!(
            "   {:<24} {} (target {:.1} to {:.1})",
            rule.id, rule.title, rule.target.min, rule.target.max
        );
        println!("   {:<24} Tip: {}", "", rule.tip);
    }

    if !profile.tips.is_empty() {
        println!("\nForm tips:");
        for tip in &profile.tips {
            println!("   - {tip}");
        }
    }
}

fn direction_text(direction: ProgressDirection) -> &'static str {
    match direction {
        ProgressDirection::Improving => "improving",
        ProgressDirection::Stable => "stable",
        ProgressDirection::Declining => "declining",
        ProgressDirection::InsufficientData => "not enough sessions",
    }
}

/// Display progress for one exercise
pub fn display_exercise_progress(progress: &ExerciseProgress) {
    println!("\nProgress: {}", progress.exercise);
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("   Sessions: {}", progress.sessions);
    println!("   Latest score: {}", format_score(progress.latest_score));
    println!("   Best score: {}", format_score(progress.best_score));
    if let Some(trend) = &progress.latest_trend {
        println!("   Last change: {}", format_trend(trend));
    }
    if let Some(slope) = progress.slope_per_session {
        println!("   Slope: {slope:+.2} points per session");
    }
    println!("   Direction: {}", direction_text(progress.direction));
    if let Some(recorded_at) = progress.last_recorded_at {
        println!("   Last session: {}", recorded_at.format("%Y-%m-%d %H:%M UTC"));
    }
}

/// Display progress across all exercises
pub fn display_overview(user: &str, overview: &ProgressOverview) {
    println!("\nForm Progress for {user}");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!(
        "   Sessions: {}  Average score: {}",
        overview.total_sessions,
        format_score(overview.average_score)
    );

    if overview.exercises.is_empty() {
        println!("\nNo sessions recorded yet.");
        return;
    }

    println!();
    for progress in &overview.exercises {
        println!(
            "   {:<16} sessions {:>3}  latest {:>3}  best {:>3}  {}",
            progress.exercise.as_str(),
            progress.sessions,
            format_score(progress.latest_score),
            format_score(progress.best_score),
            direction_text(progress.direction)
        );
    }
}
