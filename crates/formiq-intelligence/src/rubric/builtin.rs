// ABOUTME: Built-in exercise profiles for the core barbell lifts and a generic fallback
// ABOUTME: Side-view rubrics with coaching tips, muscle groups, and motion thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Built-in rubrics
//!
//! All rubrics assume a side-on camera with the lifter's full body in frame.
//! Angles are in degrees, offsets and drift in normalized image units.

use super::profile::{DescentDirection, ExerciseProfile, MotionProfile, MotionThresholds};
use super::rule::{PenaltyCurve, Rubric, RubricRule, RuleMetric, Sampling};
use crate::geometry::Axis;
use formiq_core::constants::exercises;
use formiq_core::models::{ExerciseId, Joint, TargetRange};

/// All built-in profiles
#[must_use]
pub fn profiles() -> Vec<ExerciseProfile> {
    vec![
        squat(),
        bench_press(),
        deadlift(),
        overhead_press(),
        barbell_row(),
        generic(),
    ]
}

const fn linear(per_unit: f64, cap: f64) -> PenaltyCurve {
    PenaltyCurve::Linear {
        per_unit,
        cap: Some(cap),
    }
}

const fn angle(proximal: Joint, vertex: Joint, distal: Joint) -> RuleMetric {
    RuleMetric::JointAngle {
        proximal,
        vertex,
        distal,
    }
}

const fn torso() -> RuleMetric {
    RuleMetric::SegmentInclination {
        upper: Joint::LeftShoulder,
        lower: Joint::LeftHip,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

fn aliases(items: &[&str]) -> Vec<ExerciseId> {
    items.iter().map(|item| ExerciseId::new(item)).collect()
}

fn hips() -> Vec<Joint> {
    vec![Joint::LeftHip, Joint::RightHip]
}

fn wrists() -> Vec<Joint> {
    vec![Joint::LeftWrist, Joint::RightWrist]
}

fn squat() -> ExerciseProfile {
    let motion = MotionProfile::new(hips(), DescentDirection::Down).with_thresholds(
        MotionThresholds {
            start_displacement: 0.03,
            min_displacement: 0.12,
            top_tolerance: 0.02,
            min_velocity: 0.05,
            debounce_frames: 2,
        },
    );

    let rubric = Rubric::new(vec![
        RubricRule::new(
            "squat_torso_angle",
            "Chest dropping",
            torso(),
            TargetRange::new(0.0, 45.0),
            linear(1.0, 25.0),
            "Keep chest up and back straight throughout",
        )
        .bilateral()
        .with_priority(1)
        .with_praise("Strong, upright torso"),
        RubricRule::new(
            "squat_depth",
            "Shallow depth",
            angle(Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle),
            TargetRange::new(50.0, 100.0),
            linear(1.5, 30.0),
            "Descend until thighs are parallel to the floor",
        )
        .with_sampling(Sampling::Minimum)
        .bilateral()
        .with_priority(2)
        .with_praise("Great squat depth"),
        RubricRule::new(
            "squat_knee_travel",
            "Knee tracking",
            RuleMetric::JointOffset {
                joint: Joint::LeftKnee,
                reference: Joint::LeftAnkle,
                axis: Axis::X,
            },
            TargetRange::new(0.0, 0.08),
            linear(200.0, 20.0),
            "Push knees out over toes – don't let them cave",
        )
        .bilateral()
        .with_priority(3),
        RubricRule::new(
            "squat_balance",
            "Forward weight shift",
            RuleMetric::HorizontalDrift {
                joint: Joint::LeftShoulder,
            },
            TargetRange::new(0.0, 0.06),
            linear(250.0, 20.0),
            "Drive through your heels, not your toes",
        )
        .with_priority(4)
        .with_praise("Balanced through the whole foot"),
    ]);

    ExerciseProfile {
        aliases: aliases(&["back_squat", "barbell_squat"]),
        display_name: "Squat".to_owned(),
        description: "The king of lower body exercises. Squats target your quads, hamstrings, \
                      and glutes while also engaging your core for stability."
            .to_owned(),
        primary_muscles: strings(&["Quadriceps", "Glutes"]),
        secondary_muscles: strings(&["Hamstrings", "Core", "Lower Back"]),
        tips: strings(&[
            "Keep chest up and back straight throughout",
            "Push knees out over toes – don't let them cave",
            "Maintain a neutral spine position",
            "Drive through your heels, not your toes",
        ]),
        ..ExerciseProfile::new(exercises::SQUAT, motion, rubric)
    }
}

fn bench_press() -> ExerciseProfile {
    let motion = MotionProfile::new(wrists(), DescentDirection::Down).with_thresholds(
        MotionThresholds {
            start_displacement: 0.02,
            min_displacement: 0.08,
            top_tolerance: 0.015,
            min_velocity: 0.04,
            debounce_frames: 2,
        },
    );

    let rubric = Rubric::new(vec![
        RubricRule::new(
            "bench_elbow_flare",
            "Elbow flare",
            angle(Joint::LeftHip, Joint::LeftShoulder, Joint::LeftElbow),
            TargetRange::new(30.0, 60.0),
            linear(1.0, 25.0),
            "Keep elbows at a 45° angle to your torso throughout the movement. This protects \
             your shoulders and engages your chest more effectively.",
        )
        .with_sampling(Sampling::AtBottom)
        .bilateral()
        .with_priority(1),
        RubricRule::new(
            "bench_lockout_symmetry",
            "Uneven lockout",
            RuleMetric::AngleAsymmetry {
                proximal: Joint::LeftShoulder,
                vertex: Joint::LeftElbow,
                distal: Joint::LeftWrist,
            },
            TargetRange::new(0.0, 10.0),
            linear(1.5, 20.0),
            "Focus on pressing both arms evenly. Try a lighter weight to build symmetry \
             before progressing.",
        )
        .with_priority(2)
        .with_praise("Even, symmetric lockout"),
        RubricRule::new(
            "bench_lockout",
            "Incomplete lockout",
            angle(Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist),
            TargetRange::new(160.0, 180.0),
            linear(1.0, 20.0),
            "Lock out at the top of every rep",
        )
        .with_sampling(Sampling::Maximum)
        .bilateral()
        .with_priority(3),
        RubricRule::new(
            "bench_bar_path",
            "Bar path drift",
            RuleMetric::HorizontalDrift {
                joint: Joint::LeftWrist,
            },
            TargetRange::new(0.0, 0.05),
            linear(300.0, 20.0),
            "Lower the bar in a controlled motion to your mid-chest",
        )
        .bilateral()
        .with_priority(4)
        .with_praise("Excellent bar path control"),
        RubricRule::new(
            "bench_tempo",
            "Rushed rep",
            RuleMetric::RepDuration,
            TargetRange::new(1.2, 8.0),
            PenaltyCurve::Flat { penalty: 5.0 },
            "Control the descent – don't bounce off your chest",
        )
        .with_priority(5)
        .with_praise("Good tempo on eccentric"),
    ]);

    ExerciseProfile {
        aliases: aliases(&["bench", "barbell_bench_press", "flat_bench_press"]),
        display_name: "Bench Press".to_owned(),
        description: "A compound pushing movement that primarily targets the chest, shoulders, \
                      and triceps. One of the 'big three' powerlifting movements."
            .to_owned(),
        primary_muscles: strings(&["Chest", "Triceps"]),
        secondary_muscles: strings(&["Front Deltoids", "Serratus Anterior"]),
        tips: strings(&[
            "Keep shoulder blades pinched together throughout",
            "Maintain a slight arch in your lower back",
            "Drive feet into the floor for stability",
            "Control the descent – don't bounce off your chest",
        ]),
        ..ExerciseProfile::new(exercises::BENCH_PRESS, motion, rubric)
    }
}

fn deadlift() -> ExerciseProfile {
    let motion = MotionProfile::new(hips(), DescentDirection::Down).with_thresholds(
        MotionThresholds {
            start_displacement: 0.03,
            min_displacement: 0.10,
            top_tolerance: 0.02,
            min_velocity: 0.05,
            debounce_frames: 2,
        },
    );

    let rubric = Rubric::new(vec![
        RubricRule::new(
            "deadlift_bar_close",
            "Bar drifting forward",
            RuleMetric::JointOffset {
                joint: Joint::LeftWrist,
                reference: Joint::LeftAnkle,
                axis: Axis::X,
            },
            TargetRange::new(0.0, 0.06),
            linear(300.0, 25.0),
            "Keep the bar close to your body throughout",
        )
        .bilateral()
        .with_priority(1)
        .with_praise("Bar stayed close to the body"),
        RubricRule::new(
            "deadlift_back_angle",
            "Back angle",
            torso(),
            TargetRange::new(15.0, 70.0),
            linear(1.0, 25.0),
            "Maintain neutral spine – no rounding",
        )
        .with_sampling(Sampling::AtBottom)
        .bilateral()
        .with_priority(2),
        RubricRule::new(
            "deadlift_lockout",
            "Soft lockout",
            torso(),
            TargetRange::new(0.0, 10.0),
            linear(1.5, 20.0),
            "Lock out with glutes, not by leaning back",
        )
        .with_sampling(Sampling::Minimum)
        .bilateral()
        .with_priority(3)
        .with_praise("Strong lockout"),
        RubricRule::new(
            "deadlift_hip_extension",
            "Incomplete hip extension",
            angle(Joint::LeftShoulder, Joint::LeftHip, Joint::LeftKnee),
            TargetRange::new(165.0, 180.0),
            linear(1.0, 15.0),
            "Stand tall at the top before lowering the bar",
        )
        .with_sampling(Sampling::Maximum)
        .bilateral()
        .with_priority(4),
    ]);

    ExerciseProfile {
        aliases: aliases(&["conventional_deadlift", "barbell_deadlift"]),
        display_name: "Deadlift".to_owned(),
        description: "A full-body pulling movement that builds overall strength and power by \
                      working the entire posterior chain."
            .to_owned(),
        primary_muscles: strings(&["Hamstrings", "Glutes", "Lower Back"]),
        secondary_muscles: strings(&["Traps", "Forearms", "Core"]),
        tips: strings(&[
            "Keep the bar close to your body throughout",
            "Hinge at the hips first when lowering",
            "Maintain neutral spine – no rounding",
            "Lock out with glutes, not by leaning back",
        ]),
        ..ExerciseProfile::new(exercises::DEADLIFT, motion, rubric)
    }
}

fn overhead_press() -> ExerciseProfile {
    let motion = MotionProfile::new(wrists(), DescentDirection::Up).with_thresholds(
        MotionThresholds {
            start_displacement: 0.03,
            min_displacement: 0.12,
            top_tolerance: 0.02,
            min_velocity: 0.05,
            debounce_frames: 2,
        },
    );

    let rubric = Rubric::new(vec![
        RubricRule::new(
            "ohp_lean_back",
            "Excessive lean back",
            torso(),
            TargetRange::new(0.0, 12.0),
            linear(1.5, 25.0),
            "Don't lean back excessively – stay vertical",
        )
        .bilateral()
        .with_priority(1)
        .with_praise("Stable, vertical torso"),
        RubricRule::new(
            "ohp_lockout",
            "Incomplete lockout",
            angle(Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist),
            TargetRange::new(165.0, 180.0),
            linear(1.0, 20.0),
            "Full lockout at the top for complete range of motion",
        )
        .with_sampling(Sampling::Maximum)
        .bilateral()
        .with_priority(2)
        .with_praise("Full lockout overhead"),
        RubricRule::new(
            "ohp_bar_path",
            "Bar path drift",
            RuleMetric::HorizontalDrift {
                joint: Joint::LeftWrist,
            },
            TargetRange::new(0.0, 0.06),
            linear(250.0, 20.0),
            "Press the bar straight overhead, moving your head out of the way",
        )
        .bilateral()
        .with_priority(3),
        RubricRule::new(
            "ohp_symmetry",
            "Uneven press",
            RuleMetric::AngleAsymmetry {
                proximal: Joint::LeftShoulder,
                vertex: Joint::LeftElbow,
                distal: Joint::LeftWrist,
            },
            TargetRange::new(0.0, 12.0),
            linear(1.0, 15.0),
            "Press both arms evenly",
        )
        .with_priority(4),
    ]);

    ExerciseProfile {
        aliases: aliases(&["military_press", "shoulder_press", "ohp"]),
        display_name: "Overhead Press".to_owned(),
        description: "A compound shoulder movement that builds pressing strength overhead. \
                      Also known as the military press."
            .to_owned(),
        primary_muscles: strings(&["Shoulders", "Triceps"]),
        secondary_muscles: strings(&["Upper Chest", "Core", "Traps"]),
        tips: strings(&[
            "Keep core tight throughout to protect lower back",
            "Don't lean back excessively – stay vertical",
            "Full lockout at the top for complete range of motion",
            "Squeeze glutes for extra stability",
        ]),
        ..ExerciseProfile::new(exercises::OVERHEAD_PRESS, motion, rubric)
    }
}

fn barbell_row() -> ExerciseProfile {
    let motion = MotionProfile::new(wrists(), DescentDirection::Up).with_thresholds(
        MotionThresholds {
            start_displacement: 0.02,
            min_displacement: 0.08,
            top_tolerance: 0.015,
            min_velocity: 0.04,
            debounce_frames: 2,
        },
    );

    let rubric = Rubric::new(vec![
        RubricRule::new(
            "row_back_angle",
            "Torso rising",
            torso(),
            TargetRange::new(30.0, 75.0),
            linear(1.0, 25.0),
            "Keep your back flat – don't round your spine",
        )
        .bilateral()
        .with_priority(1)
        .with_praise("Solid hinge position"),
        RubricRule::new(
            "row_momentum",
            "Using momentum",
            RuleMetric::HorizontalDrift {
                joint: Joint::LeftShoulder,
            },
            TargetRange::new(0.0, 0.05),
            linear(300.0, 20.0),
            "Control the negative portion of the lift",
        )
        .bilateral()
        .with_priority(2),
        RubricRule::new(
            "row_contraction",
            "Short pull",
            angle(Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist),
            TargetRange::new(50.0, 100.0),
            linear(1.0, 20.0),
            "Squeeze at the top for maximum contraction",
        )
        .with_sampling(Sampling::Minimum)
        .bilateral()
        .with_priority(3)
        .with_praise("Full contraction at the top"),
    ]);

    ExerciseProfile {
        aliases: aliases(&["barbell_rows", "bent_over_row", "row"]),
        display_name: "Barbell Rows".to_owned(),
        description: "A compound pulling exercise that targets the entire back, building \
                      thickness in the lats, rhomboids, and rear deltoids."
            .to_owned(),
        primary_muscles: strings(&["Lats", "Rhomboids"]),
        secondary_muscles: strings(&["Rear Deltoids", "Biceps", "Lower Back"]),
        tips: strings(&[
            "Keep your back flat – don't round your spine",
            "Pull with your elbows, not your hands",
            "Squeeze at the top for maximum contraction",
            "Control the negative portion of the lift",
        ]),
        ..ExerciseProfile::new(exercises::BARBELL_ROW, motion, rubric)
    }
}

fn generic() -> ExerciseProfile {
    let motion = MotionProfile::new(wrists(), DescentDirection::Auto).with_thresholds(
        MotionThresholds {
            start_displacement: 0.03,
            min_displacement: 0.08,
            top_tolerance: 0.02,
            min_velocity: 0.04,
            debounce_frames: 2,
        },
    );

    let rubric = Rubric::new(vec![
        RubricRule::new(
            "generic_symmetry",
            "Uneven arms",
            RuleMetric::AngleAsymmetry {
                proximal: Joint::LeftShoulder,
                vertex: Joint::LeftElbow,
                distal: Joint::LeftWrist,
            },
            TargetRange::new(0.0, 15.0),
            linear(1.0, 15.0),
            "Focus on form over weight",
        )
        .with_priority(1),
        RubricRule::new(
            "generic_control",
            "Rushed rep",
            RuleMetric::RepDuration,
            TargetRange::new(1.0, 8.0),
            PenaltyCurve::Flat { penalty: 5.0 },
            "Control the movement throughout",
        )
        .with_priority(2)
        .with_praise("Controlled tempo"),
        RubricRule::new(
            "generic_stability",
            "Body swing",
            RuleMetric::HorizontalDrift {
                joint: Joint::LeftShoulder,
            },
            TargetRange::new(0.0, 0.06),
            linear(200.0, 15.0),
            "Start light and progressively increase weight",
        )
        .bilateral()
        .with_priority(3)
        .with_praise("Stable posture"),
    ]);

    ExerciseProfile {
        display_name: "Generic Movement".to_owned(),
        description: "A targeted movement to build strength, muscle, and improve your overall \
                      fitness."
            .to_owned(),
        tips: strings(&[
            "Focus on form over weight",
            "Control the movement throughout",
            "Breathe steadily – exhale on exertion",
            "Start light and progressively increase weight",
        ]),
        ..ExerciseProfile::new(exercises::GENERIC, motion, rubric)
    }
}
