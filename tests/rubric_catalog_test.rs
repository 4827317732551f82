// ABOUTME: Tests for the rubric catalog: built-in profiles, aliases, validation, and fallback
// ABOUTME: Invalid profiles must be rejected at load time, never at scoring time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use formiq::errors::ErrorCode;
use formiq::models::{ExerciseId, Joint, TargetRange};
use formiq::rubric::{
    DescentDirection, ExerciseProfile, FallbackPolicy, MotionProfile, MotionThresholds,
    PenaltyCurve, Rubric, RubricCatalog, RubricError, RubricRule, RuleMetric,
};

fn elbow_rule(id: &str) -> RubricRule {
    RubricRule::new(
        id,
        "Elbow angle",
        RuleMetric::JointAngle {
            proximal: Joint::LeftShoulder,
            vertex: Joint::LeftElbow,
            distal: Joint::LeftWrist,
        },
        TargetRange::new(70.0, 110.0),
        PenaltyCurve::Linear {
            per_unit: 1.0,
            cap: Some(20.0),
        },
        "Keep the elbow at ninety degrees",
    )
}

fn curl_profile() -> ExerciseProfile {
    ExerciseProfile::new(
        "Cable Curl",
        MotionProfile::new(vec![Joint::LeftWrist], DescentDirection::Down),
        Rubric::new(vec![elbow_rule("curl_elbow")]),
    )
}

fn assert_invalid(profile: ExerciseProfile, fragment: &str) {
    match RubricCatalog::from_profiles(vec![profile]) {
        Err(RubricError::Invalid { reason, .. }) => {
            assert!(reason.contains(fragment), "unexpected reason: {reason}");
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn test_builtin_catalog_is_valid() {
    common::init_test_logging();
    let catalog = RubricCatalog::builtin().unwrap();

    let ids: Vec<&str> = catalog.profiles().map(|profile| profile.id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "barbell_row",
            "bench_press",
            "deadlift",
            "generic",
            "overhead_press",
            "squat"
        ]
    );
    assert_eq!(catalog.len(), 6);
    assert!(!catalog.is_empty());

    for profile in catalog.profiles() {
        assert!(!profile.display_name.is_empty());
        assert!(!profile.rubric.rules.is_empty());
        assert!(profile.rubric.rules.iter().all(|rule| !rule.tip.is_empty()));
    }

    let squat = catalog.get(&ExerciseId::new("squat")).unwrap();
    assert_eq!(squat.primary_muscles, vec!["Quadriceps", "Glutes"]);
    assert!(squat.secondary_muscles.contains(&"Core".to_owned()));
    assert_eq!(squat.tips.len(), 4);
}

#[test]
fn test_display_names_and_aliases_resolve() {
    let catalog = RubricCatalog::builtin().unwrap();

    let bench = catalog.get(&ExerciseId::new("Bench Press")).unwrap();
    assert_eq!(bench.id.as_str(), "bench_press");

    let squat = catalog.get(&ExerciseId::new("Back Squat")).unwrap();
    assert_eq!(squat.id.as_str(), "squat");

    assert!(catalog.contains(&ExerciseId::new("OHP")));
    assert!(catalog.contains(&ExerciseId::new("barbell-squat")));
    assert!(!catalog.contains(&ExerciseId::new("bicep curl")));
}

#[test]
fn test_unknown_exercise_is_fatal() {
    let catalog = RubricCatalog::builtin().unwrap();
    let error = catalog.get(&ExerciseId::new("bicep curl")).unwrap_err();
    assert_eq!(error.code(), ErrorCode::UnknownExercise);
    assert!(error.is_fatal());
    assert!(error.to_string().contains("bicep_curl"));
}

#[test]
fn test_fallback_policy_controls_unknown_exercises() {
    let catalog = RubricCatalog::builtin().unwrap();
    let curl = ExerciseId::new("bicep curl");

    let rejected = catalog.resolve(&curl, FallbackPolicy::Reject).unwrap_err();
    assert_eq!(rejected.code(), ErrorCode::UnknownExercise);

    let generic = catalog.resolve(&curl, FallbackPolicy::Generic).unwrap();
    assert_eq!(generic.id.as_str(), "generic");

    // Known exercises never fall back
    let squat = catalog
        .resolve(&ExerciseId::new("squat"), FallbackPolicy::Generic)
        .unwrap();
    assert_eq!(squat.id.as_str(), "squat");
}

#[test]
fn test_generic_fallback_requires_generic_profile() {
    let catalog = RubricCatalog::from_profiles(vec![curl_profile()]).unwrap();
    let error = catalog
        .resolve(&ExerciseId::new("squat"), FallbackPolicy::Generic)
        .unwrap_err();
    assert_eq!(error.code(), ErrorCode::UnknownExercise);
}

#[test]
fn test_fallback_policy_parsing() {
    assert_eq!("reject".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Reject);
    assert_eq!(" Generic ".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Generic);
    assert!("maybe".parse::<FallbackPolicy>().is_err());
    assert_eq!(FallbackPolicy::default(), FallbackPolicy::Reject);
    assert_eq!(FallbackPolicy::Generic.to_string(), "generic");
}

#[test]
fn test_custom_profile_is_normalized() {
    let catalog = RubricCatalog::from_profiles(vec![curl_profile()]).unwrap();
    let profile = catalog.get(&ExerciseId::new("cable_curl")).unwrap();
    assert_eq!(profile.display_name, "cable_curl");
    assert_eq!(profile.rubric.rule("curl_elbow").unwrap().title, "Elbow angle");
}

#[test]
fn test_duplicate_identifiers_are_rejected() {
    let result = RubricCatalog::from_profiles(vec![curl_profile(), curl_profile()]);
    assert_eq!(result.unwrap_err(), RubricError::Duplicate("cable_curl".into()));

    let mut catalog = RubricCatalog::builtin().unwrap();
    let clash = ExerciseProfile {
        aliases: vec![ExerciseId::new("back squat")],
        ..curl_profile()
    };
    assert_eq!(
        catalog.insert(clash).unwrap_err(),
        RubricError::Duplicate("back_squat".into())
    );
    assert!(!catalog.contains(&ExerciseId::new("cable curl")));
}

#[test]
fn test_empty_identifier_is_rejected() {
    let profile = ExerciseProfile {
        id: ExerciseId::new("  --  "),
        ..curl_profile()
    };
    assert_invalid(profile, "identifier is empty");
}

#[test]
fn test_profile_without_tracking_joints_is_rejected() {
    let mut profile = curl_profile();
    profile.motion.tracking_joints.clear();
    assert_invalid(profile, "no tracking joints");
}

#[test]
fn test_profile_without_rules_is_rejected() {
    let profile = ExerciseProfile {
        rubric: Rubric::default(),
        ..curl_profile()
    };
    assert_invalid(profile, "no rules");
}

#[test]
fn test_duplicate_rule_is_rejected() {
    let profile = ExerciseProfile {
        rubric: Rubric::new(vec![elbow_rule("curl_elbow"), elbow_rule("curl_elbow")]),
        ..curl_profile()
    };
    assert_invalid(profile, "defined more than once");
}

#[test]
fn test_inconsistent_thresholds_are_rejected() {
    let defaults = MotionThresholds::default();

    let mut profile = curl_profile();
    profile.motion.thresholds = MotionThresholds {
        top_tolerance: defaults.start_displacement,
        ..defaults
    };
    assert_invalid(profile, "top_tolerance");

    let mut profile = curl_profile();
    profile.motion.thresholds = MotionThresholds {
        min_displacement: defaults.start_displacement,
        ..defaults
    };
    assert_invalid(profile, "start_displacement");

    let mut profile = curl_profile();
    profile.motion.thresholds = MotionThresholds {
        debounce_frames: 0,
        ..defaults
    };
    assert_invalid(profile, "debounce_frames");

    let mut profile = curl_profile();
    profile.motion.thresholds = MotionThresholds {
        min_velocity: f64::NAN,
        ..defaults
    };
    assert_invalid(profile, "finite");
}

#[test]
fn test_invalid_rules_are_rejected() {
    let mut rule = elbow_rule("curl_elbow");
    rule.tip = "   ".into();
    let profile = ExerciseProfile {
        rubric: Rubric::new(vec![rule]),
        ..curl_profile()
    };
    assert_invalid(profile, "no coaching tip");

    let mut rule = elbow_rule("curl_elbow");
    rule.target = TargetRange::new(120.0, 60.0);
    let profile = ExerciseProfile {
        rubric: Rubric::new(vec![rule]),
        ..curl_profile()
    };
    assert_invalid(profile, "target range");

    let mut rule = elbow_rule("curl_elbow");
    rule.penalty = PenaltyCurve::Flat { penalty: -5.0 };
    let profile = ExerciseProfile {
        rubric: Rubric::new(vec![rule]),
        ..curl_profile()
    };
    assert_invalid(profile, "penalty parameters");
}

#[test]
fn test_json_round_trip_preserves_profiles() {
    let builtin = RubricCatalog::builtin().unwrap();
    let json = builtin.to_json_string().unwrap();
    let reloaded = RubricCatalog::from_json_str(&json).unwrap();

    assert_eq!(reloaded.len(), builtin.len());
    for profile in builtin.profiles() {
        assert_eq!(reloaded.get(&profile.id).unwrap(), profile);
    }
}

#[test]
fn test_minimal_json_document_uses_defaults() {
    let json = r#"{
        "exercises": [{
            "id": "Hip Thrust",
            "display_name": "Hip Thrust",
            "motion": { "tracking_joints": ["left_hip", "right_hip"], "direction": "up" },
            "rubric": { "rules": [{
                "id": "thrust_torso",
                "title": "Torso tilt",
                "metric": { "kind": "segment_inclination", "upper": "left_shoulder", "lower": "left_hip" },
                "target": { "min": 60.0, "max": 100.0 },
                "penalty": { "kind": "flat", "penalty": 10.0 },
                "tip": "Drive through your heels"
            }] }
        }]
    }"#;

    let catalog = RubricCatalog::from_json_str(json).unwrap();
    let profile = catalog.get(&ExerciseId::new("hip_thrust")).unwrap();
    assert_eq!(profile.motion.thresholds, MotionThresholds::default());
    assert_eq!(profile.motion.direction, DescentDirection::Up);
    let rule = profile.rubric.rule("thrust_torso").unwrap();
    assert_eq!(rule.priority, 0);
    assert!(!rule.bilateral);
    assert!(rule.praise.is_none());
}

#[test]
fn test_malformed_json_is_a_load_error() {
    let error = RubricCatalog::from_json_str("{\"exercises\": 3}").unwrap_err();
    assert!(matches!(error, RubricError::Load(_)));

    let missing = RubricCatalog::from_json_file(std::path::Path::new("/nonexistent/rubrics.json"))
        .unwrap_err();
    assert!(matches!(missing, RubricError::Load(_)));
}

#[test]
fn test_json_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rubrics.json");
    let catalog = RubricCatalog::from_profiles(vec![curl_profile()]).unwrap();
    std::fs::write(&path, catalog.to_json_string().unwrap()).unwrap();

    let loaded = RubricCatalog::from_json_file(&path).unwrap();
    assert!(loaded.contains(&ExerciseId::new("Cable Curl")));
}

#[test]
fn test_rubric_errors_map_to_invalid_rubric() {
    let error: formiq::errors::AnalysisError = RubricError::Duplicate("squat".into()).into();
    assert_eq!(error.code(), ErrorCode::InvalidRubric);
    assert!(error.is_fatal());
}
