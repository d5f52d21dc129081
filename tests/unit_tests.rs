// Unit tests for the SIS API matching core

use sis_api::core::{check_eligibility, calculate_match_score};
use sis_api::models::{EligibilityCriteria, MatchWeights, StudentProfile};

fn criteria(min_cgpa: f64, max_cgpa: f64, min_attendance: f64) -> EligibilityCriteria {
    EligibilityCriteria {
        min_cgpa,
        max_cgpa,
        min_attendance,
        ..Default::default()
    }
}

fn student(cgpa: f64, attendance: f64) -> StudentProfile {
    StudentProfile {
        cgpa,
        attendance,
        course: "B.Tech CSE".to_string(),
        semester: 4,
    }
}

#[test]
fn test_eligibility_all_criteria_met() {
    let verdict = check_eligibility(&criteria(6.0, 10.0, 75.0), &student(8.0, 90.0));
    assert!(verdict.eligible);
    assert_eq!(verdict.reason, "All criteria met");
}

#[test]
fn test_eligibility_cgpa_bounds_are_inclusive() {
    let c = criteria(6.0, 9.0, 0.0);
    assert!(check_eligibility(&c, &student(6.0, 0.0)).eligible);
    assert!(check_eligibility(&c, &student(9.0, 0.0)).eligible);
    assert!(!check_eligibility(&c, &student(5.99, 0.0)).eligible);
    assert!(!check_eligibility(&c, &student(9.01, 0.0)).eligible);
}

#[test]
fn test_eligibility_attendance_threshold() {
    let c = criteria(0.0, 10.0, 75.0);
    assert!(check_eligibility(&c, &student(8.0, 75.0)).eligible);

    let verdict = check_eligibility(&c, &student(8.0, 74.9));
    assert!(!verdict.eligible);
    assert_eq!(verdict.reason, "Insufficient attendance");
}

#[test]
fn test_eligibility_course_membership() {
    let c = EligibilityCriteria {
        courses: vec!["B.Tech ECE".to_string()],
        ..Default::default()
    };
    let verdict = check_eligibility(&c, &student(8.0, 90.0));
    assert!(!verdict.eligible);
    assert_eq!(verdict.reason, "Course not eligible");
}

#[test]
fn test_eligibility_semester_membership() {
    let c = EligibilityCriteria {
        semesters: vec![7, 8],
        ..Default::default()
    };
    let verdict = check_eligibility(&c, &student(8.0, 90.0));
    assert!(!verdict.eligible);
    assert_eq!(verdict.reason, "Semester not eligible");
}

#[test]
fn test_eligibility_cgpa_checked_before_attendance() {
    // cgpa and attendance both fail; the cgpa reason wins
    let verdict = check_eligibility(&criteria(9.0, 10.0, 99.0), &student(5.0, 10.0));
    assert!(!verdict.eligible);
    assert_eq!(verdict.reason, "CGPA not in range");
}

#[test]
fn test_reference_score() {
    // cgpa 8.0 in [6,10], attendance 90 over min 75, course and
    // semester unconstrained: 15 + 12 + 25 + 25 = 77
    let score = calculate_match_score(
        &criteria(6.0, 10.0, 75.0),
        &student(8.0, 90.0),
        &MatchWeights::default(),
    );
    assert_eq!(score, 77);
}

#[test]
fn test_score_never_exceeds_100() {
    let score = calculate_match_score(
        &criteria(0.0, 10.0, 0.0),
        &student(10.0, 100.0),
        &MatchWeights::default(),
    );
    assert_eq!(score, 100);
}

#[test]
fn test_score_attendance_component_saturates() {
    // 25 points over the minimum saturates the attendance component
    let low = calculate_match_score(
        &criteria(0.0, 10.0, 50.0),
        &student(0.0, 75.0),
        &MatchWeights::default(),
    );
    let high = calculate_match_score(
        &criteria(0.0, 10.0, 50.0),
        &student(0.0, 100.0),
        &MatchWeights::default(),
    );
    assert_eq!(low, high);
}

#[test]
fn test_score_in_range_across_inputs() {
    let weights = MatchWeights::default();
    for cgpa in [0.0, 2.5, 5.0, 7.5, 10.0] {
        for attendance in [0.0, 25.0, 50.0, 75.0, 100.0] {
            let score =
                calculate_match_score(&criteria(0.0, 10.0, 0.0), &student(cgpa, attendance), &weights);
            assert!(score <= 100, "Score {} out of range", score);
        }
    }
}
