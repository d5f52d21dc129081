use crate::models::{EligibilityCriteria, MatchWeights, StudentProfile};

/// Calculate a match score (0-100) for a student against a scheme's criteria
///
/// Scoring formula (default weights):
/// score = (
///     cgpa_position * 30 +        # linear position within [minCGPA, maxCGPA]
///     attendance_margin * 20 +    # saturates 25 points above minAttendance
///     course_match * 25 +         # listed course, or no course restriction
///     semester_match * 25         # listed semester, or no semester restriction
/// )
///
/// The sum is rounded to the nearest integer and clamped to [0, 100].
/// Callers are expected to score only eligible students; out-of-domain
/// inputs are still scored mechanically and the clamp keeps the result
/// in range.
pub fn calculate_match_score(
    criteria: &EligibilityCriteria,
    student: &StudentProfile,
    weights: &MatchWeights,
) -> u8 {
    let total = cgpa_component(criteria, student.cgpa, weights.cgpa)
        + attendance_component(criteria, student.attendance, weights.attendance)
        + course_component(criteria, &student.course, weights.course)
        + semester_component(criteria, student.semester, weights.semester);

    total.round().clamp(0.0, 100.0) as u8
}

/// Linear position of the cgpa within the allowed range, scaled to `weight`.
///
/// A zero-width range awards full weight when the cgpa sits exactly on the
/// single allowed value and nothing otherwise; an inverted range (malformed
/// criteria) awards nothing.
#[inline]
fn cgpa_component(criteria: &EligibilityCriteria, cgpa: f64, weight: f64) -> f64 {
    let range = criteria.max_cgpa - criteria.min_cgpa;
    if range > 0.0 {
        ((cgpa - criteria.min_cgpa) / range) * weight
    } else if range == 0.0 && (cgpa - criteria.min_cgpa).abs() < f64::EPSILON {
        weight
    } else {
        0.0
    }
}

/// Margin above the attendance floor, saturating at 25 percentage points
#[inline]
fn attendance_component(criteria: &EligibilityCriteria, attendance: f64, weight: f64) -> f64 {
    ((attendance - criteria.min_attendance) / 25.0).min(1.0) * weight
}

/// Full weight when the criteria accept every course or list this one
#[inline]
fn course_component(criteria: &EligibilityCriteria, course: &str, weight: f64) -> f64 {
    if criteria.courses.is_empty() || criteria.courses.iter().any(|c| c == course) {
        weight
    } else {
        0.0
    }
}

/// Full weight when the criteria accept every semester or list this one
#[inline]
fn semester_component(criteria: &EligibilityCriteria, semester: u8, weight: f64) -> f64 {
    if criteria.semesters.is_empty() || criteria.semesters.contains(&semester) {
        weight
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> EligibilityCriteria {
        EligibilityCriteria {
            min_cgpa: 6.0,
            max_cgpa: 10.0,
            min_attendance: 75.0,
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
    fn test_reference_scenario_scores_77() {
        // ((8-6)/4)*30 + min((90-75)/25, 1)*20 + 25 + 25 = 15 + 12 + 25 + 25
        let score = calculate_match_score(&criteria(), &student(8.0, 90.0), &MatchWeights::default());
        assert_eq!(score, 77);
    }

    #[test]
    fn test_cgpa_at_min_contributes_zero() {
        let component = cgpa_component(&criteria(), 6.0, 30.0);
        assert_eq!(component, 0.0);
    }

    #[test]
    fn test_cgpa_at_max_contributes_full_weight() {
        let component = cgpa_component(&criteria(), 10.0, 30.0);
        assert_eq!(component, 30.0);
    }

    #[test]
    fn test_attendance_saturates_at_25_points_above_floor() {
        assert_eq!(attendance_component(&criteria(), 100.0, 20.0), 20.0);
        assert_eq!(attendance_component(&criteria(), 99.0, 20.0), 19.2);
    }

    #[test]
    fn test_perfect_student_caps_at_100() {
        let score = calculate_match_score(&criteria(), &student(10.0, 100.0), &MatchWeights::default());
        assert_eq!(score, 100);
    }

    #[test]
    fn test_unlisted_course_drops_course_weight() {
        let mut criteria = criteria();
        criteria.courses = vec!["B.Tech ECE".to_string()];

        // 15 + 12 + 0 + 25
        let score = calculate_match_score(&criteria, &student(8.0, 90.0), &MatchWeights::default());
        assert_eq!(score, 52);
    }

    #[test]
    fn test_unlisted_semester_drops_semester_weight() {
        let mut criteria = criteria();
        criteria.semesters = vec![1, 2];

        // 15 + 12 + 25 + 0
        let score = calculate_match_score(&criteria, &student(8.0, 90.0), &MatchWeights::default());
        assert_eq!(score, 52);
    }

    #[test]
    fn test_zero_width_cgpa_range() {
        let mut criteria = criteria();
        criteria.min_cgpa = 8.0;
        criteria.max_cgpa = 8.0;

        assert_eq!(cgpa_component(&criteria, 8.0, 30.0), 30.0);
        assert_eq!(cgpa_component(&criteria, 7.9, 30.0), 0.0);
    }

    #[test]
    fn test_inverted_range_scores_zero_cgpa_component() {
        let mut criteria = criteria();
        criteria.min_cgpa = 9.0;
        criteria.max_cgpa = 6.0;

        assert_eq!(cgpa_component(&criteria, 7.0, 30.0), 0.0);
    }

    #[test]
    fn test_score_never_negative() {
        // Attendance far below the floor would make the raw sum negative
        let mut criteria = criteria();
        criteria.min_attendance = 90.0;
        criteria.courses = vec!["MBA".to_string()];
        criteria.semesters = vec![1];

        let score = calculate_match_score(&criteria, &student(6.0, 0.0), &MatchWeights::default());
        assert_eq!(score, 0);
    }

    #[test]
    fn test_score_always_in_range() {
        let weights = MatchWeights::default();
        for cgpa in 0..=10 {
            for attendance in (0..=100).step_by(10) {
                let score = calculate_match_score(
                    &criteria(),
                    &student(cgpa as f64, attendance as f64),
                    &weights,
                );
                assert!(score <= 100);
            }
        }
    }
}
