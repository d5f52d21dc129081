use crate::models::{EligibilityCriteria, StudentProfile};

/// Verdict of an eligibility check: pass/fail plus the first failing rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub eligible: bool,
    pub reason: &'static str,
}

impl Eligibility {
    fn fail(reason: &'static str) -> Self {
        Self {
            eligible: false,
            reason,
        }
    }
}

/// Evaluate a student against a scheme's eligibility criteria
///
/// Predicates run in a fixed order and the check stops at the first
/// failure:
/// 1. cgpa within [minCGPA, maxCGPA] inclusive
/// 2. attendance >= minAttendance
/// 3. course membership, when the criteria list specific courses
/// 4. semester membership, when the criteria list specific semesters
///
/// Empty course/semester lists accept every course/semester. Pure
/// function of its inputs; criteria with minCGPA > maxCGPA fail the
/// first predicate for every student.
pub fn check_eligibility(criteria: &EligibilityCriteria, student: &StudentProfile) -> Eligibility {
    if student.cgpa < criteria.min_cgpa || student.cgpa > criteria.max_cgpa {
        return Eligibility::fail("CGPA not in range");
    }

    if student.attendance < criteria.min_attendance {
        return Eligibility::fail("Insufficient attendance");
    }

    if !criteria.courses.is_empty() && !criteria.courses.contains(&student.course) {
        return Eligibility::fail("Course not eligible");
    }

    if !criteria.semesters.is_empty() && !criteria.semesters.contains(&student.semester) {
        return Eligibility::fail("Semester not eligible");
    }

    Eligibility {
        eligible: true,
        reason: "All criteria met",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(cgpa: f64, attendance: f64) -> StudentProfile {
        StudentProfile {
            cgpa,
            attendance,
            course: "B.Tech CSE".to_string(),
            semester: 4,
        }
    }

    fn criteria() -> EligibilityCriteria {
        EligibilityCriteria {
            min_cgpa: 6.0,
            max_cgpa: 10.0,
            min_attendance: 75.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_all_criteria_met() {
        let verdict = check_eligibility(&criteria(), &student(8.0, 90.0));
        assert!(verdict.eligible);
        assert_eq!(verdict.reason, "All criteria met");
    }

    #[test]
    fn test_cgpa_below_range() {
        let verdict = check_eligibility(&criteria(), &student(5.0, 90.0));
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, "CGPA not in range");
    }

    #[test]
    fn test_cgpa_bounds_inclusive() {
        assert!(check_eligibility(&criteria(), &student(6.0, 90.0)).eligible);
        assert!(check_eligibility(&criteria(), &student(10.0, 90.0)).eligible);
    }

    #[test]
    fn test_insufficient_attendance() {
        let verdict = check_eligibility(&criteria(), &student(8.0, 60.0));
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, "Insufficient attendance");
    }

    #[test]
    fn test_course_not_listed() {
        let mut criteria = criteria();
        criteria.courses = vec!["B.Tech CSE".to_string()];
        let mut profile = student(8.0, 90.0);
        profile.course = "B.Tech ECE".to_string();

        let verdict = check_eligibility(&criteria, &profile);
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, "Course not eligible");
    }

    #[test]
    fn test_semester_not_listed() {
        let mut criteria = criteria();
        criteria.semesters = vec![1, 2];

        let verdict = check_eligibility(&criteria, &student(8.0, 90.0));
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, "Semester not eligible");
    }

    #[test]
    fn test_empty_lists_accept_any_course_and_semester() {
        let mut profile = student(8.0, 90.0);
        profile.course = "BBA".to_string();
        profile.semester = 9;

        assert!(check_eligibility(&criteria(), &profile).eligible);
    }

    #[test]
    fn test_failure_order_cgpa_reported_first() {
        // Student fails every rule; the CGPA reason wins
        let mut criteria = criteria();
        criteria.courses = vec!["B.Tech CSE".to_string()];
        criteria.semesters = vec![1];
        let mut profile = student(2.0, 10.0);
        profile.course = "BBA".to_string();
        profile.semester = 9;

        let verdict = check_eligibility(&criteria, &profile);
        assert_eq!(verdict.reason, "CGPA not in range");
    }

    #[test]
    fn test_inverted_bounds_never_eligible() {
        let criteria = EligibilityCriteria {
            min_cgpa: 9.0,
            max_cgpa: 6.0,
            ..Default::default()
        };
        let verdict = check_eligibility(&criteria, &student(7.5, 90.0));
        assert!(!verdict.eligible);
        assert_eq!(verdict.reason, "CGPA not in range");
    }
}
