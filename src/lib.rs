//! SIS API - Student Information System backend
//!
//! JWT-authenticated REST service over a document database, with a
//! scheme-eligibility and match-scoring core that ranks financial-aid
//! schemes for students, and a thin proxy to a generative AI assistant.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{check_eligibility, calculate_match_score, Eligibility, SchemeMatcher};
pub use models::{
    EligibilityCriteria, MatchWeights, Scheme, SchemeMatch, Student, StudentProfile, User,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let criteria = EligibilityCriteria::default();
        let student = StudentProfile {
            cgpa: 8.0,
            attendance: 90.0,
            course: "B.Tech CSE".to_string(),
            semester: 4,
        };
        let verdict = check_eligibility(&criteria, &student);
        assert!(verdict.eligible);
    }
}
