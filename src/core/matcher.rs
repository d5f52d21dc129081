use crate::core::{eligibility::check_eligibility, scoring::calculate_match_score};
use crate::models::{MatchWeights, Scheme, SchemeMatch, StudentProfile};

/// Ranks a scheme catalog for a student
///
/// # Pipeline stages
/// 1. Skip schemes with malformed eligibility criteria (logged, never fatal)
/// 2. Eligibility filter
/// 3. Match scoring
/// 4. Sort by score descending
#[derive(Debug, Clone)]
pub struct SchemeMatcher {
    weights: MatchWeights,
}

impl SchemeMatcher {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: MatchWeights::default(),
        }
    }

    /// Score the eligible schemes for a student and rank them
    ///
    /// The caller supplies schemes already filtered to active,
    /// non-expired entries. Ineligible schemes are dropped; malformed
    /// ones (minCGPA > maxCGPA) are logged at WARN and skipped. The
    /// sort is stable, so equal scores keep their fetch order.
    pub fn rank(&self, student: &StudentProfile, schemes: Vec<Scheme>) -> Vec<SchemeMatch> {
        let mut matches: Vec<SchemeMatch> = schemes
            .into_iter()
            .filter_map(|scheme| {
                if !scheme.eligibility_criteria.is_well_formed() {
                    tracing::warn!(
                        "Skipping scheme '{}': minCGPA {} exceeds maxCGPA {}",
                        scheme.name,
                        scheme.eligibility_criteria.min_cgpa,
                        scheme.eligibility_criteria.max_cgpa
                    );
                    return None;
                }

                let verdict = check_eligibility(&scheme.eligibility_criteria, student);
                if !verdict.eligible {
                    tracing::debug!("Scheme '{}' ineligible: {}", scheme.name, verdict.reason);
                    return None;
                }

                let match_score =
                    calculate_match_score(&scheme.eligibility_criteria, student, &self.weights);

                Some(SchemeMatch {
                    scheme,
                    match_score,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matches
    }

    /// Ranked schemes only, scores discarded
    pub fn recommend(&self, student: &StudentProfile, schemes: Vec<Scheme>) -> Vec<Scheme> {
        self.rank(student, schemes)
            .into_iter()
            .map(|m| m.scheme)
            .collect()
    }
}

impl Default for SchemeMatcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EligibilityCriteria, SchemeType};
    use chrono::{Duration, Utc};

    fn scheme(name: &str, min_cgpa: f64, max_cgpa: f64, min_attendance: f64) -> Scheme {
        Scheme {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            short_name: None,
            description: format!("{} description", name),
            scheme_type: SchemeType::Scholarship,
            department: "Education".to_string(),
            ministry: None,
            level: "Central".to_string(),
            eligibility_criteria: EligibilityCriteria {
                min_cgpa,
                max_cgpa,
                min_attendance,
                ..Default::default()
            },
            application_start_date: None,
            application_end_date: Some(Utc::now() + Duration::days(30)),
            application_url: None,
            benefits: vec![],
            tags: vec![],
            category: "General".to_string(),
            total_applicants: 0,
            total_beneficiaries: 0,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn student() -> StudentProfile {
        StudentProfile {
            cgpa: 8.0,
            attendance: 90.0,
            course: "B.Tech CSE".to_string(),
            semester: 4,
        }
    }

    #[test]
    fn test_ineligible_schemes_dropped() {
        let matcher = SchemeMatcher::with_default_weights();
        let schemes = vec![
            scheme("Open Grant", 0.0, 10.0, 0.0),
            scheme("Topper Award", 9.5, 10.0, 0.0), // cgpa 8.0 out of range
        ];

        let ranked = matcher.rank(&student(), schemes);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].scheme.name, "Open Grant");
    }

    #[test]
    fn test_higher_score_ranks_first() {
        let matcher = SchemeMatcher::with_default_weights();
        // Tight range puts cgpa 8 high in it: score 90; wide range: score 77
        let schemes = vec![
            scheme("Merit Scholarship", 6.0, 10.0, 75.0),
            scheme("Progress Grant", 6.0, 8.0, 75.0),
        ];

        let ranked = matcher.rank(&student(), schemes);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].scheme.name, "Progress Grant");
        assert!(ranked[0].match_score > ranked[1].match_score);
    }

    #[test]
    fn test_equal_scores_keep_fetch_order() {
        let matcher = SchemeMatcher::with_default_weights();
        let schemes = vec![
            scheme("First Fetched", 6.0, 10.0, 75.0),
            scheme("Second Fetched", 6.0, 10.0, 75.0),
        ];

        let ranked = matcher.rank(&student(), schemes);
        assert_eq!(ranked[0].match_score, ranked[1].match_score);
        assert_eq!(ranked[0].scheme.name, "First Fetched");
        assert_eq!(ranked[1].scheme.name, "Second Fetched");
    }

    #[test]
    fn test_malformed_scheme_skipped_without_panic() {
        let matcher = SchemeMatcher::with_default_weights();
        let schemes = vec![
            scheme("Broken Bounds", 9.0, 6.0, 0.0),
            scheme("Open Grant", 0.0, 10.0, 0.0),
        ];

        let ranked = matcher.rank(&student(), schemes);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].scheme.name, "Open Grant");
    }

    #[test]
    fn test_recommend_returns_schemes_only() {
        let matcher = SchemeMatcher::with_default_weights();
        let schemes = vec![
            scheme("Merit Scholarship", 6.0, 10.0, 75.0),
            scheme("Progress Grant", 6.0, 8.0, 75.0),
        ];

        let recommended = matcher.recommend(&student(), schemes);
        assert_eq!(recommended.len(), 2);
        assert_eq!(recommended[0].name, "Progress Grant");
    }

    #[test]
    fn test_empty_catalog() {
        let matcher = SchemeMatcher::with_default_weights();
        assert!(matcher.recommend(&student(), vec![]).is_empty());
    }
}
