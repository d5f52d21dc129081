// Core algorithm exports
pub mod eligibility;
pub mod matcher;
pub mod scoring;

pub use eligibility::{check_eligibility, Eligibility};
pub use matcher::SchemeMatcher;
pub use scoring::calculate_match_score;
