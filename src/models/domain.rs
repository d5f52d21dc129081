use serde::{Deserialize, Serialize};

/// Account role used for route authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
    Institution,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            "institution" => Some(Role::Institution),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
            Role::Institution => "institution",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account record
///
/// The password field holds the salted hash and is stripped from every
/// response; only login reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    /// Drop the password hash before the record leaves the service
    pub fn without_password(mut self) -> Self {
        self.password = None;
        self
    }
}

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(rename = "apaarId", default)]
    pub apaar_id: Option<String>,
    pub course: String,
    #[serde(default)]
    pub semester: Option<u8>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(rename = "enrollmentNumber", default)]
    pub enrollment_number: Option<String>,
    #[serde(default)]
    pub cgpa: f64,
    #[serde(default)]
    pub attendance: f64,
    #[serde(default)]
    pub assignments: f64,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Owning institution user id
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Student {
    /// The subset of student data the scheme matcher consumes
    pub fn profile(&self) -> StudentProfile {
        StudentProfile {
            cgpa: self.cgpa,
            attendance: self.attendance,
            course: self.course.clone(),
            semester: self.semester.unwrap_or(0),
        }
    }
}

/// Matching input: cgpa in [0,10], attendance in [0,100], semester in [1,10]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProfile {
    pub cgpa: f64,
    pub attendance: f64,
    pub course: String,
    pub semester: u8,
}

/// Teacher record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "aparId", default)]
    pub apar_id: Option<String>,
    pub email: String,
    pub department: String,
    #[serde(default = "default_designation")]
    pub designation: String,
    #[serde(default)]
    pub publications: u32,
    #[serde(default)]
    pub projects: u32,
    #[serde(rename = "hIndex", default)]
    pub h_index: u32,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(rename = "institutionId", default)]
    pub institution_id: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_designation() -> String {
    "Assistant Professor".to_string()
}

/// Institution record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institution {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    #[serde(rename = "aisheCode")]
    pub aishe_code: String,
    pub location: String,
    #[serde(rename = "type", default = "default_institution_type")]
    pub institution_type: String,
    #[serde(default = "default_accreditation")]
    pub accreditation: String,
    #[serde(rename = "nirfScore", default)]
    pub nirf_score: f64,
    #[serde(default)]
    pub ranking: u32,
    #[serde(default)]
    pub compliance: f64,
    #[serde(default)]
    pub students: u32,
    #[serde(default)]
    pub faculty: u32,
    #[serde(default)]
    pub departments: u32,
    #[serde(default)]
    pub projects: u32,
    #[serde(default)]
    pub established: Option<u16>,
    #[serde(default)]
    pub placement: f64,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_institution_type() -> String {
    "Private".to_string()
}

fn default_accreditation() -> String {
    "NAAC A".to_string()
}

/// Bounds a student must satisfy to qualify for a scheme
///
/// Empty `courses`/`semesters` mean every course/semester is accepted.
/// `categories`, `family_income` and `special_criteria` are informational
/// and never evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    #[serde(rename = "minCGPA", default)]
    pub min_cgpa: f64,
    #[serde(rename = "maxCGPA", default = "default_max_cgpa")]
    pub max_cgpa: f64,
    #[serde(rename = "minAttendance", default)]
    pub min_attendance: f64,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub semesters: Vec<u8>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(rename = "familyIncome", default, skip_serializing_if = "Option::is_none")]
    pub family_income: Option<IncomeRange>,
    #[serde(rename = "specialCriteria", default, skip_serializing_if = "Option::is_none")]
    pub special_criteria: Option<String>,
}

impl EligibilityCriteria {
    /// Admin CRUD does not validate stored bounds, so the matcher checks
    /// the minCGPA <= maxCGPA invariant itself before scoring.
    pub fn is_well_formed(&self) -> bool {
        self.min_cgpa <= self.max_cgpa
    }
}

impl Default for EligibilityCriteria {
    fn default() -> Self {
        Self {
            min_cgpa: 0.0,
            max_cgpa: default_max_cgpa(),
            min_attendance: 0.0,
            courses: vec![],
            semesters: vec![],
            categories: vec![],
            family_income: None,
            special_criteria: None,
        }
    }
}

fn default_max_cgpa() -> f64 {
    10.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemeType {
    Scholarship,
    Fellowship,
    Loan,
    Grant,
    Award,
    Subsidy,
    Other,
}

/// Financial-aid scheme with eligibility rules and an application window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheme {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    pub description: String,
    #[serde(rename = "type")]
    pub scheme_type: SchemeType,
    pub department: String,
    #[serde(default)]
    pub ministry: Option<String>,
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(rename = "eligibilityCriteria", default)]
    pub eligibility_criteria: EligibilityCriteria,
    #[serde(rename = "applicationStartDate", default)]
    pub application_start_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "applicationEndDate", default)]
    pub application_end_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "applicationUrl", default)]
    pub application_url: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(rename = "totalApplicants", default)]
    pub total_applicants: u32,
    #[serde(rename = "totalBeneficiaries", default)]
    pub total_beneficiaries: u32,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Scheme {
    /// Active flag set and application window not yet closed.
    /// A scheme without an end date is never open, matching the store
    /// query that requires applicationEndDate >= now.
    pub fn is_open(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.is_active && self.application_end_date.map_or(false, |end| end >= now)
    }
}

fn default_level() -> String {
    "Central".to_string()
}

fn default_category() -> String {
    "General".to_string()
}

fn default_true() -> bool {
    true
}

/// Weights of the four match-score components, summing to 100
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    pub cgpa: f64,
    pub attendance: f64,
    pub course: f64,
    pub semester: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            cgpa: 30.0,
            attendance: 20.0,
            course: 25.0,
            semester: 25.0,
        }
    }
}

/// Transient scheme/score pair produced per request, never persisted
#[derive(Debug, Clone, Serialize)]
pub struct SchemeMatch {
    pub scheme: Scheme,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}
