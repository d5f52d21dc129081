use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub collection: CollectionSettings,
    pub auth: AuthSettings,
    pub ai: AiSettings,
    pub scoring: ScoringSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Document database (Atlas Data API) connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub endpoint: String,
    pub api_key: String,
    pub data_source: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub users: String,
    pub students: String,
    pub teachers: String,
    pub institutions: String,
    pub schemes: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

fn default_token_expiry_hours() -> i64 {
    168 // 7 days
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
}

fn default_ai_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_ai_model() -> String {
    "gemini-2.0-flash".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

/// Match-score component weights; defaults sum to 100
#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_cgpa_weight")]
    pub cgpa: f64,
    #[serde(default = "default_attendance_weight")]
    pub attendance: f64,
    #[serde(default = "default_course_weight")]
    pub course: f64,
    #[serde(default = "default_semester_weight")]
    pub semester: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            cgpa: default_cgpa_weight(),
            attendance: default_attendance_weight(),
            course: default_course_weight(),
            semester: default_semester_weight(),
        }
    }
}

fn default_cgpa_weight() -> f64 { 30.0 }
fn default_attendance_weight() -> f64 { 20.0 }
fn default_course_weight() -> f64 { 25.0 }
fn default_semester_weight() -> f64 { 25.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// CORS allowlist; empty means permissive (development)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SIS_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SIS_)
            // e.g., SIS_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SIS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Well-known secret env vars override the config tree
        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SIS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Let the deployment's plain env vars (ATLAS_API_KEY, JWT_SECRET,
/// GEMINI_API_KEY) win over anything in the config files
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let atlas_api_key = env::var("ATLAS_API_KEY")
        .or_else(|_| env::var("SIS_DATABASE__API_KEY"))
        .ok();
    let jwt_secret = env::var("JWT_SECRET")
        .or_else(|_| env::var("SIS_AUTH__JWT_SECRET"))
        .ok();
    let gemini_api_key = env::var("GEMINI_API_KEY")
        .or_else(|_| env::var("SIS_AI__API_KEY"))
        .ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(key) = atlas_api_key {
        builder = builder.set_override("database.api_key", key)?;
    }
    if let Some(secret) = jwt_secret {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Some(key) = gemini_api_key {
        builder = builder.set_override("ai.api_key", key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.cgpa, 30.0);
        assert_eq!(weights.attendance, 20.0);
        assert_eq!(weights.course, 25.0);
        assert_eq!(weights.semester, 25.0);
    }

    #[test]
    fn test_weights_sum_to_max_score() {
        let weights = WeightsConfig::default();
        assert_eq!(
            weights.cgpa + weights.attendance + weights.course + weights.semester,
            100.0
        );
    }

    #[test]
    fn test_default_logging() {
        assert_eq!(default_log_level(), "info");
        assert_eq!(default_log_format(), "json");
    }

    #[test]
    fn test_default_token_expiry_is_seven_days() {
        assert_eq!(default_token_expiry_hours(), 7 * 24);
    }
}
