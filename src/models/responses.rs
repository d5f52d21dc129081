use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::domain::{Role, User};

/// Plain success/failure envelope, used for errors and deletions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Token envelope returned by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub role: Role,
    pub name: String,
}

/// Collection envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Single-document envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ItemResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// Current-user payload for /me style endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserInfo,
}

/// Role-gated dashboard greeting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub message: String,
    pub data: DashboardData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub role: Role,
    pub user: String,
    pub email: String,
}

/// AI assistant reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub reply: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Aggregated student statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentStats {
    pub total: u64,
    pub active: u64,
    #[serde(rename = "avgCGPA")]
    pub avg_cgpa: String,
    #[serde(rename = "byCourse")]
    pub by_course: HashMap<String, i64>,
}

/// Aggregated account statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    #[serde(rename = "byRole")]
    pub by_role: HashMap<String, i64>,
    #[serde(rename = "recentUsers")]
    pub recent_users: Vec<User>,
}

/// Per-row outcome report for bulk operations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkReport {
    pub successful: Vec<serde_json::Value>,
    pub failed: Vec<serde_json::Value>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkResponse {
    pub success: bool,
    pub message: String,
    pub data: BulkReport,
}
