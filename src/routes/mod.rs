// Route exports
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod institutions;
pub mod schemes;
pub mod students;
pub mod teachers;
pub mod users;

use crate::config::AuthSettings;
use crate::core::SchemeMatcher;
use crate::models::{ApiMessage, HealthResponse};
use crate::services::{GeminiClient, StoreClient};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreClient>,
    pub gemini: Arc<GeminiClient>,
    pub matcher: SchemeMatcher,
    pub auth: AuthSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .configure(auth::configure)
            .configure(chat::configure)
            .configure(users::configure)
            .configure(students::configure)
            .configure(teachers::configure)
            .configure(institutions::configure)
            .configure(schemes::configure)
            .configure(dashboard::configure),
    );
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Uniform 500 with the generic client-facing message; details go to the log
pub(crate) fn server_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    HttpResponse::InternalServerError().json(ApiMessage::failure("Server error"))
}

#[cfg(test)]
mod tests {
    use crate::models::HealthResponse;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
