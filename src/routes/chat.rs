use crate::models::{ApiMessage, ChatRequest, ChatResponse};
use crate::routes::AppState;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure AI assistant routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/chat").route("/ask", web::post().to(ask)));
}

/// POST /api/chat/ask
///
/// Thin proxy to the generative AI service, open to unauthenticated
/// callers. Upstream failures surface as a 500 with a fixed reply; the
/// real error goes to the log.
async fn ask(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ApiMessage::failure(errors.to_string()));
    }

    match state.gemini.ask(&req.message).await {
        Ok(reply) => HttpResponse::Ok().json(ChatResponse {
            success: true,
            reply,
        }),
        Err(e) => {
            tracing::error!("Chat proxy error: {}", e);
            HttpResponse::InternalServerError().json(ChatResponse {
                success: false,
                reply: "AI server error".to_string(),
            })
        }
    }
}
