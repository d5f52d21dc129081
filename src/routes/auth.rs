use crate::models::{ApiMessage, AuthResponse, MeResponse, LoginRequest, RegisterRequest, Role, User};
use crate::routes::{server_error, AppState};
use crate::services::auth::{hash_password, issue_token, verify_password, AuthUser};
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure authentication routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me)),
    );
}

/// Register endpoint
///
/// POST /api/auth/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ApiMessage::failure(errors.to_string()));
    }

    let role = match Role::parse(&req.role) {
        Some(role) => role,
        None => return HttpResponse::BadRequest().json(ApiMessage::failure("Invalid role")),
    };

    match state.store.find_user_by_email(&req.email).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ApiMessage::failure("Email already exists"));
        }
        Ok(None) => {}
        Err(e) => return server_error("Register lookup failed", e),
    }

    let now = chrono::Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: req.name.clone(),
        email: req.email.to_lowercase(),
        password: Some(hash_password(&req.password)),
        role,
        is_active: true,
        created_at: Some(now),
        updated_at: Some(now),
    };

    if let Err(e) = state
        .store
        .insert_one(&state.store.collections.users, &user)
        .await
    {
        return server_error("Register insert failed", e);
    }

    tracing::info!("Registered {} account for {}", role, user.email);

    match issue_token(
        &user.id,
        role,
        &state.auth.jwt_secret,
        state.auth.token_expiry_hours,
    ) {
        Ok(token) => HttpResponse::Created().json(AuthResponse {
            success: true,
            message: Some("User registered successfully".to_string()),
            token,
            user_id: user.id,
            role,
            name: user.name,
        }),
        Err(e) => e.error_response(),
    }
}

/// Login endpoint
///
/// POST /api/auth/login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ApiMessage::failure(errors.to_string()));
    }

    let user = match state.store.find_user_by_email(&req.email).await {
        Ok(user) => user,
        Err(e) => return server_error("Login lookup failed", e),
    };

    // Unknown email and wrong password get the same response, so a
    // caller cannot probe which accounts exist
    let password_ok = user
        .as_ref()
        .and_then(|u| u.password.as_deref())
        .map(|stored| verify_password(&req.password, stored))
        .unwrap_or(false);

    let user = match user {
        Some(user) if password_ok => user,
        _ => {
            return HttpResponse::Unauthorized()
                .json(ApiMessage::failure("Invalid credentials"));
        }
    };

    if !user.is_active {
        return HttpResponse::Unauthorized().json(ApiMessage::failure("Account deactivated"));
    }

    match issue_token(
        &user.id,
        user.role,
        &state.auth.jwt_secret,
        state.auth.token_expiry_hours,
    ) {
        Ok(token) => HttpResponse::Ok().json(AuthResponse {
            success: true,
            message: None,
            token,
            user_id: user.id,
            role: user.role,
            name: user.name,
        }),
        Err(e) => e.error_response(),
    }
}

/// Current account info
///
/// GET /api/auth/me
async fn me(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(MeResponse {
        success: true,
        user: (&auth.user).into(),
    })
}
