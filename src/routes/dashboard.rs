use crate::models::{DashboardData, DashboardResponse, MeResponse, Role};
use crate::services::auth::AuthUser;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};

/// Configure role-gated dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin/dashboard", web::get().to(admin_dashboard))
        .route("/institution/dashboard", web::get().to(institution_dashboard))
        .route("/student/dashboard", web::get().to(student_dashboard))
        .route("/me", web::get().to(me));
}

fn dashboard(auth: &AuthUser, message: &str) -> HttpResponse {
    HttpResponse::Ok().json(DashboardResponse {
        success: true,
        message: message.to_string(),
        data: DashboardData {
            role: auth.user.role,
            user: auth.user.name.clone(),
            email: auth.user.email.clone(),
        },
    })
}

async fn admin_dashboard(auth: AuthUser) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }
    dashboard(&auth, "Welcome to Admin Dashboard!")
}

async fn institution_dashboard(auth: AuthUser) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Institution]) {
        return e.error_response();
    }
    dashboard(&auth, "Welcome to Institution Dashboard!")
}

async fn student_dashboard(auth: AuthUser) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Student]) {
        return e.error_response();
    }
    dashboard(&auth, "Welcome to Student Dashboard!")
}

/// Current account info for any authenticated role
async fn me(auth: AuthUser) -> impl Responder {
    HttpResponse::Ok().json(MeResponse {
        success: true,
        user: (&auth.user).into(),
    })
}
