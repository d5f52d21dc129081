use crate::models::{
    ApiMessage, ItemResponse, ListResponse, Role, Scheme, SchemeQuery, Student,
};
use crate::routes::{server_error, AppState};
use crate::services::auth::AuthUser;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::{json, Value};

/// Configure scheme routes
///
/// Literal paths are registered before the `{id}` routes so that
/// `/active` and `/recommended/...` never match as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/schemes")
            .route("", web::get().to(list_schemes))
            .route("/active", web::get().to(active_schemes))
            .route(
                "/recommended/{student_id}",
                web::get().to(recommended_schemes),
            )
            .route("", web::post().to(create_scheme))
            .route("/{id}", web::get().to(get_scheme))
            .route("/{id}", web::put().to(update_scheme))
            .route("/{id}", web::delete().to(delete_scheme)),
    );
}

/// GET /api/schemes?type=&active=&limit=
async fn list_schemes(
    state: web::Data<AppState>,
    _auth: AuthUser,
    query: web::Query<SchemeQuery>,
) -> impl Responder {
    let mut filter = json!({});
    if let Some(scheme_type) = &query.scheme_type {
        filter["type"] = json!(scheme_type);
    }
    if let Some(active) = query.active {
        filter["isActive"] = json!(active);
    }

    match state
        .store
        .find::<Scheme>(
            &state.store.collections.schemes,
            filter,
            Some(json!({ "createdAt": -1 })),
            query.limit,
        )
        .await
    {
        Ok(schemes) => HttpResponse::Ok().json(ListResponse::new(schemes)),
        Err(e) => server_error("Get schemes error", e),
    }
}

/// GET /api/schemes/active
///
/// Active schemes whose application window has not closed, soonest
/// deadline first.
async fn active_schemes(state: web::Data<AppState>, _auth: AuthUser) -> impl Responder {
    match state.store.active_schemes(chrono::Utc::now()).await {
        Ok(schemes) => HttpResponse::Ok().json(ListResponse::new(schemes)),
        Err(e) => server_error("Get active schemes error", e),
    }
}

/// GET /api/schemes/recommended/{student_id}
///
/// Open schemes the student is eligible for, best match first. Scores
/// stay internal; the response carries the schemes alone.
async fn recommended_schemes(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    let student = match state
        .store
        .find_one::<Student>(
            &state.store.collections.students,
            json!({ "_id": path.as_str() }),
        )
        .await
    {
        Ok(Some(student)) => student,
        Ok(None) => {
            return HttpResponse::NotFound().json(ApiMessage::failure("Student not found"));
        }
        Err(e) => return server_error("Get recommended schemes error", e),
    };

    let schemes = match state.store.active_schemes(chrono::Utc::now()).await {
        Ok(schemes) => schemes,
        Err(e) => return server_error("Get recommended schemes error", e),
    };

    let recommended = state.matcher.recommend(&student.profile(), schemes);
    HttpResponse::Ok().json(ListResponse::new(recommended))
}

/// GET /api/schemes/{id}
async fn get_scheme(
    state: web::Data<AppState>,
    _auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    match state
        .store
        .find_one::<Scheme>(
            &state.store.collections.schemes,
            json!({ "_id": path.as_str() }),
        )
        .await
    {
        Ok(Some(scheme)) => HttpResponse::Ok().json(ItemResponse::new(scheme)),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Scheme not found")),
        Err(e) => server_error("Get scheme error", e),
    }
}

/// POST /api/schemes — admin only, scheme names are unique
async fn create_scheme(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<Scheme>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    let mut scheme = req.into_inner();

    match state
        .store
        .find_one::<Scheme>(
            &state.store.collections.schemes,
            json!({ "name": &scheme.name }),
        )
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest()
                .json(ApiMessage::failure("Scheme with this name already exists"));
        }
        Ok(None) => {}
        Err(e) => return server_error("Create scheme error", e),
    }

    let now = chrono::Utc::now();
    scheme.id = uuid::Uuid::new_v4().to_string();
    scheme.created_at = Some(now);
    scheme.updated_at = Some(now);

    match state
        .store
        .insert_one(&state.store.collections.schemes, &scheme)
        .await
    {
        Ok(_) => HttpResponse::Created().json(ItemResponse::with_message(
            scheme,
            "Scheme created successfully",
        )),
        Err(e) => server_error("Create scheme error", e),
    }
}

/// PUT /api/schemes/{id} — admin only
async fn update_scheme(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
    req: web::Json<Value>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    if !req.is_object() {
        return HttpResponse::BadRequest().json(ApiMessage::failure("Invalid update payload"));
    }

    let id = path.into_inner();
    match state
        .store
        .update_one(&state.store.collections.schemes, &id, req.into_inner())
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ApiMessage::failure("Scheme not found"));
        }
        Err(e) => return server_error("Update scheme error", e),
    }

    match state
        .store
        .find_one::<Scheme>(&state.store.collections.schemes, json!({ "_id": id }))
        .await
    {
        Ok(Some(scheme)) => HttpResponse::Ok().json(ItemResponse::with_message(
            scheme,
            "Scheme updated successfully",
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Scheme not found")),
        Err(e) => server_error("Update scheme error", e),
    }
}

/// DELETE /api/schemes/{id} — admin only, soft delete
async fn delete_scheme(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    match state
        .store
        .update_one(
            &state.store.collections.schemes,
            path.as_str(),
            json!({ "isActive": false }),
        )
        .await
    {
        Ok(true) => HttpResponse::Ok().json(ApiMessage::ok("Scheme deleted successfully")),
        Ok(false) => HttpResponse::NotFound().json(ApiMessage::failure("Scheme not found")),
        Err(e) => server_error("Delete scheme error", e),
    }
}
