use crate::models::{ApiMessage, Institution, ItemResponse, ListQuery, ListResponse, Role};
use crate::routes::{server_error, AppState};
use crate::services::auth::AuthUser;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::{json, Value};

/// Configure institution routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/institutions")
            .route("", web::get().to(list_institutions))
            .route("", web::post().to(create_institution))
            .route("/{id}", web::get().to(get_institution))
            .route("/{id}", web::put().to(update_institution))
            .route("/{id}", web::delete().to(delete_institution)),
    );
}

/// GET /api/institutions?search=&limit=
async fn list_institutions(
    state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    let mut filter = json!({ "isActive": true });
    if let Some(search) = &query.search {
        filter["$or"] = json!([
            { "name": { "$regex": search, "$options": "i" } },
            { "aisheCode": { "$regex": search, "$options": "i" } },
            { "location": { "$regex": search, "$options": "i" } },
        ]);
    }

    match state
        .store
        .find::<Institution>(
            &state.store.collections.institutions,
            filter,
            Some(json!({ "name": 1 })),
            query.limit,
        )
        .await
    {
        Ok(institutions) => HttpResponse::Ok().json(ListResponse::new(institutions)),
        Err(e) => server_error("Get institutions error", e),
    }
}

/// GET /api/institutions/{id}
async fn get_institution(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    match state
        .store
        .find_one::<Institution>(
            &state.store.collections.institutions,
            json!({ "_id": path.as_str() }),
        )
        .await
    {
        Ok(Some(institution)) => HttpResponse::Ok().json(ItemResponse::new(institution)),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Institution not found")),
        Err(e) => server_error("Get institution error", e),
    }
}

/// POST /api/institutions — admin only, AISHE code must be unique
async fn create_institution(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<Institution>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    let mut institution = req.into_inner();

    match state
        .store
        .find_one::<Institution>(
            &state.store.collections.institutions,
            json!({ "aisheCode": &institution.aishe_code }),
        )
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ApiMessage::failure(
                "Institution with this AISHE code already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return server_error("Create institution error", e),
    }

    let now = chrono::Utc::now();
    institution.id = uuid::Uuid::new_v4().to_string();
    institution.created_at = Some(now);
    institution.updated_at = Some(now);

    match state
        .store
        .insert_one(&state.store.collections.institutions, &institution)
        .await
    {
        Ok(_) => HttpResponse::Created().json(ItemResponse::with_message(
            institution,
            "Institution created successfully",
        )),
        Err(e) => server_error("Create institution error", e),
    }
}

/// PUT /api/institutions/{id}
async fn update_institution(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
    req: web::Json<Value>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    if !req.is_object() {
        return HttpResponse::BadRequest().json(ApiMessage::failure("Invalid update payload"));
    }

    let id = path.into_inner();
    match state
        .store
        .update_one(&state.store.collections.institutions, &id, req.into_inner())
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ApiMessage::failure("Institution not found"));
        }
        Err(e) => return server_error("Update institution error", e),
    }

    match state
        .store
        .find_one::<Institution>(
            &state.store.collections.institutions,
            json!({ "_id": id }),
        )
        .await
    {
        Ok(Some(institution)) => HttpResponse::Ok().json(ItemResponse::with_message(
            institution,
            "Institution updated successfully",
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Institution not found")),
        Err(e) => server_error("Update institution error", e),
    }
}

/// DELETE /api/institutions/{id} — soft delete, admin only
async fn delete_institution(
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
            &state.store.collections.institutions,
            path.as_str(),
            json!({ "isActive": false }),
        )
        .await
    {
        Ok(true) => HttpResponse::Ok().json(ApiMessage::ok("Institution deleted successfully")),
        Ok(false) => HttpResponse::NotFound().json(ApiMessage::failure("Institution not found")),
        Err(e) => server_error("Delete institution error", e),
    }
}
