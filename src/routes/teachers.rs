use crate::models::{ApiMessage, ItemResponse, ListQuery, ListResponse, Role, Teacher};
use crate::routes::{server_error, AppState};
use crate::services::auth::AuthUser;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use chrono::Datelike;
use serde_json::{json, Value};

/// Configure teacher routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teachers")
            .route("", web::get().to(list_teachers))
            .route("", web::post().to(create_teacher))
            .route("/{id}", web::get().to(get_teacher))
            .route("/{id}", web::put().to(update_teacher))
            .route("/{id}", web::delete().to(delete_teacher)),
    );
}

async fn next_apar_id(state: &AppState) -> Result<String, crate::services::StoreError> {
    let count = state
        .store
        .count(&state.store.collections.teachers, json!({}))
        .await?;
    let year = chrono::Utc::now().year();
    Ok(format!("APAR{}{:03}", year, count + 1))
}

/// GET /api/teachers?search=&department=&limit=
async fn list_teachers(
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
            { "aparId": { "$regex": search, "$options": "i" } },
            { "email": { "$regex": search, "$options": "i" } },
        ]);
    }
    if let Some(department) = &query.department {
        filter["department"] = json!(department);
    }
    if auth.user.role == Role::Institution {
        filter["institutionId"] = json!(auth.user.id);
    }

    match state
        .store
        .find::<Teacher>(
            &state.store.collections.teachers,
            filter,
            Some(json!({ "createdAt": -1 })),
            query.limit,
        )
        .await
    {
        Ok(teachers) => HttpResponse::Ok().json(ListResponse::new(teachers)),
        Err(e) => server_error("Get teachers error", e),
    }
}

/// GET /api/teachers/{id}
async fn get_teacher(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    match state
        .store
        .find_one::<Teacher>(
            &state.store.collections.teachers,
            json!({ "_id": path.as_str() }),
        )
        .await
    {
        Ok(Some(teacher)) => HttpResponse::Ok().json(ItemResponse::new(teacher)),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Teacher not found")),
        Err(e) => server_error("Get teacher error", e),
    }
}

/// POST /api/teachers
async fn create_teacher(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<Teacher>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    let mut teacher = req.into_inner();

    match state
        .store
        .find_one::<Teacher>(
            &state.store.collections.teachers,
            json!({ "email": teacher.email.to_lowercase() }),
        )
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ApiMessage::failure(
                "Teacher with this email or APAR ID already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return server_error("Create teacher error", e),
    }

    let now = chrono::Utc::now();
    teacher.id = uuid::Uuid::new_v4().to_string();
    teacher.email = teacher.email.to_lowercase();
    teacher.created_at = Some(now);
    teacher.updated_at = Some(now);
    if auth.user.role == Role::Institution {
        teacher.institution_id = Some(auth.user.id.clone());
    }
    if teacher.apar_id.is_none() {
        teacher.apar_id = match next_apar_id(&state).await {
            Ok(id) => Some(id),
            Err(e) => return server_error("Create teacher error", e),
        };
    }

    match state
        .store
        .insert_one(&state.store.collections.teachers, &teacher)
        .await
    {
        Ok(_) => HttpResponse::Created().json(ItemResponse::with_message(
            teacher,
            "Teacher created successfully",
        )),
        Err(e) => server_error("Create teacher error", e),
    }
}

/// PUT /api/teachers/{id}
async fn update_teacher(
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
        .update_one(&state.store.collections.teachers, &id, req.into_inner())
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ApiMessage::failure("Teacher not found"));
        }
        Err(e) => return server_error("Update teacher error", e),
    }

    match state
        .store
        .find_one::<Teacher>(&state.store.collections.teachers, json!({ "_id": id }))
        .await
    {
        Ok(Some(teacher)) => HttpResponse::Ok().json(ItemResponse::with_message(
            teacher,
            "Teacher updated successfully",
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Teacher not found")),
        Err(e) => server_error("Update teacher error", e),
    }
}

/// DELETE /api/teachers/{id} — soft delete
async fn delete_teacher(
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
            &state.store.collections.teachers,
            path.as_str(),
            json!({ "isActive": false }),
        )
        .await
    {
        Ok(true) => HttpResponse::Ok().json(ApiMessage::ok("Teacher deleted successfully")),
        Ok(false) => HttpResponse::NotFound().json(ApiMessage::failure("Teacher not found")),
        Err(e) => server_error("Delete teacher error", e),
    }
}
