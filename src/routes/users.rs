use crate::models::{
    ApiMessage, ItemResponse, ListQuery, ListResponse, Role, UpdateUserRequest, User, UserStats,
};
use crate::routes::{server_error, AppState};
use crate::services::auth::AuthUser;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use std::collections::HashMap;

/// Configure account administration routes (admin only)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/stats", web::get().to(user_stats))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}

/// GET /api/users?search=&role=&limit=
async fn list_users(
    state: web::Data<AppState>,
    auth: AuthUser,
    query: web::Query<ListQuery>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    let mut filter = json!({});
    if let Some(search) = &query.search {
        filter["$or"] = json!([
            { "name": { "$regex": search, "$options": "i" } },
            { "email": { "$regex": search, "$options": "i" } },
        ]);
    }
    if let Some(role) = &query.role {
        filter["role"] = json!(role.to_lowercase());
    }

    match state
        .store
        .find::<User>(
            &state.store.collections.users,
            filter,
            Some(json!({ "createdAt": -1 })),
            query.limit,
        )
        .await
    {
        Ok(users) => {
            let users: Vec<User> = users.into_iter().map(User::without_password).collect();
            HttpResponse::Ok().json(ListResponse::new(users))
        }
        Err(e) => server_error("Get users error", e),
    }
}

/// GET /api/users/stats
async fn user_stats(state: web::Data<AppState>, auth: AuthUser) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    let users = &state.store.collections.users;

    let total = match state.store.count(users, json!({})).await {
        Ok(count) => count,
        Err(e) => return server_error("Get user stats error", e),
    };
    let active = match state.store.count(users, json!({ "isActive": true })).await {
        Ok(count) => count,
        Err(e) => return server_error("Get user stats error", e),
    };

    let by_role_docs = match state
        .store
        .aggregate(
            users,
            json!([{ "$group": { "_id": "$role", "count": { "$sum": 1 } } }]),
        )
        .await
    {
        Ok(docs) => docs,
        Err(e) => return server_error("Get user stats error", e),
    };

    let mut by_role = HashMap::new();
    for doc in by_role_docs {
        if let (Some(role), Some(count)) = (
            doc.get("_id").and_then(|v| v.as_str()),
            doc.get("count").and_then(|v| v.as_i64()),
        ) {
            by_role.insert(role.to_string(), count);
        }
    }

    let recent_users = match state
        .store
        .find::<User>(users, json!({}), Some(json!({ "createdAt": -1 })), 5)
        .await
    {
        Ok(users) => users.into_iter().map(User::without_password).collect(),
        Err(e) => return server_error("Get user stats error", e),
    };

    HttpResponse::Ok().json(ItemResponse::new(UserStats {
        total,
        active,
        inactive: total.saturating_sub(active),
        by_role,
        recent_users,
    }))
}

/// GET /api/users/{id}
async fn get_user(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    match state
        .store
        .find_one::<User>(&state.store.collections.users, json!({ "_id": path.as_str() }))
        .await
    {
        Ok(Some(user)) => HttpResponse::Ok().json(ItemResponse::new(user.without_password())),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("User not found")),
        Err(e) => server_error("Get user error", e),
    }
}

/// PUT /api/users/{id} — update name, role or active flag
async fn update_user(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    let mut fields = serde_json::Map::new();
    if let Some(name) = &req.name {
        fields.insert("name".to_string(), json!(name));
    }
    if let Some(role) = &req.role {
        match Role::parse(role) {
            Some(role) => fields.insert("role".to_string(), json!(role)),
            None => return HttpResponse::BadRequest().json(ApiMessage::failure("Invalid role")),
        };
    }
    if let Some(is_active) = req.is_active {
        fields.insert("isActive".to_string(), json!(is_active));
    }

    let id = path.into_inner();
    match state
        .store
        .update_one(&state.store.collections.users, &id, json!(fields))
        .await
    {
        Ok(true) => {}
        Ok(false) => return HttpResponse::NotFound().json(ApiMessage::failure("User not found")),
        Err(e) => return server_error("Update user error", e),
    }

    match state
        .store
        .find_one::<User>(&state.store.collections.users, json!({ "_id": id }))
        .await
    {
        Ok(Some(user)) => HttpResponse::Ok().json(ItemResponse::with_message(
            user.without_password(),
            "User updated successfully",
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("User not found")),
        Err(e) => server_error("Update user error", e),
    }
}

/// DELETE /api/users/{id} — soft delete
async fn delete_user(
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
            &state.store.collections.users,
            path.as_str(),
            json!({ "isActive": false }),
        )
        .await
    {
        Ok(true) => HttpResponse::Ok().json(ApiMessage::ok("User deleted successfully")),
        Ok(false) => HttpResponse::NotFound().json(ApiMessage::failure("User not found")),
        Err(e) => server_error("Delete user error", e),
    }
}
