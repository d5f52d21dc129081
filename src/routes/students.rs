use crate::models::{
    ApiMessage, BulkDeleteRequest, BulkReport, BulkResponse, ItemResponse, ListQuery,
    ListResponse, Role, Student, StudentStats,
};
use crate::routes::{server_error, AppState};
use crate::services::auth::AuthUser;
use actix_web::error::ResponseError;
use actix_web::{web, HttpResponse, Responder};
use chrono::Datelike;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Configure student routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/students")
            .route("", web::get().to(list_students))
            .route("/stats", web::get().to(student_stats))
            .route("", web::post().to(create_student))
            .route("/bulk-add", web::post().to(bulk_add))
            .route("/bulk-delete", web::post().to(bulk_delete))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}", web::delete().to(delete_student)),
    );
}

/// APAAR ids are sequential per enrollment year
async fn next_apaar_id(state: &AppState) -> Result<String, crate::services::StoreError> {
    let count = state
        .store
        .count(&state.store.collections.students, json!({}))
        .await?;
    let year = chrono::Utc::now().year();
    Ok(format!("APAAR-{}-{:06}", year, count + 1))
}

/// GET /api/students?search=&course=&limit=
///
/// Institution accounts only see their own students.
async fn list_students(
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
            { "apaarId": { "$regex": search, "$options": "i" } },
            { "email": { "$regex": search, "$options": "i" } },
        ]);
    }
    if let Some(course) = &query.course {
        filter["course"] = json!(course);
    }
    if auth.user.role == Role::Institution {
        filter["institution"] = json!(auth.user.id);
    }

    match state
        .store
        .find::<Student>(
            &state.store.collections.students,
            filter,
            Some(json!({ "createdAt": -1 })),
            query.limit,
        )
        .await
    {
        Ok(students) => HttpResponse::Ok().json(ListResponse::new(students)),
        Err(e) => server_error("Get students error", e),
    }
}

/// GET /api/students/stats
async fn student_stats(state: web::Data<AppState>, auth: AuthUser) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    let students = &state.store.collections.students;

    let total = match state.store.count(students, json!({ "isActive": true })).await {
        Ok(count) => count,
        Err(e) => return server_error("Get student stats error", e),
    };

    let avg_docs = match state
        .store
        .aggregate(
            students,
            json!([
                { "$match": { "isActive": true } },
                { "$group": { "_id": null, "avg": { "$avg": "$cgpa" } } }
            ]),
        )
        .await
    {
        Ok(docs) => docs,
        Err(e) => return server_error("Get student stats error", e),
    };
    let avg_cgpa = avg_docs
        .first()
        .and_then(|d| d.get("avg"))
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);

    let course_docs = match state
        .store
        .aggregate(
            students,
            json!([
                { "$match": { "isActive": true } },
                { "$group": { "_id": "$course", "count": { "$sum": 1 } } }
            ]),
        )
        .await
    {
        Ok(docs) => docs,
        Err(e) => return server_error("Get student stats error", e),
    };

    let mut by_course = HashMap::new();
    for doc in course_docs {
        if let (Some(course), Some(count)) = (
            doc.get("_id").and_then(|v| v.as_str()),
            doc.get("count").and_then(|v| v.as_i64()),
        ) {
            by_course.insert(course.to_string(), count);
        }
    }

    HttpResponse::Ok().json(ItemResponse::new(StudentStats {
        total,
        active: total,
        avg_cgpa: format!("{:.2}", avg_cgpa),
        by_course,
    }))
}

/// GET /api/students/{id}
async fn get_student(
    state: web::Data<AppState>,
    auth: AuthUser,
    path: web::Path<String>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution, Role::Student]) {
        return e.error_response();
    }

    match state
        .store
        .find_one::<Student>(
            &state.store.collections.students,
            json!({ "_id": path.as_str() }),
        )
        .await
    {
        Ok(Some(student)) => HttpResponse::Ok().json(ItemResponse::new(student)),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Student not found")),
        Err(e) => server_error("Get student error", e),
    }
}

/// POST /api/students
async fn create_student(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<Student>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    let mut student = req.into_inner();

    match state
        .store
        .find_one::<Student>(
            &state.store.collections.students,
            json!({ "email": student.email.to_lowercase() }),
        )
        .await
    {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ApiMessage::failure(
                "Student with this email or APAAR ID already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return server_error("Create student error", e),
    }

    let now = chrono::Utc::now();
    student.id = uuid::Uuid::new_v4().to_string();
    student.email = student.email.to_lowercase();
    student.created_at = Some(now);
    student.updated_at = Some(now);
    if auth.user.role == Role::Institution {
        student.institution = Some(auth.user.id.clone());
    }
    if student.apaar_id.is_none() {
        student.apaar_id = match next_apaar_id(&state).await {
            Ok(id) => Some(id),
            Err(e) => return server_error("Create student error", e),
        };
    }

    match state
        .store
        .insert_one(&state.store.collections.students, &student)
        .await
    {
        Ok(_) => HttpResponse::Created().json(ItemResponse::with_message(
            student,
            "Student created successfully",
        )),
        Err(e) => server_error("Create student error", e),
    }
}

/// PUT /api/students/{id}
async fn update_student(
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
        .update_one(&state.store.collections.students, &id, req.into_inner())
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ApiMessage::failure("Student not found"));
        }
        Err(e) => return server_error("Update student error", e),
    }

    match state
        .store
        .find_one::<Student>(&state.store.collections.students, json!({ "_id": id }))
        .await
    {
        Ok(Some(student)) => HttpResponse::Ok().json(ItemResponse::with_message(
            student,
            "Student updated successfully",
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiMessage::failure("Student not found")),
        Err(e) => server_error("Update student error", e),
    }
}

/// DELETE /api/students/{id} — soft delete
async fn delete_student(
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
            &state.store.collections.students,
            path.as_str(),
            json!({ "isActive": false }),
        )
        .await
    {
        Ok(true) => HttpResponse::Ok().json(ApiMessage::ok("Student deleted successfully")),
        Ok(false) => HttpResponse::NotFound().json(ApiMessage::failure("Student not found")),
        Err(e) => server_error("Delete student error", e),
    }
}

fn row_str(row: &Value, key: &str) -> Option<String> {
    row.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Numbers in bulk uploads arrive either as JSON numbers or as the
/// strings a CSV export produces
fn row_f64(row: &Value, key: &str) -> Option<f64> {
    match row.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

fn row_u8(row: &Value, key: &str) -> Option<u8> {
    row_f64(row, key).map(|n| n as u8)
}

fn row_list(row: &Value, key: &str) -> Vec<String> {
    row_str(row, key)
        .map(|s| {
            s.split(';')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// POST /api/students/bulk-add — array of student records,
/// per-row success/failure report
async fn bulk_add(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<Vec<Value>>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin, Role::Institution]) {
        return e.error_response();
    }

    let rows = req.into_inner();
    if rows.is_empty() {
        return HttpResponse::BadRequest().json(ApiMessage::failure(
            "Invalid data format. Expected an array of student records.",
        ));
    }

    let mut report = BulkReport {
        total: rows.len(),
        ..Default::default()
    };

    for (index, row) in rows.iter().enumerate() {
        let row_no = index + 1;

        let (name, email, course) = match (
            row_str(row, "name"),
            row_str(row, "email"),
            row_str(row, "course"),
        ) {
            (Some(name), Some(email), Some(course)) => (name, email.to_lowercase(), course),
            _ => {
                report.failed.push(json!({
                    "row": row_no,
                    "error": "Missing required fields (name, email, or course)"
                }));
                continue;
            }
        };

        match state
            .store
            .find_one::<Student>(
                &state.store.collections.students,
                json!({ "email": email }),
            )
            .await
        {
            Ok(Some(_)) => {
                report.failed.push(json!({
                    "row": row_no,
                    "error": format!("Student with email {} already exists", email)
                }));
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                report.failed.push(json!({ "row": row_no, "error": e.to_string() }));
                continue;
            }
        }

        let apaar_id = match next_apaar_id(&state).await {
            Ok(id) => id,
            Err(e) => {
                report.failed.push(json!({ "row": row_no, "error": e.to_string() }));
                continue;
            }
        };

        let now = chrono::Utc::now();
        let student = Student {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            phone: row_str(row, "phone"),
            apaar_id: Some(apaar_id),
            course,
            semester: row_u8(row, "semester"),
            batch: row_str(row, "batch"),
            enrollment_number: row_str(row, "enrollmentNumber"),
            cgpa: row_f64(row, "cgpa").unwrap_or(0.0),
            attendance: row_f64(row, "attendance").unwrap_or(0.0),
            assignments: row_f64(row, "assignments").unwrap_or(0.0),
            achievements: row_list(row, "achievements"),
            schemes: row_list(row, "schemes"),
            institution: (auth.user.role == Role::Institution).then(|| auth.user.id.clone()),
            is_active: true,
            created_at: Some(now),
            updated_at: Some(now),
        };

        match state
            .store
            .insert_one(&state.store.collections.students, &student)
            .await
        {
            Ok(_) => report.successful.push(json!({
                "row": row_no,
                "studentId": student.id,
                "name": student.name,
                "email": student.email,
                "apaarId": student.apaar_id,
            })),
            Err(e) => {
                report.failed.push(json!({ "row": row_no, "error": e.to_string() }));
            }
        }
    }

    let message = format!(
        "Bulk add completed: {} successful, {} failed",
        report.successful.len(),
        report.failed.len()
    );
    let all_failed = report.failed.len() == report.total;
    let body = BulkResponse {
        success: !report.successful.is_empty(),
        message,
        data: report,
    };

    if all_failed {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}

/// POST /api/students/bulk-delete — hard delete by id list (admin)
async fn bulk_delete(
    state: web::Data<AppState>,
    auth: AuthUser,
    req: web::Json<BulkDeleteRequest>,
) -> impl Responder {
    if let Err(e) = auth.authorize(&[Role::Admin]) {
        return e.error_response();
    }

    if req.ids.is_empty() {
        return HttpResponse::BadRequest().json(ApiMessage::failure(
            "Invalid data format. Expected an array of student IDs.",
        ));
    }

    let mut report = BulkReport {
        total: req.ids.len(),
        ..Default::default()
    };

    for id in &req.ids {
        let student = match state
            .store
            .find_one::<Student>(&state.store.collections.students, json!({ "_id": id }))
            .await
        {
            Ok(Some(student)) => student,
            Ok(None) => {
                report
                    .failed
                    .push(json!({ "id": id, "error": "Student not found" }));
                continue;
            }
            Err(e) => {
                report.failed.push(json!({ "id": id, "error": e.to_string() }));
                continue;
            }
        };

        match state
            .store
            .delete_one(&state.store.collections.students, id)
            .await
        {
            Ok(true) => report.successful.push(json!({
                "id": id,
                "name": student.name,
                "email": student.email,
            })),
            // Document vanished between the lookup and the delete
            Ok(false) => {
                report
                    .failed
                    .push(json!({ "id": id, "error": "Student not found" }));
            }
            Err(e) => {
                report.failed.push(json!({ "id": id, "error": e.to_string() }));
            }
        }
    }

    let message = format!(
        "Bulk delete completed: {} deleted, {} failed",
        report.successful.len(),
        report.failed.len()
    );

    HttpResponse::Ok().json(BulkResponse {
        success: !report.successful.is_empty(),
        message,
        data: report,
    })
}
