//! Student roster endpoints (all protected)

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use sqlx::PgConnection;

use crate::auth::AuthUser;
use crate::db::RequestSession;
use crate::error::{ApiError, ApiResult};
use crate::models::{ListParams, Student, StudentCreateRequest, StudentUpdateRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(list_students))
        .route("/students", post(create_student))
        .route("/students/{id}", get(get_student))
        .route("/students/{id}", put(update_student))
        .route("/students/{id}", delete(delete_student))
}

async fn find_by_student_no(
    conn: &mut PgConnection,
    student_no: &str,
) -> ApiResult<Option<Student>> {
    let student = sqlx::query_as::<_, Student>("SELECT * FROM students WHERE student_no = $1")
        .bind(student_no)
        .fetch_optional(conn)
        .await?;
    Ok(student)
}

async fn list_students(
    Extension(_auth): Extension<AuthUser>,
    Query(params): Query<ListParams>,
    mut session: RequestSession,
) -> ApiResult<Json<Vec<Student>>> {
    let students: Vec<Student> =
        sqlx::query_as("SELECT * FROM students ORDER BY id OFFSET $1 LIMIT $2")
            .bind(params.offset())
            .bind(params.limit())
            .fetch_all(session.conn())
            .await?;

    Ok(Json(students))
}

async fn get_student(
    Extension(_auth): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    mut session: RequestSession,
) -> ApiResult<Json<Student>> {
    let student: Option<Student> = sqlx::query_as("SELECT * FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_optional(session.conn())
        .await?;

    let student = student.ok_or(ApiError::NotFound("student"))?;
    Ok(Json(student))
}

async fn create_student(
    Extension(auth): Extension<AuthUser>,
    mut session: RequestSession,
    Json(req): Json<StudentCreateRequest>,
) -> ApiResult<(StatusCode, Json<Student>)> {
    let mut tx = session.begin().await?;

    if find_by_student_no(&mut *tx, &req.student_no).await?.is_some() {
        return Err(ApiError::Conflict("student number already in use".into()));
    }

    let student: Student = sqlx::query_as(
        r#"
        INSERT INTO students (student_no, name, grade, major, class_name)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&req.student_no)
    .bind(&req.name)
    .bind(&req.grade)
    .bind(&req.major)
    .bind(&req.class_name)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        student_id = %student.id,
        student_no = %student.student_no,
        created_by = %auth.id,
        "Student created"
    );

    Ok((StatusCode::CREATED, Json(student)))
}

async fn update_student(
    Extension(_auth): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    mut session: RequestSession,
    Json(req): Json<StudentUpdateRequest>,
) -> ApiResult<Json<Student>> {
    let mut tx = session.begin().await?;

    let student: Option<Student> = sqlx::query_as("SELECT * FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?;
    let student = student.ok_or(ApiError::NotFound("student"))?;

    let student_no = req.student_no.unwrap_or_else(|| student.student_no.clone());
    if student_no != student.student_no
        && find_by_student_no(&mut *tx, &student_no).await?.is_some()
    {
        return Err(ApiError::Conflict("student number already in use".into()));
    }

    let name = req.name.unwrap_or(student.name);
    // Explicit null clears an optional field; absent keeps it.
    let grade = req.grade.unwrap_or(student.grade);
    let major = req.major.unwrap_or(student.major);
    let class_name = req.class_name.unwrap_or(student.class_name);

    let updated: Student = sqlx::query_as(
        r#"
        UPDATE students
        SET student_no = $1, name = $2, grade = $3, major = $4,
            class_name = $5, updated_at = now()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&student_no)
    .bind(&name)
    .bind(&grade)
    .bind(&major)
    .bind(&class_name)
    .bind(student_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(student_id = %updated.id, student_no = %updated.student_no, "Student updated");
    Ok(Json(updated))
}

async fn delete_student(
    Extension(_auth): Extension<AuthUser>,
    Path(student_id): Path<i64>,
    mut session: RequestSession,
) -> ApiResult<StatusCode> {
    let mut tx = session.begin().await?;

    let deleted = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(student_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(ApiError::NotFound("student"));
    }

    tx.commit().await?;

    tracing::info!(student_id = %student_id, "Student deleted");
    Ok(StatusCode::NO_CONTENT)
}
