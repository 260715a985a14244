//! Student endpoints, including the progressive deletion surface.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use institute_common::{AppError, AppResult, RelatedRecords};
use institute_core::{CreateStudentInput, UpdateStudentInput};
use institute_db::entities::student::StudentDeleteReason;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{EnrollmentView, MessageResponse, StudentListResponse, StudentView},
};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Optional name search.
    pub q: Option<String>,
}

/// Deletion query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    /// Hard-delete the student and all dependent records.
    pub cascade: Option<bool>,
    /// Archival reason; defaults to OTHER.
    pub delete_reason: Option<String>,
}

fn parse_reason(raw: &str) -> AppResult<StudentDeleteReason> {
    serde_json::from_value(serde_json::Value::String(raw.to_uppercase()))
        .map_err(|_| AppError::BadRequest(format!("unknown delete reason {raw:?}")))
}

/// List active students.
async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<StudentListResponse>> {
    let (students, total_pages) = state
        .student_service
        .list(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            params.q.as_deref(),
        )
        .await?;

    Ok(Json(StudentListResponse {
        students: students.into_iter().map(StudentView::from).collect(),
        total_pages,
    }))
}

/// Register a student.
async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateStudentInput>,
) -> AppResult<Json<StudentView>> {
    let student = state.student_service.create(input).await?;
    Ok(Json(student.into()))
}

/// Fetch one student, archived included.
async fn show(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StudentView>> {
    let student = state.student_service.get(&id).await?;
    Ok(Json(student.into()))
}

/// Update an active student.
async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateStudentInput>,
) -> AppResult<Json<StudentView>> {
    let student = state.student_service.update(&id, input).await?;
    Ok(Json(student.into()))
}

/// Sections the student is enrolled in.
async fn enrollments(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<EnrollmentView>>> {
    let rows = state.class_service.enrollments_for_student(&id).await?;
    Ok(Json(rows.into_iter().map(EnrollmentView::from).collect()))
}

/// Dependent-record counts for a student.
async fn related_records(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RelatedRecords>> {
    let records = state.student_deletion.related_records(&id).await?;
    Ok(Json(records))
}

/// Archive a student, or cascade-delete with `?cascade=true`.
async fn remove(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<MessageResponse>> {
    let ctx = user.context();

    let message = if params.cascade.unwrap_or(false) {
        state.student_deletion.cascade_delete(&ctx, &id).await?
    } else {
        let reason = params
            .delete_reason
            .as_deref()
            .map(parse_reason)
            .transpose()?;
        state.student_deletion.soft_delete(&ctx, &id, reason).await?
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Restore an archived student.
async fn restore(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let message = state.student_deletion.restore(&user.context(), &id).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Permanently delete an archived student.
async fn permanent(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let message = state
        .student_deletion
        .permanent_delete(&user.context(), &id)
        .await?;
    Ok(Json(MessageResponse::new(message)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/enrollments", get(enrollments))
        .route("/{id}/related-records", get(related_records))
        .route("/{id}/restore", post(restore))
        .route("/{id}/permanent", delete(permanent))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reason_case_insensitive() {
        assert_eq!(
            parse_reason("graduated").unwrap(),
            StudentDeleteReason::Graduated
        );
        assert_eq!(
            parse_reason("TRANSFERRED").unwrap(),
            StudentDeleteReason::Transferred
        );
    }

    #[test]
    fn test_parse_reason_unknown_rejected() {
        assert!(matches!(
            parse_reason("expelled"),
            Err(AppError::BadRequest(_))
        ));
    }
}
