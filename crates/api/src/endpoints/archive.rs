//! Archive listings: soft-deleted students and teachers.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use institute_common::AppResult;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{StudentListResponse, StudentView, TeacherListResponse, TeacherView},
};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Archive listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ArchiveParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Archived students, most recently archived first.
async fn students(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ArchiveParams>,
) -> AppResult<Json<StudentListResponse>> {
    let (students, total_pages) = state
        .student_service
        .list_archived(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(Json(StudentListResponse {
        students: students.into_iter().map(StudentView::from).collect(),
        total_pages,
    }))
}

/// Archived teachers, most recently archived first.
async fn teachers(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ArchiveParams>,
) -> AppResult<Json<TeacherListResponse>> {
    let (teachers, total_pages) = state
        .teacher_service
        .list_archived(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(Json(TeacherListResponse {
        teachers: teachers.into_iter().map(TeacherView::from).collect(),
        total_pages,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(students))
        .route("/teachers", get(teachers))
}
