//! Class section, enrollment and attendance endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use institute_common::AppResult;
use institute_core::{CreateSectionInput, EnrollInput, RecordAttendanceInput};
use institute_db::entities::attendance::AttendanceStatus;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{AttendanceView, EnrollmentView, SectionView},
};

const DEFAULT_PAGE_SIZE: u64 = 20;

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Section listing response.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionListResponse {
    pub sections: Vec<SectionView>,
    pub total_pages: u64,
}

/// List class sections.
async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<SectionListResponse>> {
    let (sections, total_pages) = state
        .class_service
        .list_sections(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;

    Ok(Json(SectionListResponse {
        sections: sections.into_iter().map(SectionView::from).collect(),
        total_pages,
    }))
}

/// Create a class section.
async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSectionInput>,
) -> AppResult<Json<SectionView>> {
    let section = state.class_service.create_section(input).await?;
    Ok(Json(section.into()))
}

/// Fetch one section.
async fn show(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SectionView>> {
    let section = state.class_service.get_section(&id).await?;
    Ok(Json(section.into()))
}

/// Enrollment request body. The section comes from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollBody {
    pub student_id: String,
}

/// Enroll a student in a section.
async fn enroll(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<EnrollBody>,
) -> AppResult<Json<EnrollmentView>> {
    let enrollment = state
        .class_service
        .enroll(EnrollInput {
            student_id: body.student_id,
            section_id: id,
        })
        .await?;
    Ok(Json(enrollment.into()))
}

/// Attendance request body. The section comes from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBody {
    pub student_id: String,
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
}

/// Record one student's attendance on a date.
async fn record_attendance(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AttendanceBody>,
) -> AppResult<Json<AttendanceView>> {
    let record = state
        .class_service
        .record_attendance(
            RecordAttendanceInput {
                student_id: body.student_id,
                section_id: id,
                date: body.date,
                status: body.status,
            },
            &user.0.id,
        )
        .await?;
    Ok(Json(record.into()))
}

/// Attendance sheet query.
#[derive(Debug, Deserialize)]
pub struct SheetParams {
    pub date: chrono::NaiveDate,
}

/// Attendance for a section on one date.
async fn attendance_sheet(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SheetParams>,
) -> AppResult<Json<Vec<AttendanceView>>> {
    let records = state.class_service.attendance_sheet(&id, params.date).await?;
    Ok(Json(records.into_iter().map(AttendanceView::from).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show))
        .route("/{id}/enroll", post(enroll))
        .route("/{id}/attendance", post(record_attendance).get(attendance_sheet))
}
