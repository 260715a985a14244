//! Teacher endpoints.
//!
//! The deletion surface mirrors the student one with one addition:
//! `DELETE /teachers/{id}?reassignTo=<teacherId>` moves every class
//! section to another teacher and archives this one atomically.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post},
};
use institute_common::{AppError, AppResult, RelatedRecords};
use institute_core::{CreateTeacherInput, ReassignTeacherInput, UpdateTeacherInput};
use institute_db::entities::teacher::TeacherDeleteReason;
use serde::Deserialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{MessageResponse, TeacherListResponse, TeacherView},
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
    /// Hard-delete the teacher, unassigning their sections.
    pub cascade: Option<bool>,
    /// Archival reason; defaults to OTHER.
    pub delete_reason: Option<String>,
    /// Move the teacher's sections to this teacher, then archive.
    pub reassign_to: Option<String>,
}

fn parse_reason(raw: &str) -> AppResult<TeacherDeleteReason> {
    serde_json::from_value(serde_json::Value::String(raw.to_uppercase()))
        .map_err(|_| AppError::BadRequest(format!("unknown delete reason {raw:?}")))
}

/// List active teachers.
async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<TeacherListResponse>> {
    let (teachers, total_pages) = state
        .teacher_service
        .list(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
            params.q.as_deref(),
        )
        .await?;

    Ok(Json(TeacherListResponse {
        teachers: teachers.into_iter().map(TeacherView::from).collect(),
        total_pages,
    }))
}

/// Register a teacher.
async fn create(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTeacherInput>,
) -> AppResult<Json<TeacherView>> {
    let teacher = state.teacher_service.create(input).await?;
    Ok(Json(teacher.into()))
}

/// Fetch one teacher, archived included.
async fn show(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TeacherView>> {
    let teacher = state.teacher_service.get(&id).await?;
    Ok(Json(teacher.into()))
}

/// Update an active teacher.
async fn update(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTeacherInput>,
) -> AppResult<Json<TeacherView>> {
    let teacher = state.teacher_service.update(&id, input).await?;
    Ok(Json(teacher.into()))
}

/// Dependent-record counts for a teacher.
async fn related_records(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RelatedRecords>> {
    let records = state.teacher_deletion.related_records(&id).await?;
    Ok(Json(records))
}

/// Archive a teacher; `?cascade=true` hard-deletes, `?reassignTo=` moves
/// their sections first.
async fn remove(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<MessageResponse>> {
    let ctx = user.context();

    let message = match (params.reassign_to, params.cascade.unwrap_or(false)) {
        (Some(_), true) => {
            return Err(AppError::BadRequest(
                "cascade and reassignTo are mutually exclusive".to_string(),
            ));
        }
        (Some(reassign_to), false) => {
            state
                .teacher_service
                .reassign_and_archive(&ctx, &id, ReassignTeacherInput { reassign_to })
                .await?
        }
        (None, true) => state.teacher_deletion.cascade_delete(&ctx, &id).await?,
        (None, false) => {
            let reason = params
                .delete_reason
                .as_deref()
                .map(parse_reason)
                .transpose()?;
            state.teacher_deletion.soft_delete(&ctx, &id, reason).await?
        }
    };

    Ok(Json(MessageResponse::new(message)))
}

/// Restore an archived teacher.
async fn restore(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let message = state.teacher_deletion.restore(&user.context(), &id).await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Permanently delete an archived teacher.
async fn permanent(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let message = state
        .teacher_deletion
        .permanent_delete(&user.context(), &id)
        .await?;
    Ok(Json(MessageResponse::new(message)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(remove))
        .route("/{id}/related-records", get(related_records))
        .route("/{id}/restore", post(restore))
        .route("/{id}/permanent", delete(permanent))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reason() {
        assert_eq!(
            parse_reason("resigned").unwrap(),
            TeacherDeleteReason::Resigned
        );
        assert!(matches!(
            parse_reason("fired"),
            Err(AppError::BadRequest(_))
        ));
    }
}
