//! Fee and salary payment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use institute_common::AppResult;
use institute_core::{StudentPaymentInput, TeacherPaymentInput};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{StudentPaymentView, TeacherPaymentView},
};

/// Record a student fee payment.
async fn record_student_payment(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<StudentPaymentInput>,
) -> AppResult<Json<StudentPaymentView>> {
    let payment = state
        .payment_service
        .record_student_payment(input, &user.0.id)
        .await?;
    Ok(Json(payment.into()))
}

/// Record a teacher salary payment.
async fn record_teacher_payment(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<TeacherPaymentInput>,
) -> AppResult<Json<TeacherPaymentView>> {
    let payment = state
        .payment_service
        .record_teacher_payment(input, &user.0.id)
        .await?;
    Ok(Json(payment.into()))
}

/// A student's fee payment history.
async fn student_history(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<StudentPaymentView>>> {
    let payments = state.payment_service.student_history(&id).await?;
    Ok(Json(
        payments.into_iter().map(StudentPaymentView::from).collect(),
    ))
}

/// A teacher's salary payment history.
async fn teacher_history(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<TeacherPaymentView>>> {
    let payments = state.payment_service.teacher_history(&id).await?;
    Ok(Json(
        payments.into_iter().map(TeacherPaymentView::from).collect(),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", post(record_student_payment))
        .route("/teachers", post(record_teacher_payment))
        .route("/students/{id}", get(student_history))
        .route("/teachers/{id}", get(teacher_history))
}
