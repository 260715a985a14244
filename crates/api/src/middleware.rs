//! API middleware.

use axum::{
    body::Body, extract::State, http::Request, middleware::Next, response::Response,
};
use institute_core::{
    AccountService, ClassService, DeletionService, PaymentService, StudentDeletionTarget,
    StudentService, TeacherDeletionTarget, TeacherService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub student_service: StudentService,
    pub teacher_service: TeacherService,
    pub class_service: ClassService,
    pub payment_service: PaymentService,
    pub student_deletion: DeletionService<StudentDeletionTarget>,
    pub teacher_deletion: DeletionService<TeacherDeletionTarget>,
}

/// Authentication middleware.
///
/// Resolves a `Bearer` token to its staff account and stashes the user
/// model in request extensions; handlers that require auth pick it up via
/// the `AuthUser` extractor.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.account_service.authenticate(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
