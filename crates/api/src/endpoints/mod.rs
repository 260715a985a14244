//! API endpoints.

mod archive;
mod auth;
mod classes;
mod payments;
mod students;
mod teachers;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/students", students::router())
        .nest("/teachers", teachers::router())
        .nest("/classes", classes::router())
        .nest("/payments", payments::router())
        .nest("/archive", archive::router())
}
