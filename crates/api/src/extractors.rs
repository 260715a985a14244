//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use institute_common::AppError;
use institute_core::AuthContext;
use institute_db::entities::user;

/// Authenticated staff user extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl AuthUser {
    /// The caller identity handed to the service layer.
    #[must_use]
    pub fn context(&self) -> AuthContext {
        AuthContext {
            user_id: self.0.id.clone(),
            is_admin: self.0.is_admin,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware when the bearer token resolves.
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
