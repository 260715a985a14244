//! Staff authentication endpoints.

use axum::{Json, Router, extract::State, routing::get, routing::post};
use institute_common::AppResult;
use institute_core::CreateAccountInput;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState};

/// Signup/signin response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
    pub token: String,
}

/// Create a staff account. The first account becomes the admin.
async fn signup(
    State(state): State<AppState>,
    Json(input): Json<CreateAccountInput>,
) -> AppResult<Json<SessionResponse>> {
    let user = state.account_service.signup(input).await?;

    Ok(Json(SessionResponse {
        id: user.id.clone(),
        username: user.username,
        is_admin: user.is_admin,
        token: user.token.unwrap_or_default(),
    }))
}

/// Signin request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

/// Sign in and rotate the account token.
async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> AppResult<Json<SessionResponse>> {
    let user = state
        .account_service
        .signin(&req.username, &req.password)
        .await?;

    Ok(Json(SessionResponse {
        id: user.id.clone(),
        username: user.username,
        is_admin: user.is_admin,
        token: user.token.unwrap_or_default(),
    }))
}

/// Current account response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub is_admin: bool,
}

/// The calling account.
async fn me(AuthUser(user): AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        is_admin: user.is_admin,
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/me", get(me))
}
