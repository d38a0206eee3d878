use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::dto::{AuthResponse, LoginRequest};
use crate::auth::services::{authenticate, is_valid_email, JwtKeys};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// POST /auth/login
///
/// Email is matched exactly as stored; no normalization beyond format checks.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if !is_valid_email(&payload.email) {
        return Err(ApiError::InvalidData("Invalid email".into()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::InvalidData("Password is required".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let response = authenticate(&state.db, &keys, &payload.email, &payload.password).await?;
    info!("user logged in");
    Ok(Json(response))
}
