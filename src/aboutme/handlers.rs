use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::aboutme::dto::{AboutMeDto, UpdateAboutMe};
use crate::aboutme::repo;
use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/aboutme", get(get_about_me).put(update_about_me))
}

/// 404 until the first write.
#[instrument(skip(state))]
async fn get_about_me(State(state): State<AppState>) -> Result<Json<AboutMeDto>, ApiError> {
    repo::find(&state.db)
        .await?
        .map(Into::into)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("About me".into()))
}

#[instrument(skip(state, payload))]
async fn update_about_me(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(payload): Json<UpdateAboutMe>,
) -> Result<Json<AboutMeDto>, ApiError> {
    if payload.text.trim().is_empty() {
        return Err(ApiError::InvalidData("Text is required".into()));
    }
    let row = repo::upsert(&state.db, &payload.text).await?;
    Ok(Json(row.into()))
}
