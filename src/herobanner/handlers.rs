use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::error::ApiError;
use crate::herobanner::dto::{
    CreateHeroBannerText, FindHeroBannerTexts, HeroBannerTextDto, UpdateHeroBannerText,
};
use crate::herobanner::services;
use crate::pagination::Paginated;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/herobanner", get(list_texts).post(create_text))
        .route(
            "/herobanner/:id",
            get(get_text).patch(update_text).delete(delete_text),
        )
}

#[instrument(skip(state))]
async fn list_texts(
    State(state): State<AppState>,
    Query(query): Query<FindHeroBannerTexts>,
) -> Result<Json<Paginated<HeroBannerTextDto>>, ApiError> {
    services::list(&state.db, query).await.map(Json)
}

#[instrument(skip(state))]
async fn get_text(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HeroBannerTextDto>, ApiError> {
    services::get(&state.db, id).await.map(Json)
}

#[instrument(skip(state, payload))]
async fn create_text(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(payload): Json<CreateHeroBannerText>,
) -> Result<(StatusCode, Json<HeroBannerTextDto>), ApiError> {
    let text = services::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(text)))
}

#[instrument(skip(state, payload))]
async fn update_text(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHeroBannerText>,
) -> Result<Json<HeroBannerTextDto>, ApiError> {
    services::update(&state.db, id, payload).await.map(Json)
}

#[instrument(skip(state))]
async fn delete_text(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<HeroBannerTextDto>, ApiError> {
    services::remove(&state.db, id).await.map(Json)
}
