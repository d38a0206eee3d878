use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AdminUser;
use crate::blog::dto::{CreatePost, FindPosts, PostDto, UpdatePost};
use crate::blog::services;
use crate::error::ApiError;
use crate::pagination::Paginated;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(list_posts).post(create_post))
        .route(
            "/blog/:id",
            get(get_post).patch(update_post).delete(delete_post),
        )
}

#[instrument(skip(state))]
async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<FindPosts>,
) -> Result<Json<Paginated<PostDto>>, ApiError> {
    services::list(&state.db, query).await.map(Json)
}

#[instrument(skip(state))]
async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDto>, ApiError> {
    services::get(&state.db, id).await.map(Json)
}

#[instrument(skip(state, payload))]
async fn create_post(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(payload): Json<CreatePost>,
) -> Result<(StatusCode, Json<PostDto>), ApiError> {
    let post = services::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state, payload))]
async fn update_post(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePost>,
) -> Result<Json<PostDto>, ApiError> {
    services::update(&state.db, id, payload).await.map(Json)
}

#[instrument(skip(state))]
async fn delete_post(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDto>, ApiError> {
    services::remove(&state.db, id).await.map(Json)
}
