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
use crate::pagination::Paginated;
use crate::skills::dto::{CreateSkill, FindSkills, SkillDto, UpdateSkill};
use crate::skills::services;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list_skills).post(create_skill))
        .route(
            "/skills/:id",
            get(get_skill).patch(update_skill).delete(delete_skill),
        )
}

#[instrument(skip(state))]
async fn list_skills(
    State(state): State<AppState>,
    Query(query): Query<FindSkills>,
) -> Result<Json<Paginated<SkillDto>>, ApiError> {
    services::list(&state.db, query).await.map(Json)
}

#[instrument(skip(state))]
async fn get_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SkillDto>, ApiError> {
    services::get(&state.db, id).await.map(Json)
}

#[instrument(skip(state, payload))]
async fn create_skill(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(payload): Json<CreateSkill>,
) -> Result<(StatusCode, Json<SkillDto>), ApiError> {
    let skill = services::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

#[instrument(skip(state, payload))]
async fn update_skill(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSkill>,
) -> Result<Json<SkillDto>, ApiError> {
    services::update(&state.db, id, payload).await.map(Json)
}

#[instrument(skip(state))]
async fn delete_skill(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SkillDto>, ApiError> {
    services::remove(&state.db, id).await.map(Json)
}
