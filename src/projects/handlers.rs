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
use crate::projects::dto::{CreateProject, FindProjects, ProjectDto, UpdateProject};
use crate::projects::services;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).patch(update_project).delete(delete_project),
        )
}

#[instrument(skip(state))]
async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<FindProjects>,
) -> Result<Json<Paginated<ProjectDto>>, ApiError> {
    services::list(&state.db, query).await.map(Json)
}

#[instrument(skip(state))]
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectDto>, ApiError> {
    services::get(&state.db, id).await.map(Json)
}

#[instrument(skip(state, payload))]
async fn create_project(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Json(payload): Json<CreateProject>,
) -> Result<(StatusCode, Json<ProjectDto>), ApiError> {
    let project = services::create(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

#[instrument(skip(state, payload))]
async fn update_project(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProject>,
) -> Result<Json<ProjectDto>, ApiError> {
    services::update(&state.db, id, payload).await.map(Json)
}

#[instrument(skip(state))]
async fn delete_project(
    State(state): State<AppState>,
    AdminUser(_): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectDto>, ApiError> {
    services::remove(&state.db, id).await.map(Json)
}
