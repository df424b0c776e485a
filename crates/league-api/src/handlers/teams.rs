//! Team API handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use league_core::{Entity, Id};
use league_models::Team;
use league_queries::TeamCriteria;
use tracing::debug;

use super::paged_response;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CriteriaQuery, Paging};

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    Json(team): Json<Team>,
) -> ApiResult<impl IntoResponse> {
    debug!(?team, "REST request to save Team");
    let result = state.teams.create(team).await?;
    let id = result
        .id
        .ok_or_else(|| ApiError::internal("saved team has no id"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/teams/{}", id))],
        Json(result),
    ))
}

/// PUT /api/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(team): Json<Team>,
) -> ApiResult<Json<Team>> {
    debug!(id, ?team, "REST request to update Team");
    Ok(Json(state.teams.update(id, team).await?))
}

/// PATCH /api/teams/:id
///
/// Accepts `application/json` and `application/merge-patch+json`; null
/// fields are left unchanged.
pub async fn partial_update_team(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(team): Json<Team>,
) -> ApiResult<Json<Team>> {
    debug!(id, ?team, "REST request to partial update Team partially");
    state
        .teams
        .partial_update(id, team)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(Team::ENTITY_NAME, id))
}

/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
    CriteriaQuery(criteria): CriteriaQuery<TeamCriteria>,
    Paging(page): Paging,
) -> ApiResult<Response> {
    debug!(?criteria, ?page, "REST request to get Teams by criteria");
    let response = match page {
        Some(page) => paged_response(
            state
                .team_queries
                .find_page_by_criteria(Some(&criteria), &page)
                .await?,
        ),
        None => Json(state.team_queries.find_by_criteria(Some(&criteria)).await?)
            .into_response(),
    };
    Ok(response)
}

/// GET /api/teams/count
pub async fn count_teams(
    State(state): State<AppState>,
    CriteriaQuery(criteria): CriteriaQuery<TeamCriteria>,
) -> ApiResult<Json<i64>> {
    debug!(?criteria, "REST request to count Teams by criteria");
    Ok(Json(
        state.team_queries.count_by_criteria(Some(&criteria)).await?,
    ))
}

/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Team>> {
    debug!(id, "REST request to get Team");
    state
        .teams
        .find_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(Team::ENTITY_NAME, id))
}

/// DELETE /api/teams/:id
///
/// 400 while players still reference the team.
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    debug!(id, "REST request to delete Team");
    state.teams.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
