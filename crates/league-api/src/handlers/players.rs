//! Player API handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use league_core::{Entity, Id};
use league_models::Player;
use league_queries::PlayerCriteria;
use tracing::debug;

use super::paged_response;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CriteriaQuery, Paging};

/// POST /api/players
pub async fn create_player(
    State(state): State<AppState>,
    Json(player): Json<Player>,
) -> ApiResult<impl IntoResponse> {
    debug!(?player, "REST request to save Player");
    let result = state.players.create(player).await?;
    let id = result
        .id
        .ok_or_else(|| ApiError::internal("saved player has no id"))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/players/{}", id))],
        Json(result),
    ))
}

/// PUT /api/players/:id
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(player): Json<Player>,
) -> ApiResult<Json<Player>> {
    debug!(id, ?player, "REST request to update Player");
    Ok(Json(state.players.update(id, player).await?))
}

/// PATCH /api/players/:id
///
/// Accepts `application/json` and `application/merge-patch+json`; null
/// fields are left unchanged.
pub async fn partial_update_player(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Json(player): Json<Player>,
) -> ApiResult<Json<Player>> {
    debug!(id, ?player, "REST request to partial update Player partially");
    state
        .players
        .partial_update(id, player)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(Player::ENTITY_NAME, id))
}

/// GET /api/players
pub async fn list_players(
    State(state): State<AppState>,
    CriteriaQuery(criteria): CriteriaQuery<PlayerCriteria>,
    Paging(page): Paging,
) -> ApiResult<Response> {
    debug!(?criteria, ?page, "REST request to get Players by criteria");
    let response = match page {
        Some(page) => paged_response(
            state
                .player_queries
                .find_page_by_criteria(Some(&criteria), &page)
                .await?,
        ),
        None => Json(state.player_queries.find_by_criteria(Some(&criteria)).await?)
            .into_response(),
    };
    Ok(response)
}

/// GET /api/players/count
pub async fn count_players(
    State(state): State<AppState>,
    CriteriaQuery(criteria): CriteriaQuery<PlayerCriteria>,
) -> ApiResult<Json<i64>> {
    debug!(?criteria, "REST request to count Players by criteria");
    Ok(Json(
        state.player_queries.count_by_criteria(Some(&criteria)).await?,
    ))
}

/// GET /api/players/:id
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<Json<Player>> {
    debug!(id, "REST request to get Player");
    state
        .players
        .find_one(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(Player::ENTITY_NAME, id))
}

/// DELETE /api/players/:id
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<Id>,
) -> ApiResult<StatusCode> {
    debug!(id, "REST request to delete Player");
    state.players.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
