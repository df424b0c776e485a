//! Axum extractors for API handlers

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, Uri},
};
use league_core::{PageRequest, SortOrder, DEFAULT_PAGE_SIZE};
use league_db::{MemoryStore, Store};
use league_models::{Player, Team};
use league_queries::Criteria;
use league_services::{PlayerQueryService, PlayerService, TeamQueryService, TeamService};

use crate::error::ApiError;

const PAGE_PARAM: &str = "page";
const SIZE_PARAM: &str = "size";
const SORT_PARAM: &str = "sort";

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub players: PlayerService,
    pub player_queries: PlayerQueryService,
    pub teams: TeamService,
    pub team_queries: TeamQueryService,
}

impl AppState {
    pub fn new(players: Arc<dyn Store<Player>>, teams: Arc<dyn Store<Team>>) -> Self {
        Self {
            players: PlayerService::new(Arc::clone(&players)),
            player_queries: PlayerQueryService::new(players),
            teams: TeamService::new(Arc::clone(&teams)),
            team_queries: TeamQueryService::new(teams),
        }
    }

    /// State backed by a process-local store
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }
}

fn query_pairs(uri: &Uri) -> Result<Vec<(String, String)>, ApiError> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    Ok(pairs)
}

fn is_paging_param(key: &str) -> bool {
    matches!(key, PAGE_PARAM | SIZE_PARAM | SORT_PARAM)
}

/// Criteria bound from the `<field>.<operator>=value` query parameters
#[derive(Debug, Clone)]
pub struct CriteriaQuery<C>(pub C);

#[async_trait]
impl<S, C> FromRequestParts<S> for CriteriaQuery<C>
where
    S: Send + Sync,
    C: Criteria,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = query_pairs(&parts.uri)?;
        let criteria = C::from_query_pairs(
            pairs
                .iter()
                .filter(|(key, _)| !is_paging_param(key))
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )?;
        Ok(CriteriaQuery(criteria))
    }
}

/// `page`, `size` and `sort` parameters.
///
/// `None` unless `page` or `size` is present; listing is then unpaged.
#[derive(Debug, Clone, Default)]
pub struct Paging(pub Option<PageRequest>);

impl Paging {
    fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let mut page = None;
        let mut size = None;
        let mut sort = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                PAGE_PARAM => page = Some(parse_number(PAGE_PARAM, value)?),
                SIZE_PARAM => size = Some(parse_number(SIZE_PARAM, value)?),
                SORT_PARAM => sort.extend(SortOrder::parse(value)),
                _ => {}
            }
        }

        if page.is_none() && size.is_none() {
            return Ok(Paging(None));
        }

        let mut request = PageRequest::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE));
        request.sort = sort;
        Ok(Paging(Some(request)))
    }
}

fn parse_number(param: &str, value: &str) -> Result<i64, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("{} must be a number, got '{}'", param, value)))
}

#[async_trait]
impl<S> FromRequestParts<S> for Paging
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Paging::from_pairs(&query_pairs(&parts.uri)?)
    }
}
