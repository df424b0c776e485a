//! API error handling
//!
//! Every error leaves the API as a JSON problem document
//! (`application/problem+json`).

use std::collections::BTreeMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use league_core::LeagueError;
use league_queries::CriteriaError;
use serde::Serialize;
use tracing::error;

pub const PROBLEM_BASE_URN: &str = "urn:league-rs:problem";
const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError(pub LeagueError);

impl ApiError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        ApiError(LeagueError::not_found(entity, id))
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError(LeagueError::BadRequest(msg.into()))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError(LeagueError::Internal(msg.into()))
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<LeagueError> for ApiError {
    fn from(err: LeagueError) -> Self {
        ApiError(err)
    }
}

impl From<CriteriaError> for ApiError {
    fn from(err: CriteriaError) -> Self {
        ApiError(err.into())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Problem {
    #[serde(rename = "type")]
    type_uri: String,
    title: String,
    status: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_key: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<BTreeMap<String, Vec<String>>>,
}

impl Problem {
    fn http(status: StatusCode) -> Self {
        Problem {
            type_uri: format!("{}:problem-with-message", PROBLEM_BASE_URN),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            status: status.as_u16(),
            message: format!("error.http.{}", status.as_u16()),
            detail: None,
            entity_name: None,
            error_key: None,
            field_errors: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let problem = match self.0 {
            LeagueError::BadRequestAlert {
                message,
                entity_name,
                error_key,
            } => Problem {
                title: message,
                message: format!("error.{}", error_key),
                entity_name: Some(entity_name),
                error_key: Some(error_key),
                ..Problem::http(status)
            },
            LeagueError::Validation(errors) => Problem {
                type_uri: format!("{}:constraint-violation", PROBLEM_BASE_URN),
                title: "Method argument not valid".to_string(),
                message: "error.validation".to_string(),
                field_errors: Some(errors.errors),
                ..Problem::http(status)
            },
            LeagueError::NotFound { .. } => Problem::http(status),
            LeagueError::BadRequest(detail) => Problem {
                detail: Some(detail),
                ..Problem::http(status)
            },
            err @ (LeagueError::Database(_) | LeagueError::Internal(_) | LeagueError::Config(_)) => {
                error!(error = %err, "request failed");
                Problem::http(status)
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            Json(problem),
        )
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use league_core::ValidationErrors;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            PROBLEM_CONTENT_TYPE
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_alert_problem() {
        let err = LeagueError::bad_request_alert(
            "A new team cannot already have an ID",
            "team",
            "idexists",
        );
        let (status, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["title"], "A new team cannot already have an ID");
        assert_eq!(body["message"], "error.idexists");
        assert_eq!(body["entityName"], "team");
        assert_eq!(body["errorKey"], "idexists");
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_validation_problem() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "is too long");
        let (status, body) = render(LeagueError::Validation(errors).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "error.validation");
        assert_eq!(body["fieldErrors"]["name"][0], "is too long");
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let (status, body) = render(ApiError(LeagueError::Database(
            "connection refused".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "error.http.500");
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn test_not_found_problem() {
        let (status, body) = render(ApiError::not_found("player", 7)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["title"], "Not Found");
        assert!(body.get("entityName").is_none());
    }
}
