//! API routes

use axum::{routing::get, Router};

use crate::extractors::AppState;
use crate::handlers::{players, teams};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/players", players_router())
        .nest("/teams", teams_router())
}

fn players_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(players::list_players).post(players::create_player),
        )
        .route("/count", get(players::count_players))
        .route(
            "/:id",
            get(players::get_player)
                .put(players::update_player)
                .patch(players::partial_update_player)
                .delete(players::delete_player),
        )
}

fn teams_router() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list_teams).post(teams::create_team))
        .route("/count", get(teams::count_teams))
        .route(
            "/:id",
            get(teams::get_team)
                .put(teams::update_team)
                .patch(teams::partial_update_team)
                .delete(teams::delete_team),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, HeaderMap, Method, Request, StatusCode};
    use league_db::MemoryStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        router().with_state(AppState::in_memory(MemoryStore::new()))
    }

    async fn send_with(
        app: &Router,
        method: Method,
        uri: &str,
        content_type: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, content_type);
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, value)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        send_with(app, method, uri, "application/json", body).await
    }

    async fn get_json(app: &Router, uri: &str) -> Value {
        let (status, _, body) = send(app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "GET {}", uri);
        body
    }

    async fn create(app: &Router, path: &str, body: Value) -> i64 {
        let (status, _, body) = send(app, Method::POST, path, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    fn names(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect()
    }

    /// Teams Five and Nine; John and Amy play for Five, Jon for Nine
    async fn seeded_app() -> (Router, i64, i64) {
        let app = test_app();
        let five = create(&app, "/api/teams", json!({"name": "Five", "city": "Austin"})).await;
        let nine = create(&app, "/api/teams", json!({"name": "Nine", "city": "Boston"})).await;

        for (name, team, baskets) in [("John", five, 12), ("Jon", nine, 20), ("Amy", five, 7)] {
            create(
                &app,
                "/api/players",
                json!({"name": name, "baskets": baskets, "team": {"id": team}}),
            )
            .await;
        }
        (app, five, nine)
    }

    #[tokio::test]
    async fn test_create_player() {
        let app = test_app();
        let (status, headers, body) = send(
            &app,
            Method::POST,
            "/api/players",
            Some(json!({"name": "John", "birthDate": "1990-04-01", "height": 1.98})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        let id = body["id"].as_i64().unwrap();
        assert_eq!(headers[header::LOCATION], format!("/api/players/{}", id));
        assert_eq!(body["birthDate"], "1990-04-01");

        let fetched = get_json(&app, &format!("/api/players/{}", id)).await;
        assert_eq!(fetched["name"], "John");
    }

    #[tokio::test]
    async fn test_create_with_id_is_rejected() {
        let app = test_app();
        let (status, _, body) = send(
            &app,
            Method::POST,
            "/api/teams",
            Some(json!({"id": 1, "name": "Bulls"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "error.idexists");
        assert_eq!(body["entityName"], "team");
    }

    #[tokio::test]
    async fn test_filter_by_name_and_team() {
        let (app, five, _) = seeded_app().await;
        let uri = format!("/api/players?name.contains=Jo&teamId.equals={}", five);

        assert_eq!(names(&get_json(&app, &uri).await), vec!["John"]);

        let uri = format!("/api/players/count?name.contains=Jo&teamId.equals={}", five);
        let count = get_json(&app, &uri).await;
        assert_eq!(count, json!(1));
    }

    #[tokio::test]
    async fn test_no_criteria_lists_everything() {
        let (app, _, _) = seeded_app().await;
        assert_eq!(get_json(&app, "/api/players").await.as_array().unwrap().len(), 3);
        assert_eq!(get_json(&app, "/api/players/count").await, json!(3));
    }

    #[tokio::test]
    async fn test_range_and_in_filters() {
        let (app, _, _) = seeded_app().await;

        let body = get_json(
            &app,
            "/api/players?baskets.greaterThanOrEqual=10&baskets.lessThanOrEqual=20",
        )
        .await;
        assert_eq!(names(&body), vec!["John", "Jon"]);

        let body = get_json(&app, "/api/players?id.in=1,3").await;
        assert_eq!(names(&body), vec!["John", "Amy"]);

        let body = get_json(&app, "/api/players?id.in=1&id.in=2").await;
        assert_eq!(names(&body), vec!["John", "Jon"]);
    }

    #[tokio::test]
    async fn test_team_filter_by_player_distinct() {
        let (app, _, _) = seeded_app().await;

        let repeated = get_json(&app, "/api/teams?playerId.specified=true").await;
        assert_eq!(names(&repeated), vec!["Five", "Five", "Nine"]);

        let distinct = get_json(&app, "/api/teams?playerId.specified=true&distinct=true").await;
        assert_eq!(names(&distinct), vec!["Five", "Nine"]);

        let count = get_json(&app, "/api/teams/count?playerId.specified=true&distinct=true").await;
        assert_eq!(count, json!(2));
    }

    #[tokio::test]
    async fn test_players_without_team() {
        let (app, _, _) = seeded_app().await;
        create(&app, "/api/players", json!({"name": "Free Agent"})).await;

        let body = get_json(&app, "/api/players?teamId.specified=false").await;
        assert_eq!(names(&body), vec!["Free Agent"]);
    }

    #[tokio::test]
    async fn test_paged_listing() {
        let (app, _, _) = seeded_app().await;
        let (status, headers, body) =
            send(&app, Method::GET, "/api/players?page=0&size=2&sort=name,desc", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-total-count"], "3");
        assert_eq!(names(&body), vec!["Jon", "John"]);

        let body = get_json(&app, "/api/players?page=1&size=2&sort=name,desc").await;
        assert_eq!(names(&body), vec!["Amy"]);
    }

    #[tokio::test]
    async fn test_page_beyond_the_end() {
        let (app, _, _) = seeded_app().await;
        let (status, headers, body) = send(
            &app,
            Method::GET,
            "/api/players?page=922337203685477580&size=20",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["x-total-count"], "3");
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_finite_double_is_rejected() {
        let (app, _, _) = seeded_app().await;
        let (status, _, body) =
            send(&app, Method::GET, "/api/players?height.equals=NaN", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_invalid_filter_value() {
        let (app, _, _) = seeded_app().await;
        let (status, _, body) = send(&app, Method::GET, "/api/players?id.equals=abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);
    }

    #[tokio::test]
    async fn test_unknown_parameters_are_ignored() {
        let (app, _, _) = seeded_app().await;
        let body = get_json(&app, "/api/players?nickname.equals=x&name.startsWith=J").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_player() {
        let (app, _, nine) = seeded_app().await;

        let (status, _, body) = send(
            &app,
            Method::PUT,
            "/api/players/1",
            Some(json!({"id": 1, "name": "Johnny", "team": {"id": nine}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Johnny");
        assert_eq!(body["team"]["name"], "Nine");
        assert!(body["baskets"].is_null());

        let (status, _, body) = send(
            &app,
            Method::PUT,
            "/api/players/2",
            Some(json!({"id": 1, "name": "Johnny"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorKey"], "idinvalid");

        let (status, _, body) = send(
            &app,
            Method::PUT,
            "/api/players/99",
            Some(json!({"id": 99, "name": "Ghost"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorKey"], "idnotfound");
    }

    #[tokio::test]
    async fn test_partial_update_with_merge_patch() {
        let (app, _, _) = seeded_app().await;

        let (status, _, body) = send_with(
            &app,
            Method::PATCH,
            "/api/players/1",
            "application/merge-patch+json",
            Some(json!({"id": 1, "assists": 4})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "John");
        assert_eq!(body["baskets"], 12);
        assert_eq!(body["assists"], 4);
    }

    #[tokio::test]
    async fn test_partial_update_without_id() {
        let (app, _, _) = seeded_app().await;
        let (status, _, body) = send(
            &app,
            Method::PATCH,
            "/api/teams/1",
            Some(json!({"city": "Dallas"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorKey"], "idnull");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let app = test_app();
        let (status, _, _) = send(&app, Method::GET, "/api/teams/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete() {
        let (app, _, _) = seeded_app().await;

        let (status, _, _) = send(&app, Method::DELETE, "/api/players/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _, _) = send(&app, Method::GET, "/api/players/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = send(&app, Method::DELETE, "/api/players/2", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_referenced_team() {
        let (app, five, _) = seeded_app().await;
        let (status, _, _) =
            send(&app, Method::DELETE, &format!("/api/teams/{}", five), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
