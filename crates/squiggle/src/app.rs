use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::Config,
    handlers::{
        health::health,
        plays::{create_play, delete_play, get_play, list_plays},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
///
/// Fails only when the configured frontend origin is not a valid header value.
pub fn create_app(state: AppState, config: &Config) -> anyhow::Result<Router> {
    let origin = HeaderValue::from_str(&config.frontend_origin).map_err(|e| {
        anyhow::anyhow!("Invalid FRONTEND_ORIGIN {:?}: {}", config.frontend_origin, e)
    })?;

    // Pre-flight requests are answered here without reaching a handler.
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    let api_routes = Router::new()
        .route("/plays", get(list_plays).post(create_play))
        .route("/plays/{id}", get(get_play).delete(delete_play))
        .route("/health", get(health))
        .layer(cors);

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashSet, sync::Arc};

    use async_trait::async_trait;
    use axum::{body::Body, http::Request, response::Response};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use squiggle_core::{
        play::Play,
        storage::{PlayRepository, RepositoryError, Result as RepoResult},
    };
    use tower::ServiceExt;

    /// Repository whose every call fails as if DynamoDB were unreachable.
    struct UnreachableRepository;

    #[async_trait]
    impl PlayRepository for UnreachableRepository {
        async fn create_play(&self, _play: &Play) -> RepoResult<()> {
            Err(RepositoryError::ConnectionFailed("dispatch failure".to_string()))
        }

        async fn list_plays(&self) -> RepoResult<Vec<Play>> {
            Err(RepositoryError::ConnectionFailed("dispatch failure".to_string()))
        }

        async fn get_play(&self, _id: &str) -> RepoResult<Option<Play>> {
            Err(RepositoryError::ConnectionFailed("dispatch failure".to_string()))
        }

        async fn delete_play(&self, _id: &str) -> RepoResult<()> {
            Err(RepositoryError::ConnectionFailed("dispatch failure".to_string()))
        }
    }

    fn test_app() -> Router {
        create_app(AppState::default(), &Config::default()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn create(app: &Router, body: Value) -> Value {
        let response = app
            .clone()
            .oneshot(post_json("/api/plays", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app().oneshot(get("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn test_list_plays_empty() {
        let response = test_app().oneshot(get("/api/plays")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_pick_and_roll() {
        let app = test_app();
        let player_states = json!([
            {"playerId": "p1", "position": {"x": 1.0, "y": 2.0}, "timestamp": 1000}
        ]);

        let play = create(
            &app,
            json!({"name": "Pick and Roll", "playerStates": player_states}),
        )
        .await;

        let id = play["id"].as_str().unwrap();
        assert!(!id.is_empty());
        let created_at = play["createdAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
        assert_eq!(play["name"], "Pick and Roll");
        assert_eq!(play["playerStates"], player_states);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let app = test_app();
        let created = create(
            &app,
            json!({
                "name": "Horns",
                "playerStates": [
                    {"playerId": "p1", "position": {"x": 1.0, "y": 2.0}, "timestamp": 1000},
                    {"playerId": "p2", "position": {"x": 3.5, "y": -4.25}, "timestamp": 1016,
                     "ballState": {"position": {"x": 3.0, "y": -4.0}}}
                ]
            }),
        )
        .await;

        let id = created["id"].as_str().unwrap();
        let response = app
            .oneshot(get(&format!("/api/plays/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_attachment_round_trip() {
        let app = test_app();
        let player_states = json!([{
            "playerId": "p1",
            "position": {"x": 1.0, "y": 2.0},
            "timestamp": 1000,
            "ballState": {
                "position": {"x": 1.5, "y": 2.5},
                "attachedTo": {"type": "player", "id": 2}
            }
        }]);

        let created = create(
            &app,
            json!({"name": "Post Entry", "playerStates": player_states}),
        )
        .await;
        assert_eq!(created["playerStates"], player_states);

        let id = created["id"].as_str().unwrap();
        let fetched = body_json(
            app.oneshot(get(&format!("/api/plays/{id}")))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(
            fetched["playerStates"][0]["ballState"]["attachedTo"],
            json!({"type": "player", "id": 2})
        );
    }

    #[tokio::test]
    async fn test_absent_ball_state_stays_absent() {
        let app = test_app();
        let created = create(
            &app,
            json!({
                "name": "Spacing",
                "playerStates": [
                    {"playerId": "p1", "position": {"x": 0.0, "y": 0.0}, "timestamp": 0},
                    {"playerId": "p2", "position": {"x": 0.0, "y": 0.0}, "timestamp": 0,
                     "ballState": {"position": {"x": 0.0, "y": 0.0}}}
                ]
            }),
        )
        .await;

        let states = created["playerStates"].as_array().unwrap();
        assert!(states[0].get("ballState").is_none());
        assert_eq!(
            states[1]["ballState"],
            json!({"position": {"x": 0.0, "y": 0.0}})
        );
    }

    #[tokio::test]
    async fn test_create_accepts_empty_object() {
        let play = create(&test_app(), json!({})).await;

        assert_eq!(play["name"], "");
        assert_eq!(play["playerStates"], json!([]));
    }

    #[tokio::test]
    async fn test_create_ignores_client_supplied_id() {
        let play = create(
            &test_app(),
            json!({"id": "mine", "name": "Zipper", "playerStates": []}),
        )
        .await;

        assert_ne!(play["id"], "mine");
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/plays")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{\"name\": "))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(message.starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_field_types() {
        let response = test_app()
            .oneshot(post_json(
                "/api/plays",
                json!({"name": "Bad", "playerStates": [{"timestamp": "later"}]}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_ignores_content_type() {
        let app = test_app();
        let body = json!({"name": "Pick and Roll", "playerStates": []}).to_string();

        let content_types = [
            None,
            Some("text/plain"),
            Some("application/x-www-form-urlencoded"),
        ];

        for content_type in content_types {
            let mut request = Request::builder().method("POST").uri("/api/plays");
            if let Some(content_type) = content_type {
                request = request.header("Content-Type", content_type);
            }
            let response = app
                .clone()
                .oneshot(request.body(Body::from(body.clone())).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "{content_type:?}");
            assert_eq!(body_json(response).await["name"], "Pick and Roll");
        }
    }

    #[tokio::test]
    async fn test_create_rejects_empty_body() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/plays")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_is_payload_too_large() {
        let name = "x".repeat(3 * 1024 * 1024);
        let response = test_app()
            .oneshot(post_json(
                "/api/plays",
                json!({"name": name, "playerStates": []}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_get_nonexistent_play() {
        let response = test_app()
            .oneshot(get("/api/plays/00000000-0000-0000-0000-000000000000"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_bytes(response).await,
            b"Play not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let app = test_app();
        let created = create(&app, json!({"name": "Floppy", "playerStates": []})).await;
        let uri = format!("/api/plays/{}", created["id"].as_str().unwrap());

        for _ in 0..2 {
            let response = app.clone().oneshot(delete(&uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NO_CONTENT);
            assert!(body_bytes(response).await.is_empty());
        }

        let response = app.oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_never_created_play() {
        let response = test_app()
            .oneshot(delete("/api/plays/never-existed"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_list_returns_every_created_play() {
        let app = test_app();
        let mut created_ids = HashSet::new();
        for name in ["Spain", "Chicago", "Hammer"] {
            let play = create(&app, json!({"name": name, "playerStates": []})).await;
            created_ids.insert(play["id"].as_str().unwrap().to_string());
        }

        let plays = body_json(app.oneshot(get("/api/plays")).await.unwrap()).await;
        let listed_ids: HashSet<String> = plays
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();

        assert_eq!(listed_ids, created_ids);
    }

    #[tokio::test]
    async fn test_preflight_is_answered_by_cors_layer() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/plays")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .header("Access-Control-Request-Headers", "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()["access-control-allow-credentials"],
            "true"
        );
    }

    #[tokio::test]
    async fn test_simple_request_carries_cors_headers() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/plays")
                    .header("Origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "http://localhost:5173"
        );
    }

    #[tokio::test]
    async fn test_update_is_not_routed() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/plays/some-id")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_store_failures_are_internal_errors() {
        let state = AppState::from_repository(Arc::new(UnreachableRepository));
        let app = create_app(state, &Config::default()).unwrap();

        let requests = [
            post_json("/api/plays", json!({"name": "x", "playerStates": []})),
            get("/api/plays"),
            get("/api/plays/abc"),
            delete("/api/plays/abc"),
        ];

        for request in requests {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_before_store_access() {
        let state = AppState::from_repository(Arc::new(UnreachableRepository));
        let app = create_app(state, &Config::default()).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/plays")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let config = Config {
            frontend_origin: "http://bad\norigin".to_string(),
            ..Config::default()
        };

        assert!(create_app(AppState::default(), &config).is_err());
    }
}
