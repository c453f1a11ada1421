//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use traveler_core::clock::Clock;
use traveler_core::rng::DeterministicRng;
use traveler_portal::config::TravelerConfig;
use traveler_test_support::{ManualClock, SequenceRng};

use traveler_api::build_router;
use traveler_api::scene::{InMemoryScene, SceneDocument};
use traveler_api::state::AppState;

/// A two-page scene: a three-node ascending hall on `keep`, a gate pair
/// spanning `keep` and `vault`, and a gate into the archived `crypt`.
pub const KEEP_SCENE: &str = r#"
contexts:
  - { id: keep, name: The Keep }
  - { id: vault, name: Old Vault }
  - { id: crypt, name: Sealed Crypt, archived: true }
markers:
  - { id: h1, name: "Traveler:Hall:1", position: { x: 100, y: 100 }, size: { width: 70, height: 70 }, context_id: keep }
  - { id: h2, name: "Traveler:Hall:2", position: { x: 300, y: 100 }, size: { width: 70, height: 70 }, context_id: keep }
  - { id: h3, name: "Traveler:Hall:3", position: { x: 500, y: 100 }, size: { width: 70, height: 70 }, context_id: keep }
  - { id: g1, name: "Traveler:Gate:1", position: { x: 100, y: 600 }, size: { width: 70, height: 70 }, context_id: keep }
  - { id: g2, name: "Traveler:Gate:2", position: { x: 800, y: 800 }, size: { width: 70, height: 70 }, context_id: vault }
  - { id: s1, name: "Traveler:Seal:1", position: { x: 900, y: 100 }, size: { width: 70, height: 70 }, context_id: keep }
  - { id: s2, name: "Traveler:Seal:2", position: { x: 50, y: 50 }, size: { width: 70, height: 70 }, context_id: crypt }
entities:
  - id: bram
    name: Bram
    position: { x: 0, y: 0 }
    size: { width: 70, height: 70 }
    context_id: keep
    image: images/bram.png
    represents: char-bram
    controlled_by: [alice]
templates:
  char-bram: [alice, bob]
"#;

/// Test application with handles on its clock and state.
pub struct TestApp {
    /// The full router, as `main.rs` builds it.
    pub router: Router,
    /// Shared state behind the router.
    pub state: AppState,
    /// Clock the engine reads.
    pub clock: Arc<ManualClock>,
}

/// Build the full app over `KEEP_SCENE` with a manual clock and an empty
/// RNG sequence.
pub fn build_test_app() -> TestApp {
    build_test_app_with_rng(SequenceRng::new(vec![]))
}

/// Build the full app with a custom `SequenceRng` for tests that need
/// deterministic random-mode destinations.
pub fn build_test_app_with_rng(rng: SequenceRng) -> TestApp {
    let clock = Arc::new(ManualClock::new(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ));
    let shared_clock: Arc<dyn Clock + Send + Sync> = clock.clone();
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(rng));
    let scene = InMemoryScene::new(SceneDocument::from_yaml(KEEP_SCENE).unwrap());
    let state = AppState::new(
        TravelerConfig::default(),
        shared_clock,
        rng,
        Arc::new(scene),
    );

    TestApp {
        router: build_router(state.clone()),
        state,
        clock,
    }
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Move a token through the API and return the trigger outcome.
pub async fn move_token(
    app: &TestApp,
    entity_id: &str,
    x: f64,
    y: f64,
) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        &format!("/api/v1/tokens/{entity_id}/position"),
        &serde_json::json!({ "x": x, "y": y }),
    )
    .await
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}
