use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use orrery::db::{Storage, seed};
use orrery::router::{OrreryState, orrery_router};
use orrery::service::{Mailer, TokenKeys};

async fn test_app(label: &str) -> (Router, Storage, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "orrery-{label}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let storage = Storage::connect(&format!("sqlite:{}", temp_path.display()))
        .await
        .expect("failed to open test database");
    storage.init_schema().await.expect("failed to init schema");

    let state = OrreryState::new(
        storage.clone(),
        TokenKeys::new("test-secret", 1),
        Mailer::log_only(),
        30,
    );
    (orrery_router(state), storage, temp_path)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn authed_json_request(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

async fn register_and_login(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            &json!({
                "first_name": "Test",
                "last_name": "Pilot",
                "email": "pilot@yopmail.com",
                "password": "orbital"
            }),
        ))
        .await
        .expect("register request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            &json!({ "email": "pilot@yopmail.com", "password": "orbital" }),
        ))
        .await
        .expect("login request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    body["token"]
        .as_str()
        .expect("login response carried no token")
        .to_string()
}

#[tokio::test]
async fn seeded_catalog_lists_three_planets_in_stable_order() {
    let (app, storage, temp_path) = test_app("seed-list").await;
    seed::run(&storage).await.expect("seed failed");

    let resp = app
        .oneshot(get_request("/planets"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let planets = body.as_array().expect("expected a JSON array");
    assert_eq!(planets.len(), 3);

    let names: Vec<&str> = planets
        .iter()
        .map(|p| p["planet_name"].as_str().expect("planet_name missing"))
        .collect();
    assert_eq!(names, ["Mercury", "Venus", "Earth"]);

    let earth = &planets[2];
    assert_eq!(earth["planet_type"], "Class A");
    assert_eq!(earth["home_star"], "Sol");
    assert_eq!(earth["mass"].as_f64(), Some(4.258e23));
    assert_eq!(earth["radius"].as_f64(), Some(3516.0));
    assert_eq!(earth["distance"].as_f64(), Some(45.98e6));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn get_planet_returns_exact_field_set() {
    let (app, storage, temp_path) = test_app("get-fields").await;
    seed::run(&storage).await.expect("seed failed");

    let resp = app
        .oneshot(get_request("/planet/1"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_json(resp).await;
    let obj = body.as_object().expect("expected a JSON object");
    let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "distance",
            "home_star",
            "mass",
            "planet_id",
            "planet_name",
            "planet_type",
            "radius"
        ]
    );
    assert_eq!(body["planet_id"], 1);
    assert_eq!(body["planet_name"], "Mercury");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn get_unknown_planet_is_404() {
    let (app, _storage, temp_path) = test_app("get-404").await;

    let resp = app
        .oneshot(get_request("/planet/42"))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn create_planet_requires_a_token_and_rejects_persistence_without_one() {
    let (app, _storage, temp_path) = test_app("create-unauth").await;

    let payload = json!({
        "planet_name": "Pluto",
        "planet_type": "Class C",
        "home_star": "Sol",
        "mass": 1.303e22,
        "radius": 1188.0,
        "distance": 5.906e9
    });

    let resp = app
        .clone()
        .oneshot(json_request("POST", "/planets", &payload))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // a garbage bearer token is rejected the same way
    let resp = app
        .clone()
        .oneshot(authed_json_request("POST", "/planets", "garbage", &payload))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // and nothing was persisted either time
    let resp = app
        .oneshot(get_request("/planets"))
        .await
        .expect("request failed");
    let body = body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn create_planet_with_token_persists() {
    let (app, _storage, temp_path) = test_app("create-ok").await;
    let token = register_and_login(&app).await;

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/planets",
            &token,
            &json!({
                "planet_name": "Mars",
                "planet_type": "Class K",
                "home_star": "Sol",
                "mass": 6.417e23,
                "radius": 3389.5,
                "distance": 227.9e6
            }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .oneshot(get_request("/planets"))
        .await
        .expect("request failed");
    let body = body_json(resp).await;
    let planets = body.as_array().expect("expected a JSON array");
    assert_eq!(planets.len(), 1);
    assert_eq!(planets[0]["planet_name"], "Mars");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn duplicate_planet_name_is_conflict_regardless_of_other_fields() {
    let (app, storage, temp_path) = test_app("create-conflict").await;
    seed::run(&storage).await.expect("seed failed");
    let token = register_and_login(&app).await;

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/planets",
            &token,
            &json!({
                "planet_name": "Earth",
                "planet_type": "Class Z",
                "home_star": "Proxima",
                "mass": 1.0,
                "radius": 1.0,
                "distance": 1.0
            }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "CONFLICT");

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn partial_update_changes_only_supplied_fields() {
    let (app, storage, temp_path) = test_app("update-partial").await;
    seed::run(&storage).await.expect("seed failed");
    let token = register_and_login(&app).await;

    // Earth is planet_id 3 in the fixture set
    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/planet/3",
            &token,
            &json!({ "mass": 5.0e24 }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app
        .oneshot(get_request("/planet/3"))
        .await
        .expect("request failed");
    let body = body_json(resp).await;
    assert_eq!(body["mass"].as_f64(), Some(5.0e24));
    assert_eq!(body["planet_name"], "Earth");
    assert_eq!(body["planet_type"], "Class A");
    assert_eq!(body["home_star"], "Sol");
    assert_eq!(body["radius"].as_f64(), Some(3516.0));
    assert_eq!(body["distance"].as_f64(), Some(45.98e6));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn update_can_zero_a_numeric_field() {
    let (app, storage, temp_path) = test_app("update-zero").await;
    seed::run(&storage).await.expect("seed failed");
    let token = register_and_login(&app).await;

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/planet/2",
            &token,
            &json!({ "distance": 0.0 }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let resp = app
        .oneshot(get_request("/planet/2"))
        .await
        .expect("request failed");
    let body = body_json(resp).await;
    assert_eq!(body["distance"].as_f64(), Some(0.0));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn update_missing_planet_is_404_and_rename_collision_is_409() {
    let (app, storage, temp_path) = test_app("update-errors").await;
    seed::run(&storage).await.expect("seed failed");
    let token = register_and_login(&app).await;

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/planet/99",
            &token,
            &json!({ "mass": 1.0 }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // renaming Venus to Earth collides with another planet
    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/planet/2",
            &token,
            &json!({ "planet_name": "Earth" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // renaming a planet to its own name is not a collision
    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "PUT",
            "/planet/2",
            &token,
            &json!({ "planet_name": "Venus" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::ACCEPTED);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn non_numeric_mass_is_a_validation_error() {
    let (app, _storage, temp_path) = test_app("create-badmass").await;
    let token = register_and_login(&app).await;

    let resp = app
        .clone()
        .oneshot(authed_json_request(
            "POST",
            "/planets",
            &token,
            &json!({
                "planet_name": "Ceres",
                "planet_type": "Class C",
                "home_star": "Sol",
                "mass": "very heavy",
                "radius": 473.0,
                "distance": 414.0e6
            }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "VALIDATION");

    let resp = app
        .oneshot(get_request("/planets"))
        .await
        .expect("request failed");
    let body = body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let _ = fs::remove_file(&temp_path);
}
