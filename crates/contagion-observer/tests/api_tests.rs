//! Integration tests for the Observer API endpoints.
//!
//! Tests drive the Axum `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The session behind the router is never started,
//! so no background task mutates state between requests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use contagion_core::config::SimulationConfig;
use contagion_core::session::Session;
use contagion_observer::router::build_router;
use contagion_observer::state::AppState;
use contagion_world::default_world;
use serde_json::Value;
use tower::ServiceExt;

fn make_router(config: &SimulationConfig) -> Router {
    let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
    let session = Session::new(config, default_world().unwrap(), today);
    build_router(Arc::new(AppState::new(Arc::new(session))))
}

fn default_router() -> Router {
    make_router(&SimulationConfig::default())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::post(uri).body(Body::empty()).unwrap()).await
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let router = default_router();

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_list_regions() {
    let router = default_router();

    let (status, json) = get(&router, "/api/regions").await;
    assert_eq!(status, StatusCode::OK);
    let regions = json.as_array().unwrap();
    assert_eq!(regions.len(), 6);
    for region in regions {
        assert_eq!(region["infected"], 0.0);
        assert_eq!(region["healthy"], region["population"]);
    }
}

#[tokio::test]
async fn test_names_and_colors_share_order() {
    let router = default_router();

    let (_, names) = get(&router, "/api/regions/names").await;
    let (_, regions) = get(&router, "/api/regions").await;
    let (_, colors) = get(&router, "/api/colors").await;

    let names = names.as_array().unwrap();
    let regions = regions.as_array().unwrap();
    assert_eq!(names.len(), regions.len());
    assert_eq!(colors.as_array().unwrap().len(), names.len());
    for (name, region) in names.iter().zip(regions) {
        assert_eq!(name, &region["name"]);
    }
    assert!(!names.iter().any(|n| n == "World"));
}

#[tokio::test]
async fn test_seed_known_region() {
    let router = default_router();

    let (status, json) = post(&router, "/api/regions/Asia/seed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["region"], "Asia");

    let (_, regions) = get(&router, "/api/regions").await;
    let asia = regions
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Asia")
        .unwrap();
    assert_eq!(asia["infected"], 0.01);
}

#[tokio::test]
async fn test_seed_unknown_region_is_404() {
    let router = default_router();

    let (status, json) = post(&router, "/api/regions/Atlantis/seed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
    assert!(json["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn test_world_rates_start_healthy() {
    let router = default_router();

    let (status, json) = get(&router, "/api/world").await;
    assert_eq!(status, StatusCode::OK);
    let healthy = json["healthy"].as_f64().unwrap();
    assert!((healthy - 100.0).abs() < 1e-9);
    assert_eq!(json["infected"], 0.0);
}

#[tokio::test]
async fn test_get_disease() {
    let router = default_router();

    let (status, json) = get(&router, "/api/disease").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "COVID-24");
    assert_eq!(json["points"], 0);
    assert_eq!(json["growth_enabled"], false);
    assert_eq!(json["levels"]["heat_resistance"], 1);
}

#[tokio::test]
async fn test_increase_without_points_is_not_applied() {
    let router = default_router();

    let (status, json) = post(&router, "/api/disease/lethality/increase").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], false);
    assert_eq!(json["level"], 1);
    assert_eq!(json["points"], 0);
}

#[tokio::test]
async fn test_increase_spends_a_point() {
    let mut config = SimulationConfig::default();
    config.disease.initial_points = 2;
    let router = make_router(&config);

    let (status, json) = post(&router, "/api/disease/cold_resistance/increase").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["trait"], "cold_resistance");
    assert_eq!(json["applied"], true);
    assert_eq!(json["level"], 2);
    assert_eq!(json["points"], 1);

    let (_, disease) = get(&router, "/api/disease").await;
    assert_eq!(disease["levels"]["cold_resistance"], 2);
    assert_eq!(disease["levels"]["camouflage"], 1);
}

#[tokio::test]
async fn test_increase_unknown_trait_is_404() {
    let router = default_router();

    let (status, json) = post(&router, "/api/disease/stealth/increase").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_growth_toggles() {
    let router = default_router();

    let (status, json) = post(&router, "/api/disease/growth/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["growth_enabled"], true);

    let (_, status_json) = get(&router, "/api/status").await;
    assert_eq!(status_json["growth_enabled"], true);

    let (_, json) = post(&router, "/api/disease/growth/stop").await;
    assert_eq!(json["growth_enabled"], false);
}

#[tokio::test]
async fn test_date_advances_per_read() {
    let mut config = SimulationConfig::default();
    config.news.start_date = NaiveDate::from_ymd_opt(1960, 1, 31);
    let router = make_router(&config);

    let (_, first) = get(&router, "/api/date").await;
    let (_, second) = get(&router, "/api/date").await;
    assert_eq!(first["date"], "31 Jan 1960");
    assert_eq!(second["date"], "01 Feb 1960");
}

#[tokio::test]
async fn test_default_date_is_1960() {
    let router = default_router();

    let (_, json) = get(&router, "/api/date").await;
    assert_eq!(json["date"], "15 Oct 1960");
}

#[tokio::test]
async fn test_post_and_read_news() {
    let router = default_router();

    let request = Request::post("/api/news")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"headline":"Outbreak reported"}"#))
        .unwrap();
    let (status, _) = send(&router, request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, json) = get(&router, "/api/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ticker"], "          Outbreak reported");
}

#[tokio::test]
async fn test_blank_headline_rejected() {
    let router = default_router();

    let request = Request::post("/api/news")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"headline":"   "}"#))
        .unwrap();
    let (status, json) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_status_of_idle_session() {
    let router = default_router();

    let (status, json) = get(&router, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["tick"], 0);
    assert_eq!(json["tick_interval_ms"], 240);
    assert_eq!(json["running"], false);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let router = default_router();

    let response = router
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
