//! Axum router construction for the Observer API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS enabled for a browser front end on another origin.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// See [`handlers`] for the endpoint table. `GET /ws/ticks` upgrades to a
/// `WebSocket` carrying one JSON message per tick.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/ticks", get(ws::ws_ticks))
        // Regions
        .route("/api/regions", get(handlers::list_regions))
        .route("/api/regions/names", get(handlers::region_names))
        .route("/api/regions/{name}/seed", post(handlers::seed_region))
        .route("/api/world", get(handlers::get_world))
        .route("/api/colors", get(handlers::get_colors))
        // Disease
        .route("/api/disease", get(handlers::get_disease))
        .route("/api/disease/growth/start", post(handlers::start_growth))
        .route("/api/disease/growth/stop", post(handlers::stop_growth))
        .route("/api/disease/{trait}/increase", post(handlers::increase_trait))
        // Calendar, news, status
        .route("/api/date", get(handlers::get_date))
        .route("/api/news", get(handlers::get_news).post(handlers::post_news))
        .route("/api/status", get(handlers::get_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
