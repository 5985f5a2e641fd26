//! REST API endpoint handlers for the Observer server.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/regions` | Per-region stats |
//! | `GET` | `/api/regions/names` | Region names in map order |
//! | `POST` | `/api/regions/{name}/seed` | Seed the infection in a region |
//! | `GET` | `/api/world` | World-wide shares in percent |
//! | `GET` | `/api/colors` | Map color per region |
//! | `GET` | `/api/disease` | Name, trait levels, points, growth flag |
//! | `POST` | `/api/disease/{trait}/increase` | Spend a point on a trait |
//! | `POST` | `/api/disease/growth/start` | Turn point growth on |
//! | `POST` | `/api/disease/growth/stop` | Turn point growth off |
//! | `GET` | `/api/date` | Calendar date (advances one day) |
//! | `GET` | `/api/news` | Scrolled headline ticker |
//! | `POST` | `/api/news` | Add a headline |
//! | `GET` | `/api/status` | Tick count, interval, growth and running flags |

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use contagion_types::{
    DiseaseStatus, DiseaseTrait, RegionColor, RegionStats, SessionStatus, WorldRates,
};
use serde::{Deserialize, Serialize};

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response and request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/regions/{name}/seed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedResponse {
    /// The seeded region.
    pub region: String,
}

/// Body of `POST /api/disease/{trait}/increase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseResponse {
    /// The trait that was targeted.
    #[serde(rename = "trait")]
    pub which: DiseaseTrait,
    /// Whether a point was spent and the level raised.
    pub applied: bool,
    /// Level after the call.
    pub level: u32,
    /// Points left after the call.
    pub points: u32,
}

/// Body of the growth toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthResponse {
    /// Growth flag after the call.
    pub growth_enabled: bool,
}

/// Body of `GET /api/date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateResponse {
    /// Date formatted as `"%d %b %Y"`.
    pub date: String,
}

/// Body of `GET /api/news`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResponse {
    /// The ticker rotated to its current scroll position.
    pub ticker: String,
}

/// Request body of `POST /api/news`.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlineRequest {
    /// Headline text.
    pub headline: String,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a small HTML page with the tick, world rates, and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session();
    let status = session.status().await;
    let world = session.world_rates().await;

    let mut rows = String::new();
    for stats in session.region_stats().await {
        let _ = writeln!(
            rows,
            "        <li>{}: {:.2} M infected, {:.2} M dead</li>",
            stats.name, stats.infected, stats.dead
        );
    }

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Contagion Observer</title>
    <style>
        body {{ background: #0d1117; color: #c9d1d9; font-family: monospace; padding: 2rem; }}
        h1 {{ color: #f85149; }}
        a {{ color: #58a6ff; }}
        ul {{ list-style: none; padding: 0; }}
    </style>
</head>
<body>
    <h1>Contagion Observer</h1>
    <p>Tick {tick} | running: {running} | growth: {growth}</p>
    <p>Infected {infected:.2}% | Dead {dead:.2}% | Recovered {recovered:.2}% | Healthy {healthy:.2}%</p>
    <ul>
{rows}    </ul>
    <h2>API</h2>
    <ul>
        <li><a href="/api/regions">/api/regions</a></li>
        <li><a href="/api/world">/api/world</a></li>
        <li><a href="/api/disease">/api/disease</a></li>
        <li><a href="/api/status">/api/status</a></li>
        <li><code>ws://host:port/ws/ticks</code></li>
    </ul>
</body>
</html>"#,
        tick = status.tick,
        running = status.running,
        growth = status.growth_enabled,
        infected = world.infected,
        dead = world.dead,
        recovered = world.recovered,
        healthy = world.healthy,
    ))
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Stats line for every region, in map order.
pub async fn list_regions(State(state): State<Arc<AppState>>) -> Json<Vec<RegionStats>> {
    Json(state.session().region_stats().await)
}

/// Region names, in the same order as [`list_regions`] and [`get_colors`].
pub async fn region_names(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.session().region_names().await)
}

/// Seed the infection in the named region.
pub async fn seed_region(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<SeedResponse>, ObserverError> {
    state.session().seed_infection(&name).await?;
    Ok(Json(SeedResponse { region: name }))
}

/// World-wide shares in percent of the initial population.
pub async fn get_world(State(state): State<Arc<AppState>>) -> Json<WorldRates> {
    Json(state.session().world_rates().await)
}

/// Map color per region.
pub async fn get_colors(State(state): State<Arc<AppState>>) -> Json<Vec<RegionColor>> {
    Json(state.session().colors().await)
}

// ---------------------------------------------------------------------------
// Disease
// ---------------------------------------------------------------------------

/// Disease name, trait levels, unspent points, and growth flag.
pub async fn get_disease(State(state): State<Arc<AppState>>) -> Json<DiseaseStatus> {
    Json(state.session().disease_status().await)
}

/// Spend one point on a trait.
///
/// Having no points is not an error: the response reports
/// `applied: false` and nothing changes. An unknown trait name is a 404.
pub async fn increase_trait(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<IncreaseResponse>, ObserverError> {
    let which: DiseaseTrait = name.parse()?;
    let (applied, status) = state.session().increase_with_status(which).await;
    Ok(Json(IncreaseResponse {
        which,
        applied,
        level: status.levels.get(which),
        points: status.points,
    }))
}

/// Turn automatic point growth on.
pub async fn start_growth(State(state): State<Arc<AppState>>) -> Json<GrowthResponse> {
    let session = state.session();
    session.start_growth().await;
    Json(GrowthResponse {
        growth_enabled: session.growth_enabled().await,
    })
}

/// Turn automatic point growth off.
pub async fn stop_growth(State(state): State<Arc<AppState>>) -> Json<GrowthResponse> {
    let session = state.session();
    session.stop_growth().await;
    Json(GrowthResponse {
        growth_enabled: session.growth_enabled().await,
    })
}

// ---------------------------------------------------------------------------
// Calendar and news
// ---------------------------------------------------------------------------

/// Current calendar date. Every call moves the calendar one day on.
pub async fn get_date(State(state): State<Arc<AppState>>) -> Json<DateResponse> {
    Json(DateResponse {
        date: state.session().next_date().await,
    })
}

/// Headline ticker at its current scroll position.
pub async fn get_news(State(state): State<Arc<AppState>>) -> Json<NewsResponse> {
    Json(NewsResponse {
        ticker: state.session().news_ticker().await,
    })
}

/// Append a headline. Blank headlines are rejected.
pub async fn post_news(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HeadlineRequest>,
) -> Result<impl IntoResponse, ObserverError> {
    let headline = body.headline.trim();
    if headline.is_empty() {
        return Err(ObserverError::BadRequest(String::from("headline is empty")));
    }
    state.session().push_headline(headline.to_owned()).await;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Tick count, tick interval, growth flag, and running flag.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    Json(state.session().status().await)
}
