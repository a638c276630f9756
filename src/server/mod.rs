//! Async HTTP Server Module
//!
//! Serves the fuzzy scenarios as a JSON API using axum.
//!
//! # Endpoints
//!
//! - `POST /api/fuzzy-logic/comfort` - `{temperature, humidity}`
//! - `POST /api/fuzzy-logic/air-quality` - `{co2, pm25}`
//! - `POST /api/fuzzy-logic/light-comfort` - `{intensity, colour_temp}`
//! - `POST /api/fuzzy-logic/plant-care` - `{soil_moisture, light_level, temperature, plant_type?}`
//! - `GET /api/fuzzy-logic/profiles` - variables, terms and rules of every profile
//! - `GET /health` - version and profile build states
//!
//! With `server.legacy_routes` the `/api/fuzzy-logic/*` routes are also served
//! under `/fuzzy-logic/*`.
//!
//! # Example
//!
//! ```rust,ignore
//! use fuzzylab::config::AppConfig;
//! use fuzzylab::server::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::load().unwrap();
//!     run_server(config).await.unwrap();
//! }
//! ```

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::analysis::{self, EdgePolicy};
use crate::config::{AppConfig, CorsConfig};
use crate::domains::{self, Domain, ProfileStatus};
use crate::engine::ProfileSummary;
use crate::error::{ErrorResponse, FuzzyError, FuzzyResult};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the server
pub struct AppState {
    pub config: AppConfig,
    pub edges: EdgePolicy,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let edges = EdgePolicy::from(&config.engine);
        Self { config, edges }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;

// ============================================================================
// Error responses
// ============================================================================

impl IntoResponse for FuzzyError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.is_server_error() {
            error!(code = self.code.code(), error = %self, "request failed");
        } else {
            debug!(code = self.code.code(), error = %self.message, "request rejected");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Parse the body and run one scenario
fn run_analysis(state: &AppState, domain: Domain, body: &[u8]) -> Result<Json<Value>, FuzzyError> {
    // An empty or non-JSON body becomes NO_DATA
    let payload: Value = serde_json::from_slice(body)?;
    let report = analysis::analyse(domain, &payload, &state.edges)?;
    Ok(Json(report))
}

async fn comfort(State(state): State<SharedState>, body: Bytes) -> Result<Json<Value>, FuzzyError> {
    run_analysis(&state, Domain::Comfort, &body)
}

async fn air_quality(State(state): State<SharedState>, body: Bytes) -> Result<Json<Value>, FuzzyError> {
    run_analysis(&state, Domain::AirQuality, &body)
}

async fn light_comfort(State(state): State<SharedState>, body: Bytes) -> Result<Json<Value>, FuzzyError> {
    run_analysis(&state, Domain::LightComfort, &body)
}

async fn plant_care(State(state): State<SharedState>, body: Bytes) -> Result<Json<Value>, FuzzyError> {
    run_analysis(&state, Domain::PlantCare, &body)
}

#[derive(Debug, Serialize)]
struct HealthReport {
    status: &'static str,
    version: &'static str,
    profiles: IndexMap<&'static str, ProfileStatus>,
}

/// Health check endpoint
async fn health_check() -> Json<HealthReport> {
    let profiles: IndexMap<&'static str, ProfileStatus> = Domain::ALL
        .iter()
        .map(|d| (d.as_str(), domains::profile_status(*d)))
        .collect();
    let degraded = profiles.values().any(|s| *s == ProfileStatus::Unavailable);

    Json(HealthReport {
        status: if degraded { "degraded" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        profiles,
    })
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ProfileEntry {
    Ready(ProfileSummary),
    Unavailable { name: &'static str, error: String },
}

/// Describe every profile, building any that were not requested yet
async fn list_profiles() -> Json<Vec<ProfileEntry>> {
    let entries = Domain::ALL
        .iter()
        .map(|&domain| match domains::get_profile(domain) {
            Ok(profile) => ProfileEntry::Ready(profile.describe()),
            Err(e) => ProfileEntry::Unavailable {
                name: domain.as_str(),
                error: e.message,
            },
        })
        .collect();
    Json(entries)
}

// ============================================================================
// Server Setup
// ============================================================================

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn scenario_routes() -> Router<SharedState> {
    Router::new()
        .route("/comfort", post(comfort))
        .route("/air-quality", post(air_quality))
        .route("/light-comfort", post(light_comfort))
        .route("/plant-care", post(plant_care))
        .route("/profiles", get(list_profiles))
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let server = &state.config.server;

    let mut app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/fuzzy-logic", scenario_routes());

    if server.legacy_routes {
        app = app.nest("/fuzzy-logic", scenario_routes());
    }

    if server.cors_enabled {
        app = app.layer(cors_layer(&state.config.cors));
    }

    app = app.layer(RequestBodyLimitLayer::new(server.max_body_size));

    if server.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

/// Run the async HTTP server
///
/// Builds every profile up front, then serves until Ctrl+C.
pub async fn run_server(config: AppConfig) -> FuzzyResult<()> {
    let addr = config.server.socket_addr()?;

    for (domain, err) in domains::warm_up() {
        warn!(domain = %domain, error = %err, "profile unavailable, its endpoint will answer 500");
    }

    let state = Arc::new(AppState::new(config));
    info!(
        origins = ?state.config.cors.allowed_origins(),
        nudge_edges = state.edges.enabled,
        edge_delta = state.edges.delta,
        legacy_routes = state.config.server.legacy_routes,
        "starting fuzzy logic API"
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C)
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_app(config: AppConfig) -> Router {
        create_router(Arc::new(AppState::new(config)))
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app(AppConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["profiles"].get("plant-care").is_some());
    }

    #[tokio::test]
    async fn test_comfort_endpoint() {
        let app = test_app(AppConfig::default());
        let (status, json) =
            post_json(app, "/api/fuzzy-logic/comfort", r#"{"temperature": 23, "humidity": 50}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["comfort_category"], "Comfortable");
        assert_eq!(json["comfort_level"], 90.33);
        assert!(json["warning"].is_null());
        assert_eq!(json["analysis"]["temperature"]["interpretation"], "moderate");
    }

    #[tokio::test]
    async fn test_air_quality_endpoint() {
        let app = test_app(AppConfig::default());
        let (status, json) = post_json(app, "/api/fuzzy-logic/air-quality", r#"{"co2": 300, "pm25": 0}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["air_quality_category"], "Healthy");
    }

    #[tokio::test]
    async fn test_light_comfort_endpoint() {
        let app = test_app(AppConfig::default());
        let (status, json) = post_json(
            app,
            "/api/fuzzy-logic/light-comfort",
            r#"{"intensity": 500, "colour_temp": 4000}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["light_comfort_category"], "Comfortable");
    }

    #[tokio::test]
    async fn test_plant_care_endpoint() {
        let app = test_app(AppConfig::default());
        let (status, json) = post_json(
            app,
            "/api/fuzzy-logic/plant-care",
            r#"{"soil_moisture": 20, "light_level": 50, "temperature": 20, "plant_type": "orchid"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["numerical_outputs"]["watering_frequency_days"], 5);
        assert!(json["plant_specific_advice"].as_str().unwrap().starts_with("Orchids"));
        assert_eq!(json["current_conditions"]["soil_moisture"]["status"], "Dry");
    }

    #[tokio::test]
    async fn test_plant_care_without_type_has_no_advice() {
        let app = test_app(AppConfig::default());
        let (_, json) = post_json(
            app,
            "/api/fuzzy-logic/plant-care",
            r#"{"soil_moisture": 20, "light_level": 50, "temperature": 20}"#,
        )
        .await;

        assert!(json.get("plant_specific_advice").is_none());
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let app = test_app(AppConfig::default());
        let (status, json) = post_json(app.clone(), "/api/fuzzy-logic/comfort", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No data provided");
        assert_eq!(json["code"], "NO_DATA");

        let (status, json) = post_json(app.clone(), "/api/fuzzy-logic/plant-care", r#"{"soil_moisture": 2"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No data provided");

        let (status, json) = post_json(app.clone(), "/api/fuzzy-logic/comfort", r#"{"humidity": 50}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Temperature and humidity values are required");

        let (status, json) = post_json(
            app,
            "/api/fuzzy-logic/air-quality",
            r#"{"co2": 5000, "pm25": 10}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "CO2 must be between 300 and 2000 ppm");
        assert_eq!(json["status"], 400);
    }

    #[tokio::test]
    async fn test_degenerate_output_is_server_error() {
        let app = test_app(AppConfig::default());
        let (status, json) =
            post_json(app, "/api/fuzzy-logic/comfort", r#"{"temperature": 15, "humidity": 50}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["code"], "DEGENERATE_OUTPUT");
    }

    #[tokio::test]
    async fn test_legacy_routes() {
        let body = r#"{"temperature": 23, "humidity": 50}"#;

        let (status, _) = post_json(test_app(AppConfig::default()), "/fuzzy-logic/comfort", body).await;
        assert_eq!(status, StatusCode::OK);

        let mut config = AppConfig::default();
        config.server.legacy_routes = false;
        let response = test_app(config)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/fuzzy-logic/comfort")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_profiles_endpoint() {
        let app = test_app(AppConfig::default());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/fuzzy-logic/profiles")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        let profiles = json.as_array().unwrap();
        assert_eq!(profiles.len(), 4);
        assert_eq!(profiles[3]["name"], "plant-care");
        assert_eq!(profiles[3]["rule_count"], 13);
    }

    #[tokio::test]
    async fn test_cors_allows_dev_origin() {
        let app = test_app(AppConfig::default());
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/fuzzy-logic/comfort")
                    .header("Origin", "http://localhost:3000")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }
}
