//! Rutas HTTP

pub mod fleet_routes;
pub mod gateway_routes;
pub mod tool_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_middleware;
use crate::state::AppState;

/// Router completo de la API
pub fn create_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config);

    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/fleet", fleet_routes::create_fleet_router())
        .nest("/api/tools", tool_routes::create_tool_router())
        .nest("/api/gateway", gateway_routes::create_gateway_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Fleet demand assistant API running",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
