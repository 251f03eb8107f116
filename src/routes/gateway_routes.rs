use axum::{extract::State, routing::post, Json, Router};

use crate::gateway::{handle_gateway_request, GatewayRequest, GatewayResponse};
use crate::state::AppState;

pub fn create_gateway_router() -> Router<AppState> {
    Router::new().route("/invoke", post(invoke))
}

/// Mismo sobre que recibe la Lambda, servido por HTTP para pruebas locales
async fn invoke(State(state): State<AppState>, Json(request): Json<GatewayRequest>) -> Json<GatewayResponse> {
    Json(handle_gateway_request(&state.gateway_tools, request).await)
}
