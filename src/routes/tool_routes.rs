use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use crate::state::AppState;
use crate::tools::ToolMetadata;
use crate::utils::errors::AppError;

pub fn create_tool_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tools))
        .route("/:name", post(call_tool))
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolMetadata>> {
    Json(state.tools.list_tools())
}

/// Invocación en proceso; el body (opcional) es el objeto de argumentos
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, AppError> {
    if !state.tools.has_tool(&name) {
        return Err(AppError::NotFound(format!("Unknown tool: {}", name)));
    }

    let args = body.map(|Json(args)| args).unwrap_or(Value::Null);
    Ok(Json(state.tools.call_value(&name, args).await))
}
