//! Sobre de invocación remota (gateway de agentes)
//!
//! Petición `{event, context: {executionMetadata: {toolIdentifier}}}` y
//! respuesta `{statusCode, body}` con el body serializado como string JSON.

use std::panic::AssertUnwindSafe;

use axum::http::StatusCode;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::tools::ToolRegistry;
use crate::utils::errors::{bad_request_error, internal_error, AppError, AppResult};

/// Separador entre el nombre del target y el de la tool ("WeatherTarget___get_weather_forecast")
pub const TOOL_NAME_SEPARATOR: &str = "___";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayRequest {
    #[serde(default)]
    pub event: Value,
    #[serde(default)]
    pub context: GatewayContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayContext {
    #[serde(default)]
    pub execution_metadata: ExecutionMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetadata {
    #[serde(default)]
    pub tool_identifier: String,
}

impl GatewayRequest {
    pub fn new(tool_identifier: impl Into<String>, event: Value) -> Self {
        Self {
            event,
            context: GatewayContext {
                execution_metadata: ExecutionMetadata {
                    tool_identifier: tool_identifier.into(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub body: String,
}

impl GatewayResponse {
    fn new(status: StatusCode, body: &Value) -> Self {
        Self {
            status_code: status.as_u16(),
            body: body.to_string(),
        }
    }

    fn from_error(error: &AppError) -> Self {
        match error {
            AppError::BadRequest(_) | AppError::Validation(_) => {
                Self::new(StatusCode::BAD_REQUEST, &json!({ "error": error.detail() }))
            }
            other => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                &json!({ "error": format!("Internal error: {}", other.detail()) }),
            ),
        }
    }

    /// Body decodificado (para tests y clientes)
    pub fn body_json(&self) -> AppResult<Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Nombre de la tool dentro del identificador "Target___tool"
pub fn tool_name_from_identifier(identifier: &str) -> &str {
    identifier
        .split(TOOL_NAME_SEPARATOR)
        .nth(1)
        .unwrap_or(identifier)
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

async fn invoke(registry: &ToolRegistry, request: GatewayRequest) -> AppResult<Value> {
    let name = tool_name_from_identifier(&request.context.execution_metadata.tool_identifier);
    let tool = registry
        .get(name)
        .ok_or_else(|| bad_request_error(&format!("Unknown tool: {}", name)))?;

    let args = match request.event {
        Value::Null => json!({}),
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(bad_request_error(&format!(
                "Tool arguments must be a JSON object, got {}",
                other
            )))
        }
    };

    for parameter in tool.metadata().required_parameters() {
        if is_missing(args.get(&parameter.name)) {
            return Err(bad_request_error(&format!("{} parameter is required", parameter.name)));
        }
    }

    log::info!("🛰️ Gateway invoking {}", name);
    AssertUnwindSafe(tool.execute(args))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "tool panicked".to_string());
            Err(internal_error(&message))
        })
}

/// Atender una petición del gateway; nunca falla, los errores van en el status
pub async fn handle_gateway_request(registry: &ToolRegistry, request: GatewayRequest) -> GatewayResponse {
    let identifier = request.context.execution_metadata.tool_identifier.clone();

    match invoke(registry, request).await {
        Ok(body) => GatewayResponse::new(StatusCode::OK, &body),
        Err(e) => {
            log::warn!("⚠️ Gateway call to '{}' failed: {}", identifier, e);
            GatewayResponse::from_error(&e)
        }
    }
}
