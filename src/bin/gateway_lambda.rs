//! Lambda de las tools remotas (tiempo y vuelos) detrás del gateway de agentes
//!
//! El gateway pasa el nombre extendido de la tool en
//! `client_context.custom["bedrockAgentCoreToolName"]` y los argumentos como
//! payload del evento.

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Context, Error, LambdaEvent};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use fleet_demand::config::EnvironmentConfig;
use fleet_demand::gateway::{handle_gateway_request, GatewayRequest, GatewayResponse};
use fleet_demand::services::SignalServices;
use fleet_demand::tools::ToolRegistry;

const TOOL_NAME_KEY: &str = "bedrockAgentCoreToolName";

fn tool_identifier(context: &Context) -> String {
    context
        .client_context
        .as_ref()
        .and_then(|cc| cc.custom.get(TOOL_NAME_KEY))
        .cloned()
        .unwrap_or_default()
}

async fn handler(registry: Arc<ToolRegistry>, event: LambdaEvent<Value>) -> Result<GatewayResponse, Error> {
    let identifier = tool_identifier(&event.context);
    tracing::info!("🛰️ Gateway event for tool '{}' (request {})", identifier, event.context.request_id);

    let request = GatewayRequest::new(identifier, event.payload);
    Ok(handle_gateway_request(&registry, request).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .without_time()
        .init();

    let config = EnvironmentConfig::from_env()?;
    let signals = Arc::new(SignalServices::from_config(&config)?);
    let registry = Arc::new(ToolRegistry::remote(signals));
    tracing::info!("🧰 Remote tools: {:?}", registry.tool_names());

    run(service_fn(move |event: LambdaEvent<Value>| {
        let registry = registry.clone();
        async move { handler(registry, event).await }
    }))
    .await
}
