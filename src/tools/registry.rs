//! Registro de tools: nombre -> tool

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use super::fleet_tools::{FleetSummaryTool, SearchFleetByZipTool, SearchVehiclesGeneralTool};
use super::signal_tools::{FlightTrafficTool, LocalEventsTool, NationalHolidaysTool, WeatherForecastTool};
use super::{Tool, ToolMetadata};
use crate::services::{FleetQueryService, SignalServices};

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Las siete tools del asistente (flota + señales)
    pub fn full(fleet: FleetQueryService, signals: Arc<SignalServices>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SearchFleetByZipTool::new(fleet.clone())));
        registry.register(Arc::new(SearchVehiclesGeneralTool::new(fleet.clone())));
        registry.register(Arc::new(FleetSummaryTool::new(fleet)));
        registry.register(Arc::new(NationalHolidaysTool::new(signals.clone())));
        registry.register(Arc::new(LocalEventsTool::new(signals.clone())));
        registry.register(Arc::new(WeatherForecastTool::new(signals.clone())));
        registry.register(Arc::new(FlightTrafficTool::new(signals)));
        registry
    }

    /// Tools alojadas detrás del gateway remoto
    pub fn remote(signals: Arc<SignalServices>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(WeatherForecastTool::new(signals.clone())));
        registry.register(Arc::new(FlightTrafficTool::new(signals)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.metadata().name;
        log::debug!("🔧 Registering tool: {}", name);
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.values().map(|tool| tool.metadata()).collect()
    }

    /// Invocación en proceso: siempre devuelve un string JSON
    pub async fn call(&self, name: &str, args: Value) -> String {
        self.call_value(name, args).await.to_string()
    }

    pub async fn call_value(&self, name: &str, args: Value) -> Value {
        let Some(tool) = self.get(name) else {
            log::warn!("❓ Unknown tool requested: {}", name);
            return json!({ "error": format!("Unknown tool: {}", name) });
        };

        log::info!("🔧 Calling tool {}", name);
        match tool.execute(args).await {
            Ok(value) => value,
            Err(e) => {
                log::warn!("⚠️ Tool {} rejected its arguments: {}", name, e);
                json!({ "error": e.detail() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::repositories::memory_fleet_store::InMemoryFleetStore;
    use crate::repositories::FleetRepository;

    fn registries() -> (ToolRegistry, ToolRegistry) {
        let signals = Arc::new(SignalServices::from_config(&EnvironmentConfig::default()).unwrap());
        let fleet = FleetQueryService::new(FleetRepository::new(Arc::new(InMemoryFleetStore::new()), 100));
        (ToolRegistry::full(fleet, signals.clone()), ToolRegistry::remote(signals))
    }

    #[test]
    fn test_registry_contents() {
        let (full, remote) = registries();
        assert_eq!(
            full.tool_names(),
            vec![
                "get_fleet_summary",
                "get_flight_traffic",
                "get_local_events",
                "get_national_holidays",
                "get_weather_forecast",
                "search_fleet_by_zip",
                "search_vehicles_general",
            ]
        );
        assert_eq!(remote.tool_names(), vec!["get_flight_traffic", "get_weather_forecast"]);
        assert!(!remote.has_tool("search_fleet_by_zip"));
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let (full, _) = registries();
        let out = full.call("bogus", json!({})).await;
        assert_eq!(serde_json::from_str::<Value>(&out).unwrap(), json!({"error": "Unknown tool: bogus"}));
    }

    #[tokio::test]
    async fn test_call_returns_json_string() {
        let (full, _) = registries();
        let out = full.call("search_fleet_by_zip", json!({"zip_code": "99999"})).await;
        assert_eq!(
            serde_json::from_str::<Value>(&out).unwrap(),
            json!({"message": "No vehicles found for 99999", "vehicles": []})
        );

        let out = full.call("get_fleet_summary", json!({})).await;
        assert_eq!(
            serde_json::from_str::<Value>(&out).unwrap(),
            json!({"error": "zip_code parameter is required"})
        );
    }
}
