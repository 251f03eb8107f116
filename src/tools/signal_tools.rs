//! Tools de señales externas de demanda
//!
//! Los fallos de las APIs externas (clave ausente, red, upstream) no son
//! errores de invocación: se devuelven como `{error, <colección>: []}` para
//! que el agente pueda razonar sobre ellos.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use validator::Validate;

use super::{Tool, ToolMetadata, ToolParameter};
use crate::dto::args::{parse_args, required};
use crate::dto::signal_dto::{EventsRequest, FlightTrafficRequest, HolidaysRequest, WeatherRequest};
use crate::services::flight_service::API_KEY_HINT;
use crate::services::SignalServices;
use crate::utils::errors::{AppError, AppResult};

fn error_payload(error: &AppError, collection: &str) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert("error".to_string(), Value::String(error.detail()));
    payload.insert(collection.to_string(), Value::Array(Vec::new()));
    Value::Object(payload)
}

fn into_payload<T: serde::Serialize>(tool: &str, result: AppResult<T>, collection: &str) -> AppResult<Value> {
    match result {
        Ok(response) => Ok(serde_json::to_value(response)?),
        Err(e) => {
            log::warn!("⚠️ {} failed: {}", tool, e);
            Ok(error_payload(&e, collection))
        }
    }
}

pub struct NationalHolidaysTool {
    services: Arc<SignalServices>,
}

impl NationalHolidaysTool {
    pub fn new(services: Arc<SignalServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Tool for NationalHolidaysTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_national_holidays".to_string(),
            description: "U.S. national holidays for a year, optionally one month. Holidays mean more travel and higher rental demand.".to_string(),
            parameters: vec![
                ToolParameter::optional("year", "integer", "Year (e.g., 2025). Defaults to the current year."),
                ToolParameter::optional("month", "integer", "Month number (1-12) to keep only that month's holidays"),
            ],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: HolidaysRequest = parse_args(args)?;
        if let Err(e) = request.validate() {
            return into_payload::<Value>("get_national_holidays", Err(e.into()), "holidays");
        }

        let result = self.services.holidays.get_holidays(request.year, request.month).await;
        into_payload("get_national_holidays", result, "holidays")
    }
}

pub struct LocalEventsTool {
    services: Arc<SignalServices>,
}

impl LocalEventsTool {
    pub fn new(services: Arc<SignalServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Tool for LocalEventsTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_local_events".to_string(),
            description: "Upcoming concerts, games and festivals near a ZIP code (Ticketmaster). Big events drive rental demand.".to_string(),
            parameters: vec![
                ToolParameter::required("zip_code", "string", "ZIP code to search (e.g., '90001')"),
                ToolParameter::optional("start_date", "string", "Start date YYYY-MM-DD. Defaults to now."),
                ToolParameter::optional("end_date", "string", "End date YYYY-MM-DD. Defaults to 30 days after start."),
                ToolParameter::optional("size", "integer", "Number of events (default 20, max 200)"),
            ],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: EventsRequest = parse_args(args)?;
        if let Err(e) = request.validate() {
            return into_payload::<Value>("get_local_events", Err(e.into()), "events");
        }
        let zip_code = required(&request.zip_code, "zip_code")?;

        let result = self
            .services
            .events
            .get_local_events(
                zip_code,
                request.start_date.as_deref(),
                request.end_date.as_deref(),
                request.size,
            )
            .await;
        into_payload("get_local_events", result, "events")
    }
}

pub struct FlightTrafficTool {
    services: Arc<SignalServices>,
}

impl FlightTrafficTool {
    pub fn new(services: Arc<SignalServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Tool for FlightTrafficTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_flight_traffic".to_string(),
            description: "Recent and upcoming arrivals at an airport. High arrival counts indicate rental demand.".to_string(),
            parameters: vec![ToolParameter::required(
                "airport_code",
                "string",
                "IATA airport code (e.g., 'LAX', 'JFK', 'ORD', 'ATL')",
            )],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: FlightTrafficRequest = parse_args(args)?;
        let airport_code = required(&request.airport_code, "airport_code")?;

        match self.services.flights.get_arrivals(airport_code).await {
            Ok(response) => Ok(serde_json::to_value(response)?),
            Err(e) => {
                log::warn!("⚠️ get_flight_traffic failed: {}", e);
                let mut payload = error_payload(&e, "flights");
                payload["airport"] = json!(airport_code.trim().to_uppercase());
                if matches!(e, AppError::Configuration(_)) {
                    payload["note"] = json!(API_KEY_HINT);
                }
                Ok(payload)
            }
        }
    }
}

pub struct WeatherForecastTool {
    services: Arc<SignalServices>,
}

impl WeatherForecastTool {
    pub fn new(services: Arc<SignalServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Tool for WeatherForecastTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_weather_forecast".to_string(),
            description: "Daily weather forecast (Fahrenheit) for a city or place name.".to_string(),
            parameters: vec![
                ToolParameter::required("location", "string", "City or place name (e.g., 'Los Angeles')"),
                ToolParameter::optional("days", "integer", "Forecast days, 1-16 (default 7)"),
            ],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: WeatherRequest = parse_args(args)?;
        let location = required(&request.location, "location")?;

        let result = self.services.weather.get_forecast(location, request.days).await;
        into_payload("get_weather_forecast", result, "forecast")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn services_at(uri: &str) -> Arc<SignalServices> {
        let config = EnvironmentConfig {
            holidays_base_url: uri.to_string(),
            ticketmaster_base_url: uri.to_string(),
            aviationstack_base_url: uri.to_string(),
            geocoding_base_url: uri.to_string(),
            forecast_base_url: uri.to_string(),
            ..EnvironmentConfig::default()
        };
        Arc::new(SignalServices::from_config(&config).unwrap())
    }

    #[tokio::test]
    async fn test_unknown_location_becomes_error_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let tool = WeatherForecastTool::new(services_at(&server.uri()));
        let result = tool
            .execute(json!({"location": "Nowhere-Nonexistent-City"}))
            .await
            .unwrap();
        assert_eq!(
            result,
            json!({"error": "Location 'Nowhere-Nonexistent-City' not found", "forecast": []})
        );
    }

    #[tokio::test]
    async fn test_missing_flight_key_payload() {
        let tool = FlightTrafficTool::new(services_at("http://127.0.0.1:9"));
        let result = tool.execute(json!({"airport_code": "lax"})).await.unwrap();

        assert_eq!(result["airport"], json!("LAX"));
        assert_eq!(result["flights"], json!([]));
        assert_eq!(result["note"], json!(API_KEY_HINT));
        assert!(result["error"].as_str().unwrap().contains("AVIATIONSTACK_API_KEY"));
    }

    #[tokio::test]
    async fn test_missing_events_key_payload() {
        let tool = LocalEventsTool::new(services_at("http://127.0.0.1:9"));
        let result = tool.execute(json!({"zip_code": "90001"})).await.unwrap();
        assert_eq!(result["events"], json!([]));
        assert!(result["error"].as_str().unwrap().starts_with("Ticketmaster API key not configured"));
    }

    #[tokio::test]
    async fn test_holidays_month_is_validated() {
        let tool = NationalHolidaysTool::new(services_at("http://127.0.0.1:9"));
        let result = tool.execute(json!({"year": 2025, "month": 13})).await.unwrap();
        assert_eq!(result["holidays"], json!([]));
        assert!(result["error"].is_string());
    }

    #[tokio::test]
    async fn test_events_size_is_validated() {
        let tool = LocalEventsTool::new(services_at("http://127.0.0.1:9"));
        let result = tool.execute(json!({"zip_code": "90001", "size": 0})).await.unwrap();
        assert_eq!(result["events"], json!([]));
        assert!(result["error"].is_string());
    }

    #[tokio::test]
    async fn test_holidays_upstream_failure_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tool = NationalHolidaysTool::new(services_at(&server.uri()));
        let result = tool.execute(json!({"year": "2025"})).await.unwrap();
        assert_eq!(result["holidays"], json!([]));
        assert!(result["error"].as_str().unwrap().starts_with("Failed to fetch holidays"));
    }
}
