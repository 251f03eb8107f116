//! Llegadas de vuelos por aeropuerto (AviationStack)

use serde::Deserialize;

use super::build_http_client;
use crate::config::AVIATIONSTACK_PLACEHOLDER_KEY;
use crate::dto::signal_dto::{FlightArrival, FlightTrafficResponse};
use crate::utils::errors::{AppError, AppResult};

pub const ARRIVALS_LIMIT: u32 = 10;
pub const API_KEY_HINT: &str = "Get a free API key at https://aviationstack.com/";
const FLIGHTS_TIMEOUT_SECS: u64 = 10;
const NOT_AVAILABLE: &str = "N/A";
const DEMAND_NOTE: &str =
    "Showing recent/upcoming arrivals. High arrival count indicates increased rental demand.";

#[derive(Debug, Deserialize)]
struct AviationStackResponse {
    error: Option<AviationStackError>,
    #[serde(default)]
    data: Option<Vec<AviationStackFlight>>,
}

#[derive(Debug, Deserialize)]
struct AviationStackError {
    info: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AviationStackFlight {
    flight: Option<FlightIdent>,
    airline: Option<Airline>,
    departure: Option<FlightEndpoint>,
    arrival: Option<FlightEndpoint>,
    flight_status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FlightIdent {
    iata: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Airline {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FlightEndpoint {
    iata: Option<String>,
    airport: Option<String>,
    scheduled: Option<String>,
}

fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl AviationStackFlight {
    fn into_arrival(self) -> FlightArrival {
        let departure = self.departure.unwrap_or_default();
        FlightArrival {
            flight_number: or_na(self.flight.and_then(|f| f.iata)),
            airline: or_na(self.airline.and_then(|a| a.name)),
            departure_airport: or_na(departure.iata),
            departure_city: or_na(departure.airport),
            arrival_time: or_na(self.arrival.and_then(|a| a.scheduled)),
            status: or_na(self.flight_status),
        }
    }
}

pub struct FlightService {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl FlightService {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> AppResult<Self> {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != AVIATIONSTACK_PLACEHOLDER_KEY);

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client: build_http_client(FLIGHTS_TIMEOUT_SECS)?,
        })
    }

    /// Próximas llegadas al aeropuerto IATA indicado
    pub async fn get_arrivals(&self, airport_code: &str) -> AppResult<FlightTrafficResponse> {
        let airport = airport_code.trim().to_uppercase();
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::Configuration(
                "AviationStack API key not configured. Please add AVIATIONSTACK_API_KEY to Lambda environment"
                    .to_string(),
            )
        })?;

        log::info!("✈️ Fetching arrivals for {}", airport);
        let limit = ARRIVALS_LIMIT.to_string();

        let response = self
            .client
            .get(format!("{}/v1/flights", self.base_url))
            .query(&[
                ("access_key", api_key),
                ("arr_iata", airport.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch flight data: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch flight data: {}", e)))?;

        // AviationStack reporta errores de cuota/clave en el cuerpo
        let payload: AviationStackResponse = match serde_json::from_str(&body) {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => {
                return Err(AppError::ExternalApi(format!(
                    "Failed to fetch flight data: HTTP {}",
                    status
                )))
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(error) = payload.error {
            let info = error.info.unwrap_or_else(|| "Unknown error".to_string());
            log::warn!("⚠️ AviationStack error for {}: {}", airport, info);
            return Err(AppError::ExternalApi(format!("API Error: {}", info)));
        }
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Failed to fetch flight data: HTTP {}",
                status
            )));
        }

        let arrivals: Vec<FlightArrival> = payload
            .data
            .unwrap_or_default()
            .into_iter()
            .map(AviationStackFlight::into_arrival)
            .collect();

        Ok(FlightTrafficResponse {
            airport,
            total_arrivals_shown: arrivals.len(),
            arrivals,
            note: DEMAND_NOTE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_placeholder_key_counts_as_missing() {
        let service =
            FlightService::new("http://127.0.0.1:9", Some(AVIATIONSTACK_PLACEHOLDER_KEY.to_string()))
                .unwrap();
        let err = service.get_arrivals("lax").await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_arrivals_are_normalized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/flights"))
            .and(query_param("arr_iata", "LAX"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pagination": {"limit": 10, "count": 2},
                "data": [
                    {
                        "flight": {"iata": "DL123"},
                        "airline": {"name": "Delta Air Lines"},
                        "departure": {"iata": "ATL", "airport": "Hartsfield-Jackson"},
                        "arrival": {"scheduled": "2025-07-01T18:05:00+00:00"},
                        "flight_status": "active"
                    },
                    {"flight": {"iata": null}, "flight_status": "scheduled"}
                ]
            })))
            .mount(&server)
            .await;

        let service = FlightService::new(server.uri(), Some("key".to_string())).unwrap();
        let response = service.get_arrivals("lax").await.unwrap();

        assert_eq!(response.airport, "LAX");
        assert_eq!(response.total_arrivals_shown, 2);
        assert_eq!(response.arrivals[0].airline, "Delta Air Lines");
        assert_eq!(response.arrivals[1].flight_number, "N/A");
        assert_eq!(response.arrivals[1].departure_city, "N/A");
        assert_eq!(response.arrivals[1].status, "scheduled");
    }

    #[tokio::test]
    async fn test_body_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/flights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"code": "usage_limit_reached", "info": "Your monthly usage limit has been reached."}
            })))
            .mount(&server)
            .await;

        let service = FlightService::new(server.uri(), Some("key".to_string())).unwrap();
        let err = service.get_arrivals("JFK").await.unwrap_err();
        assert_eq!(err.detail(), "API Error: Your monthly usage limit has been reached.");
    }
}
