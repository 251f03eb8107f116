use serde::Deserialize;

use super::build_http_client;
use crate::utils::errors::{AppError, AppResult};

/// Coordenadas del primer resultado de geocoding
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodedLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoGeocodingResponse {
    #[serde(default)]
    results: Option<Vec<OpenMeteoPlace>>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoPlace {
    name: String,
    latitude: f64,
    longitude: f64,
}

const GEOCODING_TIMEOUT_SECS: u64 = 5;

/// Cliente de la API de geocoding de Open-Meteo (sin autenticación)
pub struct GeocodingService {
    base_url: String,
    client: reqwest::Client,
}

impl GeocodingService {
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(GEOCODING_TIMEOUT_SECS)?,
        })
    }

    /// Geocodificar texto libre; `Ok(None)` si la API no devuelve resultados
    pub async fn geocode(&self, location: &str) -> AppResult<Option<GeocodedLocation>> {
        log::info!("🗺️ Geocoding location: {}", location);

        let url = format!(
            "{}/v1/search?name={}&count=1&language=en&format=json",
            self.base_url,
            urlencoding::encode(location)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch weather: {}", e)))?;

        let body: OpenMeteoGeocodingResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse geocoding response: {}", e)))?;

        let place = body.results.and_then(|results| results.into_iter().next());
        match &place {
            Some(p) => log::info!("✅ Geocoding successful: {} -> ({}, {})", location, p.latitude, p.longitude),
            None => log::warn!("⚠️ No coordinates found for location: {}", location),
        }

        Ok(place.map(|p| GeocodedLocation {
            name: p.name,
            latitude: p.latitude,
            longitude: p.longitude,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_geocode_takes_first_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Los Angeles"))
            .and(query_param("count", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"name": "Los Angeles", "latitude": 34.05223, "longitude": -118.24368},
                    {"name": "Los Ángeles", "latitude": -37.46973, "longitude": -72.35366}
                ]
            })))
            .mount(&server)
            .await;

        let service = GeocodingService::new(server.uri()).unwrap();
        let place = service.geocode("Los Angeles").await.unwrap().unwrap();
        assert_eq!(place.name, "Los Angeles");
        assert_eq!(place.latitude, 34.05223);
    }

    #[tokio::test]
    async fn test_geocode_without_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generationtime_ms": 0.5
            })))
            .mount(&server)
            .await;

        let service = GeocodingService::new(server.uri()).unwrap();
        assert!(service.geocode("Atlantis").await.unwrap().is_none());
    }
}
