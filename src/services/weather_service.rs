//! Pronóstico del tiempo (Open-Meteo)
//!
//! Dos llamadas secuenciales: geocoding del texto libre y pronóstico diario
//! para esas coordenadas.

use serde::Deserialize;

use super::build_http_client;
use super::geocoding_service::GeocodingService;
use crate::dto::signal_dto::{ForecastDay, WeatherForecastResponse};
use crate::utils::errors::{AppError, AppResult};

pub const DEFAULT_FORECAST_DAYS: i64 = 7;
pub const MAX_FORECAST_DAYS: i64 = 16;
const FORECAST_TIMEOUT_SECS: u64 = 5;
const DAILY_FIELDS: &str =
    "temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_max,weathercode";

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    daily: DailySeries,
}

#[derive(Debug, Deserialize)]
struct DailySeries {
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability_max: Vec<Option<i64>>,
    #[serde(default)]
    weathercode: Vec<Option<i64>>,
}

impl DailySeries {
    fn into_days(self) -> Vec<ForecastDay> {
        fn at<T: Copy>(series: &[Option<T>], i: usize) -> Option<T> {
            series.get(i).copied().flatten()
        }

        self.time
            .iter()
            .enumerate()
            .map(|(i, date)| ForecastDay {
                date: date.clone(),
                temp_max_f: at(&self.temperature_2m_max, i),
                temp_min_f: at(&self.temperature_2m_min, i),
                precipitation_mm: at(&self.precipitation_sum, i),
                precipitation_probability: at(&self.precipitation_probability_max, i),
                weather_code: at(&self.weathercode, i),
            })
            .collect()
    }
}

pub struct WeatherService {
    geocoding: GeocodingService,
    forecast_base_url: String,
    client: reqwest::Client,
}

impl WeatherService {
    pub fn new(geocoding_base_url: impl Into<String>, forecast_base_url: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            geocoding: GeocodingService::new(geocoding_base_url)?,
            forecast_base_url: forecast_base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(FORECAST_TIMEOUT_SECS)?,
        })
    }

    pub async fn get_forecast(&self, location: &str, days: Option<i64>) -> AppResult<WeatherForecastResponse> {
        let days = days
            .unwrap_or(DEFAULT_FORECAST_DAYS)
            .clamp(1, MAX_FORECAST_DAYS);

        let place = self
            .geocoding
            .geocode(location)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location '{}' not found", location)))?;

        log::info!("🌦️ Fetching {}-day forecast for {}", days, place.name);

        let response = self
            .client
            .get(format!("{}/v1/forecast", self.forecast_base_url))
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("timezone", "auto".to_string()),
                ("forecast_days", days.to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::ExternalApi(format!("Failed to fetch weather: {}", e)))?;

        let payload: ForecastPayload = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Failed to parse forecast response: {}", e)))?;

        let forecast = payload.daily.into_days();

        Ok(WeatherForecastResponse {
            location: place.name,
            latitude: place.latitude,
            longitude: place.longitude,
            forecast_days: forecast.len(),
            forecast,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_geocoding(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{"name": "Denver", "latitude": 39.73915, "longitude": -104.9847}]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_forecast_is_normalized_and_capped() {
        let server = MockServer::start().await;
        mount_geocoding(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("forecast_days", "16"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "daily": {
                    "time": ["2025-07-01", "2025-07-02"],
                    "temperature_2m_max": [91.2, 88.0],
                    "temperature_2m_min": [62.1, null],
                    "precipitation_sum": [0.0, 2.4],
                    "precipitation_probability_max": [5, 40],
                    "weathercode": [1, 61]
                }
            })))
            .mount(&server)
            .await;

        let service = WeatherService::new(server.uri(), server.uri()).unwrap();
        let forecast = service.get_forecast("Denver", Some(30)).await.unwrap();

        assert_eq!(forecast.location, "Denver");
        assert_eq!(forecast.forecast_days, 2);
        assert_eq!(forecast.forecast[0].temp_max_f, Some(91.2));
        assert_eq!(forecast.forecast[1].temp_min_f, None);
        assert_eq!(forecast.forecast[1].precipitation_probability, Some(40));
        let day = serde_json::to_value(&forecast.forecast[1]).unwrap();
        assert_eq!(day["precipitation_probability"].to_string(), "40");
        assert_eq!(forecast.forecast[1].weather_code, Some(61));
    }

    #[tokio::test]
    async fn test_unknown_location_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let service = WeatherService::new(server.uri(), server.uri()).unwrap();
        let err = service
            .get_forecast("Nowhere-Nonexistent-City", None)
            .await
            .unwrap_err();
        assert_eq!(err.detail(), "Location 'Nowhere-Nonexistent-City' not found");
    }
}
