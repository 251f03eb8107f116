use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::args::{optional_int, optional_string};

// Argumentos de get_national_holidays
#[derive(Debug, Default, Deserialize, Validate)]
pub struct HolidaysRequest {
    #[serde(default, deserialize_with = "optional_int")]
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "optional_int")]
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

// Argumentos de get_local_events
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EventsRequest {
    #[serde(default, deserialize_with = "optional_string")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    #[validate(range(min = 1))]
    pub size: Option<u32>,
}

// Argumentos de get_flight_traffic
#[derive(Debug, Default, Deserialize)]
pub struct FlightTrafficRequest {
    #[serde(default, deserialize_with = "optional_string")]
    pub airport_code: Option<String>,
}

// Argumentos de get_weather_forecast
#[derive(Debug, Default, Deserialize)]
pub struct WeatherRequest {
    #[serde(default, deserialize_with = "optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "optional_int")]
    pub days: Option<i64>,
}

/// Mes filtrado: número 1-12 o "all"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthSelection {
    Month(u32),
    All(String),
}

impl MonthSelection {
    pub fn from_option(month: Option<u32>) -> Self {
        match month {
            Some(month) => MonthSelection::Month(month),
            None => MonthSelection::All("all".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: String,
    pub name: String,
    #[serde(rename = "localName")]
    pub local_name: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub global: bool,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidaysResponse {
    pub year: i32,
    pub month: MonthSelection,
    pub count: usize,
    pub holidays: Vec<Holiday>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalEvent {
    pub name: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub genre: String,
    pub venue: Venue,
    pub url: String,
    #[serde(rename = "priceRanges")]
    pub price_ranges: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventsResponse {
    pub zip_code: String,
    pub count: usize,
    pub events: Vec<LocalEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightArrival {
    pub flight_number: String,
    pub airline: String,
    pub departure_airport: String,
    pub departure_city: String,
    pub arrival_time: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightTrafficResponse {
    pub airport: String,
    pub total_arrivals_shown: usize,
    pub arrivals: Vec<FlightArrival>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    pub temp_max_f: Option<f64>,
    pub temp_min_f: Option<f64>,
    pub precipitation_mm: Option<f64>,
    /// Porcentaje entero tal como lo devuelve Open-Meteo
    pub precipitation_probability: Option<i64>,
    pub weather_code: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherForecastResponse {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub forecast_days: usize,
    pub forecast: Vec<ForecastDay>,
}
