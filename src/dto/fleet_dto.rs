use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::args::optional_string;
use crate::models::vehicle::Vehicle;

// Argumentos de search_fleet_by_zip
#[derive(Debug, Default, Deserialize)]
pub struct ZipSearchRequest {
    #[serde(default, deserialize_with = "optional_string")]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub status: Option<String>,
}

// Argumentos de search_vehicles_general (y query string de /api/fleet/search)
#[derive(Debug, Default, Deserialize)]
pub struct GeneralSearchRequest {
    #[serde(default, deserialize_with = "optional_string")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub status: Option<String>,
}

// Argumentos de get_fleet_summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default, deserialize_with = "optional_string")]
    pub zip_code: Option<String>,
}

// Respuesta cuando no hay vehículos que coincidan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoVehiclesResponse {
    pub message: String,
    pub vehicles: Vec<Vehicle>,
}

impl NoVehiclesResponse {
    pub fn new(message: String) -> Self {
        Self {
            message,
            vehicles: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipSearchResult {
    pub zip_code: String,
    pub location: String,
    pub count: usize,
    pub vehicles: Vec<Vehicle>,
}

/// Dos formas posibles: resultados o `{message, vehicles: []}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZipSearchResponse {
    Found(ZipSearchResult),
    Empty(NoVehiclesResponse),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSearchResult {
    pub count: usize,
    pub locations_found: usize,
    pub vehicles: Vec<Vehicle>,
    pub by_location: BTreeMap<String, Vec<Vehicle>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeneralSearchResponse {
    Found(GeneralSearchResult),
    Empty(NoVehiclesResponse),
}

// Estadísticas de flota de una ZIP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub zip_code: String,
    pub location: String,
    pub total_vehicles: usize,
    pub available: usize,
    pub rented: usize,
    pub maintenance: usize,
    pub categories: BTreeMap<String, usize>,
    /// Media exacta redondeada a 2 decimales; float sólo en el JSON
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_daily_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FleetSummaryResponse {
    Summary(FleetSummary),
    Missing { error: String },
}
