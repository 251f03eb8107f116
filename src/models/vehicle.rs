//! Modelo de Vehicle
//!
//! Un registro por unidad física de la flota. Mapea los atributos del item
//! de DynamoDB (tabla de inventario con GSI `zip_code-index`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Rented,
    Maintenance,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [
        VehicleStatus::Available,
        VehicleStatus::Rented,
        VehicleStatus::Maintenance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Rented => "rented",
            VehicleStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown vehicle status: {}", s)))
    }
}

/// Categoría comercial del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Sedan,
    Suv,
    Sports,
    Electric,
    Truck,
    Luxury,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 6] = [
        VehicleCategory::Sedan,
        VehicleCategory::Suv,
        VehicleCategory::Sports,
        VehicleCategory::Electric,
        VehicleCategory::Truck,
        VehicleCategory::Luxury,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Sedan => "sedan",
            VehicleCategory::Suv => "suv",
            VehicleCategory::Sports => "sports",
            VehicleCategory::Electric => "electric",
            VehicleCategory::Truck => "truck",
            VehicleCategory::Luxury => "luxury",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::BadRequest(format!("Unknown vehicle category: {}", s)))
    }
}

/// Vehicle principal - un item de la tabla de inventario
///
/// `daily_rate` se mantiene como decimal exacto; sólo al serializar a JSON
/// se convierte a float (conversión con pérdida, únicamente para mostrar).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub category: VehicleCategory,
    pub status: VehicleStatus,
    pub location: String,
    pub zip_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub daily_rate: Decimal,
    pub mileage: i64,
    pub license_plate: String,
    pub vin: String,
    pub rental_start: Option<DateTime<Utc>>,
    pub rental_end: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl Vehicle {
    pub fn is_rented(&self) -> bool {
        self.status == VehicleStatus::Rented
    }
}

/// Parsear un timestamp almacenado: RFC 3339, o ISO-8601 sin zona (se asume UTC)
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::Store(format!("Invalid timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Available".parse::<VehicleStatus>().unwrap(), VehicleStatus::Available);
        assert_eq!("RENTED".parse::<VehicleStatus>().unwrap(), VehicleStatus::Rented);
        assert!("sold".parse::<VehicleStatus>().is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("SUV".parse::<VehicleCategory>().unwrap(), VehicleCategory::Suv);
        assert_eq!("electric".parse::<VehicleCategory>().unwrap(), VehicleCategory::Electric);
        assert!("van".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = parse_timestamp("2025-03-14T09:26:53.589793").unwrap();
        assert_eq!(naive.year(), 2025);
        assert_eq!(naive.hour(), 9);

        let rfc = parse_timestamp("2025-03-14T09:26:53+02:00").unwrap();
        assert_eq!(rfc.hour(), 7);

        assert!(parse_timestamp("yesterday").is_err());
    }
}
