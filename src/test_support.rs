//! Helpers compartidos por los tests unitarios

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::vehicle::{Vehicle, VehicleCategory, VehicleStatus};
use crate::repositories::fleet_store::{FleetStore, VehicleFilter};
use crate::utils::errors::{AppError, AppResult};

pub fn sample_vehicle(id: &str, zip_code: &str, status: VehicleStatus, daily_rate: &str) -> Vehicle {
    let now = Utc::now();
    Vehicle {
        vehicle_id: id.to_string(),
        make: "Toyota".to_string(),
        model: "Camry".to_string(),
        year: 2024,
        category: VehicleCategory::Sedan,
        status,
        location: format!("City {}, ST", &zip_code[..2]),
        zip_code: zip_code.to_string(),
        daily_rate: Decimal::from_str_exact(daily_rate).unwrap(),
        mileage: 12_000,
        license_plate: format!("ABC{}", 1000 + id.len()),
        vin: "1ABCDEFGHJKLMNPRS".to_string(),
        rental_start: (status == VehicleStatus::Rented).then_some(now),
        rental_end: None,
        last_updated: now,
    }
}

/// Almacén que siempre falla, para probar la degradación a vacío
pub struct FailingStore;

#[async_trait]
impl FleetStore for FailingStore {
    async fn query_by_zip(&self, _zip: &str, _status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        Err(AppError::Store("connection refused".to_string()))
    }

    async fn scan(&self, _filter: &VehicleFilter, _limit: usize) -> AppResult<Vec<Vehicle>> {
        Err(AppError::Store("connection refused".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }
}
