//! Almacén de flota en memoria
//!
//! Mismas semánticas de filtro que el backend DynamoDB. Se usa en desarrollo
//! local (sembrado con el generador de datos) y en los tests.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::fleet_store::{FleetStore, VehicleFilter};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

#[derive(Default)]
pub struct InMemoryFleetStore {
    vehicles: RwLock<Vec<Vehicle>>,
}

impl InMemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vehicles(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles: RwLock::new(vehicles),
        }
    }
}

#[async_trait]
impl FleetStore for InMemoryFleetStore {
    async fn query_by_zip(
        &self,
        zip_code: &str,
        status: Option<VehicleStatus>,
    ) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles
            .iter()
            .filter(|v| v.zip_code == zip_code)
            .filter(|v| status.map_or(true, |s| v.status == s))
            .cloned()
            .collect())
    }

    async fn scan(&self, filter: &VehicleFilter, limit: usize) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles
            .iter()
            .filter(|v| filter.matches(v))
            .take(limit)
            .cloned()
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
