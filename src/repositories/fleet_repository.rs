use std::sync::Arc;

use tracing::warn;

use super::fleet_store::{FleetStore, VehicleFilter};
use crate::models::vehicle::{Vehicle, VehicleStatus};

/// Adaptador de lectura del inventario.
///
/// Los errores del almacén no se propagan: se registran como warning y se
/// devuelve una secuencia vacía.
#[derive(Clone)]
pub struct FleetRepository {
    store: Arc<dyn FleetStore>,
    scan_limit: usize,
}

impl FleetRepository {
    pub fn new(store: Arc<dyn FleetStore>, scan_limit: usize) -> Self {
        Self {
            store,
            scan_limit: scan_limit.max(1),
        }
    }

    pub async fn query_by_zip(&self, zip_code: &str, status: Option<&str>) -> Vec<Vehicle> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => match raw.parse::<VehicleStatus>() {
                Ok(status) => Some(status),
                // Ningún registro puede tener un estado desconocido
                Err(_) => return Vec::new(),
            },
            None => None,
        };

        match self.store.query_by_zip(zip_code, status).await {
            Ok(vehicles) => vehicles,
            Err(e) => {
                warn!(
                    "⚠️ Error querying {} store for zip {}: {}",
                    self.store.backend_name(),
                    zip_code,
                    e
                );
                Vec::new()
            }
        }
    }

    /// Scan acotado por `scan_limit`; el resultado puede no ser completo
    pub async fn scan_with_filters(
        &self,
        make: Option<&str>,
        model: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
    ) -> Vec<Vehicle> {
        let filter = VehicleFilter::new(make, model, category, status);

        match self.store.scan(&filter, self.scan_limit).await {
            Ok(vehicles) => vehicles,
            Err(e) => {
                warn!(
                    "⚠️ Error scanning {} store with {:?}: {}",
                    self.store.backend_name(),
                    filter,
                    e
                );
                Vec::new()
            }
        }
    }
}
