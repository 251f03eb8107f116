//! Conexión al almacén de flota
//!
//! Construye el backend configurado (DynamoDB o memoria sembrada) detrás de
//! `Arc<dyn FleetStore>`.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::config::environment::{EnvironmentConfig, StoreBackend};
use crate::repositories::dynamo_fleet_store::DynamoFleetStore;
use crate::repositories::fleet_store::FleetStore;
use crate::repositories::memory_fleet_store::InMemoryFleetStore;
use crate::seed::generate_fleet;

pub struct DatabaseConnection {
    store: Arc<dyn FleetStore>,
    scan_limit: usize,
}

impl DatabaseConnection {
    pub fn new(store: Arc<dyn FleetStore>, scan_limit: usize) -> Self {
        Self {
            store,
            scan_limit: scan_limit.max(1),
        }
    }

    pub async fn from_environment(config: &EnvironmentConfig) -> Self {
        let db_config = DatabaseConfig::from_environment(config);

        let store: Arc<dyn FleetStore> = match config.store_backend {
            StoreBackend::DynamoDb => {
                info!(
                    "🗄️ Using DynamoDB table '{}' (index '{}')",
                    db_config.table_name, db_config.zip_index
                );
                let client = db_config.create_client().await;
                Arc::new(DynamoFleetStore::new(client, &db_config))
            }
            StoreBackend::Memory => {
                let mut rng = StdRng::seed_from_u64(config.fleet_seed);
                let vehicles = generate_fleet(&mut rng, chrono::Utc::now());
                info!(
                    "🧪 Using in-memory fleet store seeded with {} vehicles (seed {})",
                    vehicles.len(),
                    config.fleet_seed
                );
                Arc::new(InMemoryFleetStore::with_vehicles(vehicles))
            }
        };

        Self {
            store,
            scan_limit: db_config.scan_limit,
        }
    }

    pub fn store(&self) -> Arc<dyn FleetStore> {
        self.store.clone()
    }

    pub fn scan_limit(&self) -> usize {
        self.scan_limit
    }
}
