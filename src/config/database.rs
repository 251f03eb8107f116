//! Configuración de base de datos
//!
//! Este módulo maneja la configuración del cliente DynamoDB del inventario.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::Client;

use super::environment::EnvironmentConfig;

/// Configuración de la tabla de inventario
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub region: Option<String>,
    pub table_name: String,
    pub zip_index: String,
    pub scan_limit: usize,
}

impl DatabaseConfig {
    pub fn from_environment(config: &EnvironmentConfig) -> Self {
        Self {
            region: config.aws_region.clone(),
            table_name: config.fleet_table_name.clone(),
            zip_index: config.fleet_zip_index.clone(),
            scan_limit: config.fleet_scan_limit.max(1) as usize,
        }
    }

    /// Crear un cliente DynamoDB con la cadena de credenciales por defecto
    pub async fn create_client(&self) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;
        Client::new(&sdk_config)
    }
}
