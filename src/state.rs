//! Shared application state
//!
//! Estado compartido que se pasa a través del router de Axum: configuración,
//! servicio de consultas de flota y registros de tools.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::database::DatabaseConnection;
use crate::repositories::FleetRepository;
use crate::services::{FleetQueryService, SignalServices};
use crate::tools::ToolRegistry;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub fleet: FleetQueryService,
    /// Las siete tools, invocables en proceso
    pub tools: Arc<ToolRegistry>,
    /// Tools alojadas detrás del gateway remoto
    pub gateway_tools: Arc<ToolRegistry>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, db: &DatabaseConnection) -> AppResult<Self> {
        let fleet = FleetQueryService::new(FleetRepository::new(db.store(), db.scan_limit()));
        let signals = Arc::new(SignalServices::from_config(&config)?);

        Ok(Self {
            tools: Arc::new(ToolRegistry::full(fleet.clone(), signals.clone())),
            gateway_tools: Arc::new(ToolRegistry::remote(signals)),
            fleet,
            config,
        })
    }

    /// Construir el estado completo (store + clientes externos) desde la configuración
    pub async fn from_environment(config: EnvironmentConfig) -> AppResult<Self> {
        let db = DatabaseConnection::from_environment(&config).await;
        log::info!("🗄️ Fleet store backend: {}", db.store().backend_name());
        Self::new(config, &db)
    }
}
