//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno: servidor, almacén de flota
//! y credenciales/URLs de las APIs externas de señales de demanda.

use std::env;
use std::str::FromStr;

use crate::utils::errors::{AppError, AppResult};

/// Placeholder que dejan las plantillas de despliegue en lugar de la clave real
pub const AVIATIONSTACK_PLACEHOLDER_KEY: &str = "your_aviationstack_api_key_here";

/// Backend del almacén de flota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(StoreBackend::DynamoDb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "FLEET_STORE_BACKEND must be 'dynamodb' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Almacén de flota
    pub aws_region: Option<String>,
    pub store_backend: StoreBackend,
    pub fleet_table_name: String,
    pub fleet_zip_index: String,
    pub fleet_scan_limit: i32,
    pub fleet_seed: u64,
    // APIs externas
    pub ticketmaster_api_key: Option<String>,
    pub aviationstack_api_key: Option<String>,
    pub holidays_base_url: String,
    pub ticketmaster_base_url: String,
    pub aviationstack_base_url: String,
    pub geocoding_base_url: String,
    pub forecast_base_url: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            aws_region: None,
            store_backend: StoreBackend::DynamoDb,
            fleet_table_name: "hertz-fleet-inventory".to_string(),
            fleet_zip_index: "zip_code-index".to_string(),
            fleet_scan_limit: 100,
            fleet_seed: 42,
            ticketmaster_api_key: None,
            aviationstack_api_key: None,
            holidays_base_url: "https://date.nager.at".to_string(),
            ticketmaster_base_url: "https://app.ticketmaster.com".to_string(),
            aviationstack_base_url: "http://api.aviationstack.com".to_string(),
            geocoding_base_url: "https://geocoding-api.open-meteo.com".to_string(),
            forecast_base_url: "https://api.open-meteo.com".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración de las variables de entorno, con valores por defecto
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env_or("ENVIRONMENT", defaults.environment),
            port: parse_env("PORT", defaults.port)?,
            host: env_or("HOST", defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            aws_region: optional_env("AWS_REGION"),
            store_backend: match optional_env("FLEET_STORE_BACKEND") {
                Some(value) => value.parse()?,
                None => defaults.store_backend,
            },
            fleet_table_name: env_or("FLEET_TABLE_NAME", defaults.fleet_table_name),
            fleet_zip_index: env_or("FLEET_ZIP_INDEX", defaults.fleet_zip_index),
            fleet_scan_limit: parse_env("FLEET_SCAN_LIMIT", defaults.fleet_scan_limit)?,
            fleet_seed: parse_env("FLEET_SEED", defaults.fleet_seed)?,
            ticketmaster_api_key: optional_env("TICKETMASTER_API_KEY"),
            aviationstack_api_key: optional_env("AVIATIONSTACK_API_KEY"),
            holidays_base_url: env_or("HOLIDAYS_BASE_URL", defaults.holidays_base_url),
            ticketmaster_base_url: env_or("TICKETMASTER_BASE_URL", defaults.ticketmaster_base_url),
            aviationstack_base_url: env_or(
                "AVIATIONSTACK_BASE_URL",
                defaults.aviationstack_base_url,
            ),
            geocoding_base_url: env_or("GEOCODING_BASE_URL", defaults.geocoding_base_url),
            forecast_base_url: env_or("FORECAST_BASE_URL", defaults.forecast_base_url),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(key: &str, default: String) -> String {
    optional_env(key).unwrap_or(default)
}

fn parse_env<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match optional_env(key) {
        Some(raw) => raw.parse().map_err(|_| {
            AppError::Configuration(format!("{} must be a valid number, got '{}'", key, raw))
        }),
        None => Ok(default),
    }
}
