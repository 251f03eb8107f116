//! Services module
//!
//! Lógica de negocio: consultas de flota sobre el store y clientes de las
//! APIs externas de señales de demanda (festivos, eventos, vuelos, tiempo).

use std::time::Duration;

use crate::config::EnvironmentConfig;
use crate::utils::errors::{AppError, AppResult};

pub mod events_service;
pub mod fleet_query_service;
pub mod flight_service;
pub mod geocoding_service;
pub mod holiday_service;
pub mod weather_service;

pub use events_service::EventsService;
pub use fleet_query_service::FleetQueryService;
pub use flight_service::FlightService;
pub use holiday_service::HolidayService;
pub use weather_service::WeatherService;

/// Cliente HTTP compartido por servicio, con timeout fijo por llamada
pub(crate) fn build_http_client(timeout_secs: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))
}

/// Clientes de las cuatro APIs de señales, construidos desde la configuración
pub struct SignalServices {
    pub holidays: HolidayService,
    pub events: EventsService,
    pub flights: FlightService,
    pub weather: WeatherService,
}

impl SignalServices {
    pub fn from_config(config: &EnvironmentConfig) -> AppResult<Self> {
        Ok(Self {
            holidays: HolidayService::new(&config.holidays_base_url)?,
            events: EventsService::new(
                &config.ticketmaster_base_url,
                config.ticketmaster_api_key.clone(),
            )?,
            flights: FlightService::new(
                &config.aviationstack_base_url,
                config.aviationstack_api_key.clone(),
            )?,
            weather: WeatherService::new(&config.geocoding_base_url, &config.forecast_base_url)?,
        })
    }
}
