//! Modelos del sistema
//!
//! Registro de vehículo del inventario de la flota.

pub mod vehicle;

pub use vehicle::{Vehicle, VehicleCategory, VehicleStatus};
