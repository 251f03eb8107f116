//! Repositorios
//!
//! Acceso al inventario de la flota: el trait del almacén, sus backends
//! (DynamoDB y memoria) y el adaptador de lectura que consumen los servicios.

pub mod dynamo_fleet_store;
pub mod fleet_repository;
pub mod fleet_store;
pub mod memory_fleet_store;

pub use fleet_repository::FleetRepository;
pub use fleet_store::{FleetStore, VehicleFilter};
