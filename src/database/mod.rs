//! Módulo de base de datos
//!
//! Maneja la conexión con el almacén de inventario de la flota

pub mod connection;

pub use connection::DatabaseConnection;
