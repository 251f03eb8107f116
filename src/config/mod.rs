//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del almacén DynamoDB, variables de entorno
//! y otras configuraciones del sistema.

pub mod database;
pub mod environment;

pub use environment::*;
