//! Utilidades del sistema
//!
//! Manejo de errores compartido por toda la aplicación.

pub mod errors;
