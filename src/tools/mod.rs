//! Tools invocables por el agente
//!
//! Cada tool expone metadatos (nombre, descripción, parámetros) y se ejecuta
//! con un objeto JSON de argumentos. El registro resuelve nombre -> tool y
//! sirve tanto a la invocación en proceso como al sobre remoto del gateway.

pub mod fleet_tools;
pub mod registry;
pub mod signal_tools;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::utils::errors::AppResult;

pub use registry::ToolRegistry;

/// Definición de un parámetro de tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: String,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    pub fn required(name: &str, param_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: true,
        }
    }

    pub fn optional(name: &str, param_type: &str, description: &str) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }
}

/// Metadatos de una tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolMetadata {
    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

impl fmt::Display for ToolMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// Una tool invocable.
///
/// Los errores de argumentos se devuelven como `Err`; los fallos de las APIs
/// externas se devuelven como datos (`{error, ...}`) dentro del `Ok`.
#[async_trait]
pub trait Tool: Send + Sync {
    fn metadata(&self) -> ToolMetadata;

    async fn execute(&self, args: Value) -> AppResult<Value>;
}
