//! Deserialización tolerante de argumentos de tools
//!
//! Los agentes mandan a veces números como strings ("7") o ZIPs como números
//! (90001); estos helpers aceptan ambas formas.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::errors::{AppError, AppResult};

/// `Option<String>` que acepta strings, números o null; strings vacíos = None
pub fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a string, got {}", other))),
    }
}

/// Entero opcional que acepta números o strings numéricos
pub fn optional_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let raw = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", n)))?,
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, got '{}'", s)))?,
        Some(other) => {
            return Err(D::Error::custom(format!("expected an integer, got {}", other)))
        }
    };

    T::try_from(raw)
        .map(Some)
        .map_err(|_| D::Error::custom(format!("integer {} out of range", raw)))
}

/// Parsear los argumentos JSON de una tool en su struct de request
pub fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> AppResult<T> {
    let args = match args {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(args).map_err(|e| AppError::BadRequest(format!("Invalid arguments: {}", e)))
}

/// Exigir un argumento obligatorio
pub fn required<'a>(value: &'a Option<String>, name: &str) -> AppResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| AppError::BadRequest(format!("{} parameter is required", name)))
}
