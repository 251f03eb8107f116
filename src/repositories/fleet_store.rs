//! Abstracción del almacén de flota
//!
//! El adaptador recibe el almacén inyectado (`Arc<dyn FleetStore>`), así los
//! tests usan el backend en memoria y producción usa DynamoDB.

use async_trait::async_trait;

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::AppResult;

/// Filtros del scan general. Cada filtro presente es un predicado independiente
/// y se combinan con AND; los ausentes no restringen nada.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleFilter {
    /// Substring de `make`, ya normalizado a title case
    pub make: Option<String>,
    /// Substring de `model`, ya normalizado a title case
    pub model: Option<String>,
    /// Categoría exacta, en minúsculas
    pub category: Option<String>,
    /// Estado exacto, en minúsculas
    pub status: Option<String>,
}

impl VehicleFilter {
    /// Normalizar los valores recibidos de la tool
    pub fn new(
        make: Option<&str>,
        model: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
    ) -> Self {
        Self {
            make: non_empty(make).map(title_case),
            model: non_empty(model).map(title_case),
            category: non_empty(category).map(|c| c.to_lowercase()),
            status: non_empty(status).map(|s| s.to_lowercase()),
        }
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.matches_make_and_model(vehicle)
            && self
                .category
                .as_deref()
                .map_or(true, |c| vehicle.category.as_str() == c)
            && self
                .status
                .as_deref()
                .map_or(true, |s| vehicle.status.as_str() == s)
    }

    /// Containment sin distinguir mayúsculas ("cr-v" encuentra "CR-V")
    pub fn matches_make_and_model(&self, vehicle: &Vehicle) -> bool {
        contains_ignore_case(&vehicle.make, self.make.as_deref())
            && contains_ignore_case(&vehicle.model, self.model.as_deref())
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    needle.map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Title case al estilo de `str.title()`: mayúscula tras cualquier carácter
/// no alfabético ("cr-v" -> "Cr-V", "model 3" -> "Model 3")
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_alpha = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            out.push(ch);
            previous_is_alpha = false;
        }
    }

    out
}

/// Operaciones de lectura sobre el inventario
#[async_trait]
pub trait FleetStore: Send + Sync {
    /// Query exacto sobre el índice secundario (zip_code, status opcional)
    async fn query_by_zip(
        &self,
        zip_code: &str,
        status: Option<VehicleStatus>,
    ) -> AppResult<Vec<Vehicle>>;

    /// Scan acotado con filtros; devuelve como mucho `limit` registros
    async fn scan(&self, filter: &VehicleFilter, limit: usize) -> AppResult<Vec<Vehicle>>;

    /// Nombre del backend para logs
    fn backend_name(&self) -> &'static str;
}
