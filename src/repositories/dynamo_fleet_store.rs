//! Backend DynamoDB del almacén de flota
//!
//! Query sobre el GSI `zip_code-index` (partition key `zip_code`, sort key
//! `status`) y scan con `FilterExpression`. También expone las escrituras que
//! usa el loader de datos sintéticos (vaciado y batch writes).

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::fleet_store::{FleetStore, VehicleFilter};
use crate::config::database::DatabaseConfig;
use crate::models::vehicle::{parse_timestamp, Vehicle, VehicleStatus};
use crate::utils::errors::{AppError, AppResult};

/// Máximo de operaciones por `BatchWriteItem`
const BATCH_WRITE_SIZE: usize = 25;
/// Reintentos de items no procesados antes de abortar
const MAX_UNPROCESSED_RETRIES: u32 = 8;
const RETRY_BASE_DELAY_MS: u64 = 50;

pub type Item = HashMap<String, AttributeValue>;

#[derive(Clone)]
pub struct DynamoFleetStore {
    client: Client,
    table_name: String,
    zip_index: String,
}

impl DynamoFleetStore {
    pub fn new(client: Client, config: &DatabaseConfig) -> Self {
        Self {
            client,
            table_name: config.table_name.clone(),
            zip_index: config.zip_index.clone(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Borrar todos los registros (scan paginado de claves + batch deletes)
    pub async fn delete_all(&self) -> AppResult<usize> {
        let mut deleted = 0;
        let mut start_key: Option<Item> = None;

        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression("vehicle_id")
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| store_error("scanning keys", e))?;

            let requests = page
                .items()
                .iter()
                .filter_map(|item| item.get("vehicle_id").cloned())
                .map(|id| {
                    DeleteRequest::builder()
                        .key("vehicle_id", id)
                        .build()
                        .map(|delete| WriteRequest::builder().delete_request(delete).build())
                        .map_err(|e| AppError::Store(format!("Invalid delete request: {}", e)))
                })
                .collect::<AppResult<Vec<_>>>()?;

            deleted += requests.len();
            self.write_batches(requests).await?;

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        info!("🗑️ Deleted {} records from {}", deleted, self.table_name);
        Ok(deleted)
    }

    /// Escribir vehículos en lotes de 25
    pub async fn put_vehicles(&self, vehicles: &[Vehicle]) -> AppResult<()> {
        let requests = vehicles
            .iter()
            .map(|vehicle| {
                PutRequest::builder()
                    .set_item(Some(vehicle_to_item(vehicle)))
                    .build()
                    .map(|put| WriteRequest::builder().put_request(put).build())
                    .map_err(|e| AppError::Store(format!("Invalid put request: {}", e)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        self.write_batches(requests).await
    }

    async fn write_batches(&self, requests: Vec<WriteRequest>) -> AppResult<()> {
        for chunk in requests.chunks(BATCH_WRITE_SIZE) {
            let mut pending = chunk.to_vec();
            let mut attempt = 0;

            while !pending.is_empty() {
                let output = self
                    .client
                    .batch_write_item()
                    .request_items(&self.table_name, pending)
                    .send()
                    .await
                    .map_err(|e| store_error("batch write", e))?;

                pending = output
                    .unprocessed_items()
                    .and_then(|items| items.get(&self.table_name))
                    .cloned()
                    .unwrap_or_default();

                if pending.is_empty() {
                    break;
                }
                if attempt >= MAX_UNPROCESSED_RETRIES {
                    return Err(AppError::Store(format!(
                        "{} items still unprocessed after {} retries",
                        pending.len(),
                        MAX_UNPROCESSED_RETRIES
                    )));
                }

                let delay = retry_delay(attempt);
                attempt += 1;
                debug!(
                    "🔁 Retrying {} unprocessed items in {:?} (attempt {})",
                    pending.len(),
                    delay,
                    attempt
                );
                tokio::time::sleep(delay).await;
            }
        }
        Ok(())
    }
}

/// Backoff exponencial para items no procesados, con techo de ~3 s
fn retry_delay(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS << attempt.min(6))
}

#[async_trait]
impl FleetStore for DynamoFleetStore {
    async fn query_by_zip(
        &self,
        zip_code: &str,
        status: Option<VehicleStatus>,
    ) -> AppResult<Vec<Vehicle>> {
        let key = zip_key_condition(zip_code, status);

        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.zip_index)
            .set_key_condition_expression(key.text)
            .set_expression_attribute_names(non_empty_map(key.names))
            .set_expression_attribute_values(non_empty_map(key.values))
            .send()
            .await
            .map_err(|e| store_error("querying zip_code index", e))?;

        Ok(decode_items(output.items()))
    }

    /// `contains()` de DynamoDB distingue mayúsculas, así que make/model se
    /// aplican sobre la página ya leída; category/status van en el filtro.
    async fn scan(&self, filter: &VehicleFilter, limit: usize) -> AppResult<Vec<Vehicle>> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let expression = scan_filter(filter);

        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(limit)
            .set_filter_expression(expression.text)
            .set_expression_attribute_names(non_empty_map(expression.names))
            .set_expression_attribute_values(non_empty_map(expression.values))
            .send()
            .await
            .map_err(|e| store_error("scanning fleet table", e))?;

        Ok(decode_items(output.items())
            .into_iter()
            .filter(|vehicle| filter.matches_make_and_model(vehicle))
            .collect())
    }

    fn backend_name(&self) -> &'static str {
        "dynamodb"
    }
}

/// Expresión de DynamoDB con sus alias de nombres (`#x`) y valores (`:x`)
#[derive(Debug, Default, PartialEq)]
pub struct Expression {
    pub text: Option<String>,
    pub names: HashMap<String, String>,
    pub values: Item,
}

/// Condición de clave sobre el GSI: `zip_code` y, si llega, `status`
pub fn zip_key_condition(zip_code: &str, status: Option<VehicleStatus>) -> Expression {
    let mut expression = Expression::default();
    expression
        .values
        .insert(":zip".to_string(), AttributeValue::S(zip_code.to_string()));

    let text = match status {
        Some(status) => {
            expression.names.insert("#status".to_string(), "status".to_string());
            expression
                .values
                .insert(":status".to_string(), AttributeValue::S(status.to_string()));
            "zip_code = :zip AND #status = :status"
        }
        None => "zip_code = :zip",
    };
    expression.text = Some(text.to_string());
    expression
}

/// Filtro del scan con los predicados exactos (category, status)
pub fn scan_filter(filter: &VehicleFilter) -> Expression {
    let mut expression = Expression::default();
    let mut conditions = Vec::new();

    if let Some(category) = &filter.category {
        conditions.push("category = :category");
        expression
            .values
            .insert(":category".to_string(), AttributeValue::S(category.clone()));
    }
    if let Some(status) = &filter.status {
        conditions.push("#status = :status");
        expression.names.insert("#status".to_string(), "status".to_string());
        expression
            .values
            .insert(":status".to_string(), AttributeValue::S(status.clone()));
    }

    if !conditions.is_empty() {
        expression.text = Some(conditions.join(" AND "));
    }
    expression
}

// DynamoDB rechaza mapas de alias vacíos
fn non_empty_map<K, V>(map: HashMap<K, V>) -> Option<HashMap<K, V>> {
    (!map.is_empty()).then_some(map)
}

fn store_error<E>(operation: &str, e: E) -> AppError
where
    E: std::error::Error + 'static,
{
    AppError::Store(format!("Error {}: {}", operation, DisplayErrorContext(&e)))
}

fn decode_items(items: &[Item]) -> Vec<Vehicle> {
    items
        .iter()
        .filter_map(|item| match vehicle_from_item(item) {
            Ok(vehicle) => Some(vehicle),
            Err(e) => {
                warn!("⚠️ Skipping undecodable fleet item: {}", e);
                None
            }
        })
        .collect()
}

fn get_s<'a>(item: &'a Item, key: &str) -> AppResult<&'a str> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(String::as_str)
        .ok_or_else(|| AppError::Store(format!("Missing string attribute '{}'", key)))
}

fn get_n<'a>(item: &'a Item, key: &str) -> AppResult<&'a str> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .map(String::as_str)
        .ok_or_else(|| AppError::Store(format!("Missing number attribute '{}'", key)))
}

fn get_optional_timestamp(item: &Item, key: &str) -> AppResult<Option<chrono::DateTime<chrono::Utc>>> {
    match item.get(key) {
        Some(AttributeValue::S(raw)) => parse_timestamp(raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_number<T: FromStr>(item: &Item, key: &str) -> AppResult<T> {
    let raw = get_n(item, key)?;
    raw.parse()
        .map_err(|_| AppError::Store(format!("Invalid number '{}' for '{}'", raw, key)))
}

/// Convertir un item de DynamoDB en Vehicle. `daily_rate` se parsea desde la
/// representación decimal del atributo `N`, sin pasar por float.
pub fn vehicle_from_item(item: &Item) -> AppResult<Vehicle> {
    let daily_rate_raw = get_n(item, "daily_rate")?;

    Ok(Vehicle {
        vehicle_id: get_s(item, "vehicle_id")?.to_string(),
        make: get_s(item, "make")?.to_string(),
        model: get_s(item, "model")?.to_string(),
        year: parse_number(item, "year")?,
        category: get_s(item, "category")?
            .parse()
            .map_err(|e: AppError| AppError::Store(e.detail()))?,
        status: get_s(item, "status")?
            .parse()
            .map_err(|e: AppError| AppError::Store(e.detail()))?,
        location: get_s(item, "location")?.to_string(),
        zip_code: get_s(item, "zip_code")?.to_string(),
        daily_rate: Decimal::from_str_exact(daily_rate_raw)
            .or_else(|_| Decimal::from_scientific(daily_rate_raw))
            .map_err(|e| AppError::Store(format!("Invalid daily_rate '{}': {}", daily_rate_raw, e)))?,
        mileage: parse_number(item, "mileage")?,
        license_plate: get_s(item, "license_plate")?.to_string(),
        vin: get_s(item, "vin")?.to_string(),
        rental_start: get_optional_timestamp(item, "rental_start")?,
        rental_end: get_optional_timestamp(item, "rental_end")?,
        last_updated: parse_timestamp(get_s(item, "last_updated")?)?,
    })
}

/// Convertir un Vehicle en item de DynamoDB (timestamps nulos como `NULL`)
pub fn vehicle_to_item(vehicle: &Vehicle) -> Item {
    let optional_ts = |ts: Option<chrono::DateTime<chrono::Utc>>| match ts {
        Some(ts) => AttributeValue::S(ts.to_rfc3339()),
        None => AttributeValue::Null(true),
    };

    HashMap::from([
        ("vehicle_id".to_string(), AttributeValue::S(vehicle.vehicle_id.clone())),
        ("make".to_string(), AttributeValue::S(vehicle.make.clone())),
        ("model".to_string(), AttributeValue::S(vehicle.model.clone())),
        ("year".to_string(), AttributeValue::N(vehicle.year.to_string())),
        ("category".to_string(), AttributeValue::S(vehicle.category.to_string())),
        ("status".to_string(), AttributeValue::S(vehicle.status.to_string())),
        ("location".to_string(), AttributeValue::S(vehicle.location.clone())),
        ("zip_code".to_string(), AttributeValue::S(vehicle.zip_code.clone())),
        ("daily_rate".to_string(), AttributeValue::N(vehicle.daily_rate.to_string())),
        ("mileage".to_string(), AttributeValue::N(vehicle.mileage.to_string())),
        ("license_plate".to_string(), AttributeValue::S(vehicle.license_plate.clone())),
        ("vin".to_string(), AttributeValue::S(vehicle.vin.clone())),
        ("rental_start".to_string(), optional_ts(vehicle.rental_start)),
        ("rental_end".to_string(), optional_ts(vehicle.rental_end)),
        ("last_updated".to_string(), AttributeValue::S(vehicle.last_updated.to_rfc3339())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleCategory;
    use chrono::Utc;

    fn sample_item() -> Item {
        HashMap::from([
            ("vehicle_id".to_string(), AttributeValue::S("abc-123".to_string())),
            ("make".to_string(), AttributeValue::S("Toyota".to_string())),
            ("model".to_string(), AttributeValue::S("RAV4".to_string())),
            ("year".to_string(), AttributeValue::N("2024".to_string())),
            ("category".to_string(), AttributeValue::S("suv".to_string())),
            ("status".to_string(), AttributeValue::S("rented".to_string())),
            ("location".to_string(), AttributeValue::S("Seattle, WA".to_string())),
            ("zip_code".to_string(), AttributeValue::S("98101".to_string())),
            ("daily_rate".to_string(), AttributeValue::N("64.10".to_string())),
            ("mileage".to_string(), AttributeValue::N("23456".to_string())),
            ("license_plate".to_string(), AttributeValue::S("XYZ1234".to_string())),
            ("vin".to_string(), AttributeValue::S("1ABCDEFGHJKLMNPRS".to_string())),
            (
                "rental_start".to_string(),
                AttributeValue::S("2025-06-01T10:00:00.123456".to_string()),
            ),
            ("rental_end".to_string(), AttributeValue::Null(true)),
            (
                "last_updated".to_string(),
                AttributeValue::S("2025-06-02T08:30:00".to_string()),
            ),
        ])
    }

    #[test]
    fn test_vehicle_from_item_keeps_exact_decimal() {
        let vehicle = vehicle_from_item(&sample_item()).unwrap();
        assert_eq!(vehicle.daily_rate, Decimal::from_str_exact("64.10").unwrap());
        assert_eq!(vehicle.daily_rate.to_string(), "64.10");
        assert_eq!(vehicle.category, VehicleCategory::Suv);
        assert_eq!(vehicle.status, VehicleStatus::Rented);
        assert!(vehicle.rental_start.is_some());
        assert!(vehicle.rental_end.is_none());
    }

    #[test]
    fn test_vehicle_from_item_rejects_missing_attribute() {
        let mut item = sample_item();
        item.remove("zip_code");
        assert!(vehicle_from_item(&item).is_err());
    }

    #[test]
    fn test_item_conversion_preserves_fields() {
        let mut vehicle = vehicle_from_item(&sample_item()).unwrap();
        vehicle.last_updated = Utc::now();
        let item = vehicle_to_item(&vehicle);
        assert_eq!(item.get("daily_rate"), Some(&AttributeValue::N("64.10".to_string())));
        assert_eq!(item.get("rental_end"), Some(&AttributeValue::Null(true)));
        assert_eq!(vehicle_from_item(&item).unwrap().vehicle_id, "abc-123");
    }

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    #[test]
    fn test_zip_key_condition() {
        let plain = zip_key_condition("90001", None);
        assert_eq!(plain.text.as_deref(), Some("zip_code = :zip"));
        assert!(plain.names.is_empty());
        assert_eq!(plain.values, HashMap::from([(":zip".to_string(), s("90001"))]));

        let with_status = zip_key_condition("90001", Some(VehicleStatus::Rented));
        assert_eq!(with_status.text.as_deref(), Some("zip_code = :zip AND #status = :status"));
        assert_eq!(with_status.names, HashMap::from([("#status".to_string(), "status".to_string())]));
        assert_eq!(with_status.values.get(":status"), Some(&s("rented")));
    }

    #[test]
    fn test_scan_filter_without_filters_is_empty() {
        assert_eq!(scan_filter(&VehicleFilter::default()), Expression::default());
        assert_eq!(non_empty_map(Expression::default().names), None);
    }

    #[test]
    fn test_scan_filter_joins_exact_predicates() {
        let filter = VehicleFilter::new(None, None, Some("SUV"), Some("Available"));
        let expression = scan_filter(&filter);

        assert_eq!(expression.text.as_deref(), Some("category = :category AND #status = :status"));
        assert_eq!(expression.names, HashMap::from([("#status".to_string(), "status".to_string())]));
        assert_eq!(
            expression.values,
            HashMap::from([
                (":category".to_string(), s("suv")),
                (":status".to_string(), s("available")),
            ])
        );

        let category_only = scan_filter(&VehicleFilter::new(None, None, Some("van"), None));
        assert_eq!(category_only.text.as_deref(), Some("category = :category"));
        assert!(category_only.names.is_empty());
    }

    #[test]
    fn test_scan_filter_leaves_make_and_model_to_the_client() {
        let expression = scan_filter(&VehicleFilter::new(Some("bmw"), Some("cr-v"), None, None));
        assert_eq!(expression, Expression::default());

        let mut vehicle = vehicle_from_item(&sample_item()).unwrap();
        vehicle.make = "Honda".to_string();
        vehicle.model = "CR-V".to_string();
        assert!(VehicleFilter::new(Some("HONDA"), Some("cr-v"), None, None).matches_make_and_model(&vehicle));
    }

    #[test]
    fn test_retry_delay_grows_and_is_capped() {
        assert_eq!(retry_delay(0), Duration::from_millis(50));
        assert_eq!(retry_delay(1), Duration::from_millis(100));
        assert_eq!(retry_delay(6), retry_delay(20));
        assert!(retry_delay(MAX_UNPROCESSED_RETRIES) <= Duration::from_millis(3200));
    }
}
