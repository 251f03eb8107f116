use async_trait::async_trait;
use serde_json::Value;

use super::{Tool, ToolMetadata, ToolParameter};
use crate::dto::args::{parse_args, required};
use crate::dto::fleet_dto::{GeneralSearchRequest, SummaryRequest, ZipSearchRequest};
use crate::services::FleetQueryService;
use crate::utils::errors::AppResult;

const STATUS_DESCRIPTION: &str = "Optional status filter ('available', 'rented', 'maintenance')";

pub struct SearchFleetByZipTool {
    service: FleetQueryService,
}

impl SearchFleetByZipTool {
    pub fn new(service: FleetQueryService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchFleetByZipTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "search_fleet_by_zip".to_string(),
            description: "Search the rental fleet at one specific ZIP code location. Only use when the user gives a ZIP code.".to_string(),
            parameters: vec![
                ToolParameter::required("zip_code", "string", "ZIP code (e.g., '90001', '10001')"),
                ToolParameter::optional("status", "string", STATUS_DESCRIPTION),
            ],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: ZipSearchRequest = parse_args(args)?;
        let zip_code = required(&request.zip_code, "zip_code")?;

        let response = self
            .service
            .search_by_zip(zip_code, request.status.as_deref())
            .await;
        Ok(serde_json::to_value(response)?)
    }
}

pub struct SearchVehiclesGeneralTool {
    service: FleetQueryService,
}

impl SearchVehiclesGeneralTool {
    pub fn new(service: FleetQueryService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for SearchVehiclesGeneralTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "search_vehicles_general".to_string(),
            description: "Search the fleet across all locations by make, model or category. Use for questions without a ZIP code.".to_string(),
            parameters: vec![
                ToolParameter::optional("make", "string", "Vehicle make (e.g., 'Toyota', 'Honda', 'Ford')"),
                ToolParameter::optional("model", "string", "Vehicle model (e.g., 'Camry', 'CR-V', 'Mustang')"),
                ToolParameter::optional("category", "string", "Vehicle category (e.g., 'Sedan', 'SUV', 'Sports', 'Electric')"),
                ToolParameter::optional("status", "string", STATUS_DESCRIPTION),
            ],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: GeneralSearchRequest = parse_args(args)?;

        let response = self
            .service
            .search_general(
                request.make.as_deref(),
                request.model.as_deref(),
                request.category.as_deref(),
                request.status.as_deref(),
            )
            .await;
        Ok(serde_json::to_value(response)?)
    }
}

pub struct FleetSummaryTool {
    service: FleetQueryService,
}

impl FleetSummaryTool {
    pub fn new(service: FleetQueryService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Tool for FleetSummaryTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            name: "get_fleet_summary".to_string(),
            description: "Fleet statistics for a ZIP code: counts by status and category, average daily rate.".to_string(),
            parameters: vec![ToolParameter::required("zip_code", "string", "ZIP code (e.g., '90001')")],
        }
    }

    async fn execute(&self, args: Value) -> AppResult<Value> {
        let request: SummaryRequest = parse_args(args)?;
        let zip_code = required(&request.zip_code, "zip_code")?;

        Ok(serde_json::to_value(self.service.get_summary(zip_code).await)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleStatus;
    use crate::repositories::memory_fleet_store::InMemoryFleetStore;
    use crate::repositories::FleetRepository;
    use crate::test_support::sample_vehicle;
    use crate::utils::errors::AppError;
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> FleetQueryService {
        let store = Arc::new(InMemoryFleetStore::with_vehicles(vec![
            sample_vehicle("v-1", "90001", VehicleStatus::Available, "45.00"),
            sample_vehicle("v-2", "90001", VehicleStatus::Rented, "55.50"),
        ]));
        FleetQueryService::new(FleetRepository::new(store, 100))
    }

    #[tokio::test]
    async fn test_zip_tool_accepts_numeric_zip() {
        let tool = SearchFleetByZipTool::new(service());
        let result = tool.execute(json!({"zip_code": 90001})).await.unwrap();
        assert_eq!(result["count"], json!(2));
        assert_eq!(result["vehicles"][0]["daily_rate"].as_f64(), Some(45.0));
    }

    #[tokio::test]
    async fn test_zip_tool_requires_zip() {
        let tool = SearchFleetByZipTool::new(service());
        let err = tool.execute(json!({"status": "available"})).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.detail(), "zip_code parameter is required");
    }

    #[tokio::test]
    async fn test_summary_tool_shape() {
        let tool = FleetSummaryTool::new(service());
        let result = tool.execute(json!({"zip_code": "90001"})).await.unwrap();
        assert_eq!(result["total_vehicles"], json!(2));
        assert_eq!(result["rented"], json!(1));
        assert_eq!(result["avg_daily_rate"].as_f64(), Some(50.25));

        let missing = tool.execute(json!({"zip_code": "00000"})).await.unwrap();
        assert_eq!(missing, json!({"error": "No vehicles found for 00000"}));
    }

    #[tokio::test]
    async fn test_general_tool_without_filters() {
        let tool = SearchVehiclesGeneralTool::new(service());
        let result = tool.execute(Value::Null).await.unwrap();
        assert_eq!(result["count"], json!(2));
        assert_eq!(result["locations_found"], json!(1));
    }
}
