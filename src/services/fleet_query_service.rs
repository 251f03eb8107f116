//! Servicio de consultas de flota
//!
//! Búsqueda por ZIP, búsqueda general entre ubicaciones y resumen estadístico
//! por ZIP, sobre el adaptador de lectura del inventario.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::dto::fleet_dto::{
    FleetSummary, FleetSummaryResponse, GeneralSearchResponse, GeneralSearchResult,
    NoVehiclesResponse, ZipSearchResponse, ZipSearchResult,
};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::repositories::FleetRepository;

#[derive(Clone)]
pub struct FleetQueryService {
    repository: FleetRepository,
}

impl FleetQueryService {
    pub fn new(repository: FleetRepository) -> Self {
        Self { repository }
    }

    pub async fn search_by_zip(&self, zip_code: &str, status: Option<&str>) -> ZipSearchResponse {
        log::info!("🔍 Fleet search by zip {} (status: {:?})", zip_code, status);
        let vehicles = self.repository.query_by_zip(zip_code, status).await;

        match vehicles.first() {
            None => ZipSearchResponse::Empty(NoVehiclesResponse::new(format!(
                "No vehicles found for {}",
                zip_code
            ))),
            Some(first) => ZipSearchResponse::Found(ZipSearchResult {
                zip_code: zip_code.to_string(),
                location: first.location.clone(),
                count: vehicles.len(),
                vehicles,
            }),
        }
    }

    pub async fn search_general(
        &self,
        make: Option<&str>,
        model: Option<&str>,
        category: Option<&str>,
        status: Option<&str>,
    ) -> GeneralSearchResponse {
        let vehicles = self
            .repository
            .scan_with_filters(make, model, category, status)
            .await;

        if vehicles.is_empty() {
            let terms = [("make", make), ("model", model), ("category", category), ("status", status)]
                .into_iter()
                .filter_map(|(label, value)| value.map(|v| format!("{}: {}", label, v)))
                .collect::<Vec<_>>()
                .join(", ");

            return GeneralSearchResponse::Empty(NoVehiclesResponse::new(format!(
                "No vehicles found matching {}",
                terms
            )));
        }

        let by_location = group_by_location(&vehicles);
        log::info!(
            "🚗 General search matched {} vehicles in {} locations",
            vehicles.len(),
            by_location.len()
        );

        GeneralSearchResponse::Found(GeneralSearchResult {
            count: vehicles.len(),
            locations_found: by_location.len(),
            vehicles,
            by_location,
        })
    }

    pub async fn get_summary(&self, zip_code: &str) -> FleetSummaryResponse {
        let vehicles = self.repository.query_by_zip(zip_code, None).await;

        match summarize(zip_code, &vehicles) {
            Some(summary) => FleetSummaryResponse::Summary(summary),
            None => FleetSummaryResponse::Missing {
                error: format!("No vehicles found for {}", zip_code),
            },
        }
    }
}

fn group_by_location(vehicles: &[Vehicle]) -> BTreeMap<String, Vec<Vehicle>> {
    let mut by_location: BTreeMap<String, Vec<Vehicle>> = BTreeMap::new();
    for vehicle in vehicles {
        by_location
            .entry(vehicle.location.clone())
            .or_default()
            .push(vehicle.clone());
    }
    by_location
}

/// Resumen de una ZIP; `None` si no hay vehículos
pub fn summarize(zip_code: &str, vehicles: &[Vehicle]) -> Option<FleetSummary> {
    let first = vehicles.first()?;

    let count_status = |status: VehicleStatus| vehicles.iter().filter(|v| v.status == status).count();

    let mut categories = BTreeMap::new();
    for vehicle in vehicles {
        *categories.entry(vehicle.category.to_string()).or_insert(0) += 1;
    }

    Some(FleetSummary {
        zip_code: zip_code.to_string(),
        location: first.location.clone(),
        total_vehicles: vehicles.len(),
        available: count_status(VehicleStatus::Available),
        rented: count_status(VehicleStatus::Rented),
        maintenance: count_status(VehicleStatus::Maintenance),
        categories,
        avg_daily_rate: average_rate(vehicles),
    })
}

/// Media aritmética exacta, redondeo bancario a 2 decimales
pub fn average_rate(vehicles: &[Vehicle]) -> Decimal {
    if vehicles.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = vehicles.iter().map(|v| v.daily_rate).sum();
    (total / Decimal::from(vehicles.len()))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleCategory;
    use crate::repositories::memory_fleet_store::InMemoryFleetStore;
    use crate::seed::generate_fleet;
    use crate::test_support::sample_vehicle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn service(vehicles: Vec<Vehicle>) -> FleetQueryService {
        let store = Arc::new(InMemoryFleetStore::with_vehicles(vehicles));
        FleetQueryService::new(FleetRepository::new(store, 100))
    }

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str_exact(raw).unwrap()
    }

    #[tokio::test]
    async fn test_search_by_zip_empty_shape() {
        let response = service(Vec::new()).search_by_zip("99999", None).await;
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"message": "No vehicles found for 99999", "vehicles": []})
        );
    }

    #[tokio::test]
    async fn test_search_by_zip_found() {
        let svc = service(vec![
            sample_vehicle("a", "90001", VehicleStatus::Available, "45.00"),
            sample_vehicle("b", "90001", VehicleStatus::Maintenance, "47.50"),
        ]);
        match svc.search_by_zip("90001", Some("maintenance")).await {
            ZipSearchResponse::Found(result) => {
                assert_eq!(result.count, 1);
                assert_eq!(result.location, "City 90, ST");
                assert_eq!(result.vehicles[0].vehicle_id, "b");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_summary_counts_add_up() {
        let mut rng = StdRng::seed_from_u64(3);
        let fleet = generate_fleet(&mut rng, chrono::Utc::now());
        let svc = service(fleet.clone());

        for zip in ["90001", "10005", "02108"] {
            let expected: Vec<_> = fleet.iter().filter(|v| v.zip_code == zip).cloned().collect();
            match svc.get_summary(zip).await {
                FleetSummaryResponse::Summary(summary) => {
                    assert_eq!(summary.total_vehicles, expected.len());
                    assert_eq!(
                        summary.available + summary.rented + summary.maintenance,
                        summary.total_vehicles
                    );
                    assert_eq!(summary.categories.values().sum::<usize>(), summary.total_vehicles);

                    let sum: Decimal = expected.iter().map(|v| v.daily_rate).sum();
                    let mean = (sum / Decimal::from(expected.len()))
                        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
                    assert_eq!(summary.avg_daily_rate, mean);
                }
                other => panic!("unexpected response: {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_summary_missing_zip() {
        let response = service(Vec::new()).get_summary("00000").await;
        assert_eq!(
            response,
            FleetSummaryResponse::Missing {
                error: "No vehicles found for 00000".to_string()
            }
        );
    }

    #[test]
    fn test_average_rate_is_exact() {
        let vehicles = vec![
            sample_vehicle("a", "90001", VehicleStatus::Available, "0.10"),
            sample_vehicle("b", "90001", VehicleStatus::Available, "0.20"),
            sample_vehicle("c", "90001", VehicleStatus::Available, "0.30"),
        ];
        assert_eq!(average_rate(&vehicles), dec("0.20"));

        let vehicles = vec![
            sample_vehicle("a", "90001", VehicleStatus::Available, "45.00"),
            sample_vehicle("b", "90001", VehicleStatus::Available, "45.01"),
            sample_vehicle("c", "90001", VehicleStatus::Available, "45.01"),
        ];
        // 135.02 / 3 = 45.00666...
        assert_eq!(average_rate(&vehicles), dec("45.01"));
    }

    #[tokio::test]
    async fn test_general_search_groups_by_location() {
        let mut rng = StdRng::seed_from_u64(5);
        let svc = service(generate_fleet(&mut rng, chrono::Utc::now()));

        match svc.search_general(None, None, Some("SUV"), None).await {
            GeneralSearchResponse::Found(result) => {
                assert_eq!(result.count, result.vehicles.len());
                assert_eq!(result.locations_found, result.by_location.len());
                assert!(result.vehicles.iter().all(|v| v.category == VehicleCategory::Suv));

                let mut flattened: Vec<_> = result
                    .by_location
                    .values()
                    .flatten()
                    .map(|v| v.vehicle_id.clone())
                    .collect();
                let mut flat: Vec<_> = result.vehicles.iter().map(|v| v.vehicle_id.clone()).collect();
                flattened.sort();
                flat.sort();
                assert_eq!(flattened, flat);

                for (location, vehicles) in &result.by_location {
                    assert!(vehicles.iter().all(|v| &v.location == location));
                }
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_general_search_empty_lists_terms() {
        let response = service(Vec::new())
            .search_general(Some("Lada"), None, None, Some("available"))
            .await;
        assert_eq!(
            response,
            GeneralSearchResponse::Empty(NoVehiclesResponse::new(
                "No vehicles found matching make: Lada, status: available".to_string()
            ))
        );
    }
}
