//! Datos sintéticos de la flota
//!
//! Genera inventario realista para diez ciudades de EE.UU. Lo usan el binario
//! `load_fleet_data` (carga en DynamoDB) y el backend en memoria.

use chrono::{DateTime, Duration, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use uuid::Builder;

use crate::models::vehicle::{Vehicle, VehicleCategory, VehicleStatus};

pub struct City {
    pub name: &'static str,
    pub state: &'static str,
    pub zip_codes: [&'static str; 8],
}

impl City {
    pub fn location(&self) -> String {
        format!("{}, {}", self.name, self.state)
    }
}

pub static CITIES: [City; 10] = [
    City { name: "Los Angeles", state: "CA", zip_codes: ["90001", "90002", "90003", "90004", "90005", "90006", "90007", "90008"] },
    City { name: "New York", state: "NY", zip_codes: ["10001", "10002", "10003", "10004", "10005", "10006", "10007", "10008"] },
    City { name: "Chicago", state: "IL", zip_codes: ["60601", "60602", "60603", "60604", "60605", "60606", "60607", "60608"] },
    City { name: "Houston", state: "TX", zip_codes: ["77001", "77002", "77003", "77004", "77005", "77006", "77007", "77008"] },
    City { name: "Phoenix", state: "AZ", zip_codes: ["85001", "85002", "85003", "85004", "85005", "85006", "85007", "85008"] },
    City { name: "Miami", state: "FL", zip_codes: ["33101", "33102", "33109", "33125", "33126", "33127", "33128", "33129"] },
    City { name: "Atlanta", state: "GA", zip_codes: ["30301", "30302", "30303", "30304", "30305", "30306", "30307", "30308"] },
    City { name: "Seattle", state: "WA", zip_codes: ["98101", "98102", "98103", "98104", "98105", "98106", "98107", "98108"] },
    City { name: "Denver", state: "CO", zip_codes: ["80201", "80202", "80203", "80204", "80205", "80206", "80207", "80208"] },
    City { name: "Boston", state: "MA", zip_codes: ["02101", "02102", "02103", "02104", "02105", "02106", "02107", "02108"] },
];

/// Modelo del catálogo con su rango de tarifa diaria (USD)
pub struct CatalogEntry {
    pub make: &'static str,
    pub model: &'static str,
    pub year: i32,
    pub category: VehicleCategory,
    pub daily_rate: (u32, u32),
}

const fn entry(
    make: &'static str,
    model: &'static str,
    year: i32,
    category: VehicleCategory,
    daily_rate: (u32, u32),
) -> CatalogEntry {
    CatalogEntry { make, model, year, category, daily_rate }
}

pub static CATALOG: [CatalogEntry; 20] = [
    entry("Toyota", "Camry", 2024, VehicleCategory::Sedan, (45, 65)),
    entry("Honda", "Accord", 2024, VehicleCategory::Sedan, (45, 65)),
    entry("Ford", "Escape", 2024, VehicleCategory::Suv, (55, 75)),
    entry("Chevrolet", "Equinox", 2024, VehicleCategory::Suv, (55, 75)),
    entry("Nissan", "Altima", 2023, VehicleCategory::Sedan, (40, 60)),
    entry("Hyundai", "Elantra", 2024, VehicleCategory::Sedan, (35, 55)),
    entry("Jeep", "Grand Cherokee", 2024, VehicleCategory::Suv, (70, 90)),
    entry("Toyota", "RAV4", 2024, VehicleCategory::Suv, (60, 80)),
    entry("Honda", "CR-V", 2024, VehicleCategory::Suv, (60, 80)),
    entry("Ford", "Mustang", 2024, VehicleCategory::Sports, (80, 120)),
    entry("Chevrolet", "Corvette", 2024, VehicleCategory::Sports, (150, 200)),
    entry("Tesla", "Model 3", 2024, VehicleCategory::Electric, (90, 130)),
    entry("Tesla", "Model Y", 2024, VehicleCategory::Electric, (100, 140)),
    entry("Ford", "F-150", 2024, VehicleCategory::Truck, (75, 95)),
    entry("Chevrolet", "Silverado", 2024, VehicleCategory::Truck, (75, 95)),
    entry("Dodge", "Charger", 2024, VehicleCategory::Sedan, (65, 85)),
    entry("BMW", "3 Series", 2024, VehicleCategory::Luxury, (100, 150)),
    entry("Mercedes", "C-Class", 2024, VehicleCategory::Luxury, (110, 160)),
    entry("Audi", "A4", 2024, VehicleCategory::Luxury, (105, 155)),
    entry("Volkswagen", "Jetta", 2024, VehicleCategory::Sedan, (40, 60)),
];

/// 60% available, 30% rented, 10% maintenance
const STATUS_WEIGHTS: [u32; 3] = [6, 3, 1];
static PLATE_PREFIXES: [&str; 5] = ["ABC", "XYZ", "DEF", "GHI", "JKL"];
const VIN_CHARS: &[u8] = b"ABCDEFGHJKLMNPRSTUVWXYZ0123456789";

pub const MIN_VEHICLES_PER_ZIP: usize = 15;
pub const MAX_VEHICLES_PER_ZIP: usize = 30;

/// Generar un vehículo para una ZIP de la ciudad
pub fn generate_vehicle<R: Rng + ?Sized>(
    rng: &mut R,
    city: &City,
    zip_code: &str,
    now: DateTime<Utc>,
) -> Vehicle {
    let model = CATALOG.choose(rng).unwrap_or(&CATALOG[0]);
    let status = match WeightedIndex::new(STATUS_WEIGHTS) {
        Ok(weights) => VehicleStatus::ALL[weights.sample(rng)],
        Err(_) => VehicleStatus::Available,
    };

    // Tarifa en centavos para tener exactamente dos decimales
    let (low, high) = model.daily_rate;
    let cents = rng.gen_range(low * 100..=high * 100);
    let daily_rate = Decimal::new(i64::from(cents), 2);

    let plate_prefix = PLATE_PREFIXES.choose(rng).unwrap_or(&PLATE_PREFIXES[0]);
    let license_plate = format!("{}{}", plate_prefix, rng.gen_range(1000..=9999));

    let vin_tail: String = (0..16)
        .map(|_| VIN_CHARS[rng.gen_range(0..VIN_CHARS.len())] as char)
        .collect();

    let (rental_start, rental_end) = if status == VehicleStatus::Rented {
        (
            Some(now - Duration::days(rng.gen_range(1..=7))),
            Some(now + Duration::days(rng.gen_range(1..=14))),
        )
    } else {
        (None, None)
    };

    Vehicle {
        vehicle_id: Builder::from_random_bytes(rng.gen()).into_uuid().to_string(),
        make: model.make.to_string(),
        model: model.model.to_string(),
        year: model.year,
        category: model.category,
        status,
        location: city.location(),
        zip_code: zip_code.to_string(),
        daily_rate,
        mileage: rng.gen_range(5_000..=50_000),
        license_plate,
        vin: format!("1{}", vin_tail),
        rental_start,
        rental_end,
        last_updated: now,
    }
}

/// Generar entre 15 y 30 vehículos para una ZIP
pub fn generate_zip_batch<R: Rng + ?Sized>(
    rng: &mut R,
    city: &City,
    zip_code: &str,
    now: DateTime<Utc>,
) -> Vec<Vehicle> {
    let count = rng.gen_range(MIN_VEHICLES_PER_ZIP..=MAX_VEHICLES_PER_ZIP);
    (0..count)
        .map(|_| generate_vehicle(rng, city, zip_code, now))
        .collect()
}

/// Generar la flota completa de todas las ciudades
pub fn generate_fleet<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Vec<Vehicle> {
    CITIES
        .iter()
        .flat_map(|city| city.zip_codes.iter().map(move |zip| (city, *zip)))
        .flat_map(|(city, zip)| generate_zip_batch(rng, city, zip, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generated_fleet_respects_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let fleet = generate_fleet(&mut rng, now);

        let ids: HashSet<_> = fleet.iter().map(|v| v.vehicle_id.as_str()).collect();
        assert_eq!(ids.len(), fleet.len());

        for vehicle in &fleet {
            let city = CITIES
                .iter()
                .find(|c| c.zip_codes.contains(&vehicle.zip_code.as_str()))
                .expect("zip belongs to a city");
            assert_eq!(vehicle.location, city.location());
            assert_eq!(vehicle.is_rented(), vehicle.rental_start.is_some());
            assert_eq!(vehicle.daily_rate.scale(), 2);
            assert!((5_000..=50_000).contains(&vehicle.mileage));
            assert_eq!(vehicle.vin.len(), 17);
            assert!(vehicle.vin.starts_with('1'));
        }
    }

    #[test]
    fn test_zip_batch_size_and_rate_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        let city = &CITIES[7];
        let batch = generate_zip_batch(&mut rng, city, city.zip_codes[0], Utc::now());

        assert!((MIN_VEHICLES_PER_ZIP..=MAX_VEHICLES_PER_ZIP).contains(&batch.len()));
        for vehicle in &batch {
            let entry = CATALOG
                .iter()
                .find(|e| e.make == vehicle.make && e.model == vehicle.model)
                .expect("vehicle comes from the catalog");
            assert!(vehicle.daily_rate >= Decimal::from(entry.daily_rate.0));
            assert!(vehicle.daily_rate <= Decimal::from(entry.daily_rate.1));
        }
    }

    #[test]
    fn test_same_seed_same_fleet() {
        let now = Utc::now();
        let a = generate_fleet(&mut StdRng::seed_from_u64(42), now);
        let b = generate_fleet(&mut StdRng::seed_from_u64(42), now);
        assert_eq!(a, b);
    }
}
