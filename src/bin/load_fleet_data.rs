//! Carga la flota sintética en la tabla DynamoDB
//!
//! Vacía la tabla y escribe, ZIP por ZIP, entre 15 y 30 vehículos generados.
//! `FLEET_SEED` hace la carga reproducible.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fleet_demand::config::database::DatabaseConfig;
use fleet_demand::config::EnvironmentConfig;
use fleet_demand::repositories::dynamo_fleet_store::DynamoFleetStore;
use fleet_demand::seed::{generate_zip_batch, CITIES};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🚗 Fleet data loader - DynamoDB");
    info!("================================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;
    let db_config = DatabaseConfig::from_environment(&config);
    let store = DynamoFleetStore::new(db_config.create_client().await, &db_config);
    info!("📦 Target table: {}", store.table_name());

    let deleted = store
        .delete_all()
        .await
        .context("failed to clear existing fleet data")?;
    if deleted > 0 {
        warn!("🧹 Removed {} existing vehicles", deleted);
    }

    let mut rng = StdRng::seed_from_u64(config.fleet_seed);
    let now = chrono::Utc::now();
    let mut total = 0usize;

    for city in CITIES.iter() {
        info!("🏙️ {}", city.location());
        for zip_code in city.zip_codes {
            let batch = generate_zip_batch(&mut rng, city, zip_code, now);
            store
                .put_vehicles(&batch)
                .await
                .with_context(|| format!("failed to load vehicles for {}", zip_code))?;
            info!("   ✅ {}: {} vehicles", zip_code, batch.len());
            total += batch.len();
        }
    }

    info!(
        "✅ Loaded {} vehicles across {} locations",
        total,
        CITIES.iter().map(|c| c.zip_codes.len()).sum::<usize>()
    );
    Ok(())
}
