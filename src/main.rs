use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_demand::config::EnvironmentConfig;
use fleet_demand::routes::create_router;
use fleet_demand::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🚗 Fleet Demand Assistant - API");
    info!("================================");

    let config = EnvironmentConfig::from_env()?;
    let addr: SocketAddr = config.server_url().parse()?;

    let app_state = match AppState::from_environment(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("❌ Error inicializando el estado de la aplicación: {}", e);
            return Err(anyhow::anyhow!("Error de inicialización: {}", e));
        }
    };

    info!("🧰 {} tools registradas", app_state.tools.tool_names().len());
    let app = create_router(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🚙 Flota:");
    info!("   GET  /api/fleet/zip/:zip_code?status= - Vehículos por ZIP");
    info!("   GET  /api/fleet/search?make&model&category&status - Búsqueda general");
    info!("   GET  /api/fleet/summary/:zip_code - Resumen por ZIP");
    info!("🔧 Tools:");
    info!("   GET  /api/tools - Listar tools");
    info!("   POST /api/tools/:name - Invocar tool en proceso");
    info!("🛰️ Gateway:");
    info!("   POST /api/gateway/invoke - Sobre remoto {{statusCode, body}}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
