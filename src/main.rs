use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use vehicle_service::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use vehicle_service::database::DatabaseConnection;
use vehicle_service::repositories::{MemoryStore, PgStore, Store};
use vehicle_service::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🔧 Vehicle Service Shop - Workflow API");
    info!("======================================");

    let config = EnvironmentConfig::from_env().context("configuración inválida")?;
    info!(
        "⚙️ Entorno: {} | tasa de impuesto por defecto: {}",
        config.environment, config.default_tax_rate
    );

    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Memory => {
            warn!("🧪 Usando almacenamiento en memoria, los datos no se persisten");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_env().context("configuración de base de datos")?;
            let connection = match DatabaseConnection::connect(&db_config).await {
                Ok(conn) => conn,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {:#}", e);
                    return Err(e);
                }
            };
            info!("✅ Base de datos lista");
            Arc::new(PgStore::new(connection.pool().clone()))
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("dirección inválida {}:{}", config.host, config.port))?;
    let app = create_app(AppState::new(store, config));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("👤 /api/customers, /api/vehicles, /api/employees");
    info!("📦 /api/inventory, /api/job-parts");
    info!("🛠️ /api/service-jobs, /api/service-requests");
    info!("💵 /api/billing");

    let server_handle = tokio::spawn(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("❌ Error del servidor: {}", e);
                e
            })
    });

    if let Err(e) = server_handle.await? {
        error!("❌ Servidor terminó con error: {}", e);
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el manejador de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el manejador de SIGTERM: {}", e);
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
