use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::{error, info};

use session_api::{build_router, AppState, SessionManager};
use session_core::SessionStore;
use session_infrastructure::{create_pool, MemorySessionStore, RedisSessionStore};
use session_shared::{config::AppConfig, telemetry::init_telemetry, StoreBackend};

const MEMORY_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Held for the lifetime of the process so buffered log lines get flushed
    let _log_guard = init_telemetry(&config.log)?;

    info!("Session server starting ({})...", config.app.env);
    info!("Session settings: {:?}", config.session);

    match config.store.backend {
        StoreBackend::Redis => {
            info!("Connecting to redis at {}...", config.redis.url);
            let pool = create_pool(&config.redis)?;
            let store = Arc::new(RedisSessionStore::new(pool));
            if let Err(e) = store.health_check().await {
                error!("Redis is not reachable yet: {}", e);
            }
            serve(config, store).await
        }
        StoreBackend::Memory => {
            let store = Arc::new(MemorySessionStore::new());
            spawn_purge_task(store.clone());
            serve(config, store).await
        }
    }
}

async fn serve<S: SessionStore>(config: AppConfig, store: Arc<S>) -> anyhow::Result<()> {
    let sessions = Arc::new(SessionManager::new(store, &config.session)?);
    let state = AppState {
        sessions,
        app_name: config.app.name.clone(),
    };

    // Panics become a 500 outside the session layer, after its outbound phase was skipped
    let app = build_router(state, &config.app.api_version)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive());

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_purge_task(store: Arc<MemorySessionStore>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(MEMORY_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired();
            if purged > 0 {
                info!("Purged {} expired sessions", purged);
            }
        }
    });
}
