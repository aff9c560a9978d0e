use carpool_server::config::AppConfig;
use carpool_server::store::MemoryTripStore;
use carpool_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "carpool_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = match &config.seed_file {
        Some(path) => {
            let store = MemoryTripStore::from_seed_file(path)?;
            info!(path = %path.display(), trips = store.trip_count().await, "seeded trip store");
            store
        }
        None => MemoryTripStore::new(),
    };

    let state = AppState::new(store, config.matcher());
    let app = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, radius_km = config.search_radius_km, "carpool server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
