use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use rust_recipe_client::{
    config::Config,
    api::routes::create_router,
    gateway::HttpGateway,
    model::Model,
    store::FileStore,
    ServerState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;

    let gateway = HttpGateway::from_config(&config)?;
    let store = FileStore::new(&config.data_dir);
    info!("Storing bookmarks under {}", config.data_dir.display());

    // Create application state
    let model = Model::new(Arc::new(gateway), Arc::new(store), config.results_per_page);
    let server_state = ServerState {
        model: Arc::new(model),
    };

    // Build the router with routes
    let app = create_router(server_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
