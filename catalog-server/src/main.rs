use std::sync::Arc;

use catalog_server::{
    api, init_logger_with_file, CatalogService, Config, EventBroker, EventDispatcher, LocalIndex,
    ServerState, SurrealStore,
};
use surrealdb::engine::local::RocksDb;
use surrealdb::Surreal;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment and logging
    dotenv::dotenv().ok();
    let config = Config::from_env();
    let log_dir = if config.is_production() {
        Some(config.data_dir.clone())
    } else {
        None
    };
    init_logger_with_file(Some(&config.log_level), log_dir.as_deref());

    tracing::info!("Catalog server starting...");

    // 2. Primary store (embedded, inside the working directory)
    let db = Surreal::new::<RocksDb>(config.db_path()).await?;
    db.use_ns("catalog").use_db("catalog").await?;
    let store = Arc::new(SurrealStore::new(db));

    // 3. Search index, event broker and the catalog service
    let index = Arc::new(LocalIndex::new());
    let (broker, receivers) = EventBroker::new(config.channel_capacity);
    let catalog = Arc::new(CatalogService::new(store, index, broker.clone()));

    // 4. Rebuild the index copy before taking traffic
    catalog.warmup().await?;

    // 5. Background index synchronization
    let dispatcher = EventDispatcher::new(
        catalog.clone(),
        receivers,
        broker.shutdown_token().clone(),
    );
    let dispatcher_handle = tokio::spawn(dispatcher.run());

    // 6. HTTP server with graceful shutdown
    let state = ServerState::new(config.clone(), catalog);
    let app = api::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let shutdown_broker = broker.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            shutdown_broker.shutdown();
        })
        .await?;

    // Let the dispatcher drain before exiting
    let _ = dispatcher_handle.await;
    tracing::info!("Catalog server stopped");

    Ok(())
}
