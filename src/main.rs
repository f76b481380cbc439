use std::sync::Arc;

use tournament_api_rust::store::postgres::PgStore;
use tournament_api_rust::{app, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting tournament API in {:?} mode", config.environment);

    let store = PgStore::connect(config)
        .await
        .unwrap_or_else(|e| panic!("failed to initialize store: {}", e));

    let app = app(Arc::new(store));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
