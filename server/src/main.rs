use std::sync::Arc;

use anyhow::Context;
use todo_api::{config::Config, telemetry, AppState, MongoTodoRepository};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    telemetry::init(&config);

    let client = mongodb::Client::with_uri_str(&config.mongo_url)
        .await
        .with_context(|| format!("invalid MongoDB url {}", config.mongo_url))?;
    let todos = MongoTodoRepository::new(&client.database(&config.database));
    let state = AppState::new(Arc::new(todos), config.environment);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    tracing::info!(environment = ?config.environment, database = %config.database, "listening: http://{}", listener.local_addr()?);

    let served = todo_api::run(listener, state).await;
    client.shutdown().await;
    served.context("server error")
}
