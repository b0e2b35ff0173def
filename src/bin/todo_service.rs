//! Todo service: per-user todo CRUD behind bearer-token authentication

use todo_services::app;
use todo_services::config::{ServiceConfig, ServiceKind};
use todo_services::server::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("todo-service failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ServiceConfig::load(ServiceKind::Todo)?;
    let store = app::open_todo_store(&config).await?;

    app::todo_service(&config, store)
        .serve(&config.addr())
        .await
}
