//! User service: registration, login and token issuance

use todo_services::app;
use todo_services::config::{ServiceConfig, ServiceKind};
use todo_services::server::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!("user-service failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ServiceConfig::load(ServiceKind::User)?;
    let store = app::open_user_store(&config).await?;

    app::user_service(&config, store)
        .serve(&config.addr())
        .await
}
