use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clap::Parser;
use privat_exchange::{api::PrivatBankApi, audit::AuditLog, config::Config, handler::ExchangeHandler, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        return Err(anyhow::anyhow!("configuration error: {}", e));
    }

    let source = PrivatBankApi::new(config.upstream_url.as_str(), config.upstream_timeout())?;
    let audit = Arc::new(AuditLog::open(&config.log_file).await?);
    let handler = Arc::new(
        ExchangeHandler::new(Arc::new(source), Arc::clone(&audit))
            .with_fault_policy(config.on_transport_fault),
    );

    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        upstream = %config.upstream_url,
        log_file = %config.log_file,
        "WebSocket server started at ws://{}:{}",
        config.host,
        config.port
    );

    server::serve(listener, handler, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    })
    .await?;

    audit.close().await?;
    info!("server stopped");
    Ok(())
}
