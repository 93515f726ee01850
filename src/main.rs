use bazaar_cluster::catalog::service::CatalogNode;
use bazaar_cluster::config::{Cli, Command};
use bazaar_cluster::gateway::service::Gateway;
use bazaar_cluster::orders::service::OrderNode;
use bazaar_cluster::{catalog, gateway, orders};

use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Gateway(config) => {
            tracing::info!(
                "Starting gateway: catalog replicas {:?}, order replicas {:?}, cache capacity {}",
                config.catalog_replicas,
                config.order_replicas,
                config.cache_capacity
            );
            let front = Arc::new(Gateway::from_config(&config)?);
            serve(config.bind, gateway::handlers::router(front)).await
        }
        Command::Catalog(config) => {
            tracing::info!("Starting catalog {}", config.role);
            let node = Arc::new(CatalogNode::from_config(&config)?);
            tracing::info!("Catalog holds {} books", node.store().len());
            serve(config.bind, catalog::handlers::router(node.clone())).await?;

            tracing::info!("Draining pending replication");
            node.flush_replication().await;
            Ok(())
        }
        Command::Order(config) => {
            tracing::info!("Starting order {}", config.role);
            let node = Arc::new(OrderNode::from_config(&config)?);
            serve(config.bind, orders::handlers::router(node.clone())).await?;

            tracing::info!("Draining pending replication");
            node.flush_replication().await;
            Ok(())
        }
    }
}

async fn serve(bind: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;

    tracing::info!("HTTP server listening on {}", bind);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
