//! Node Configuration
//!
//! One binary runs every role of the shop. The subcommand picks the role; every
//! option can also be given through the environment, so a container only needs
//! its variables set.

use crate::cache::result_cache::DEFAULT_CAPACITY;
use crate::error::ShopResult;
use crate::replication::policy::RetryPolicy;
use crate::replication::types::NodeRole;

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "bazaar-node", about = "Replicated book shop node")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Client-facing gateway with the read-through cache.
    Gateway(GatewayConfig),
    /// Catalog replica.
    Catalog(CatalogConfig),
    /// Order replica.
    Order(OrderConfig),
}

#[derive(Args, Debug, Clone)]
pub struct GatewayConfig {
    #[arg(long, env = "GATEWAY_BIND", default_value = "0.0.0.0:9000")]
    pub bind: SocketAddr,

    /// Catalog replica base URLs; the first one is the primary.
    #[arg(
        long = "catalog-replica",
        env = "CATALOG_REPLICAS",
        value_delimiter = ',',
        required = true
    )]
    pub catalog_replicas: Vec<String>,

    /// Order replica base URLs; the first one is the primary.
    #[arg(
        long = "order-replica",
        env = "ORDER_REPLICAS",
        value_delimiter = ',',
        required = true
    )]
    pub order_replicas: Vec<String>,

    #[arg(long, env = "CACHE_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub cache_capacity: usize,

    /// Budget of every downstream call (ms).
    #[arg(long, env = "DOWNSTREAM_TIMEOUT_MS", default_value_t = 5_000)]
    pub timeout_ms: u64,
}

/// Propagation settings shared by both replicated stores.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    #[arg(long, env = "SYNC_ATTEMPTS", default_value_t = 3)]
    pub sync_attempts: u32,

    /// Backoff after the first failed attempt; doubles on every retry (ms).
    #[arg(long, env = "SYNC_BASE_DELAY_MS", default_value_t = 500)]
    pub sync_base_delay_ms: u64,

    /// Budget of every downstream call (ms).
    #[arg(long, env = "DOWNSTREAM_TIMEOUT_MS", default_value_t = 5_000)]
    pub timeout_ms: u64,
}

impl SyncArgs {
    pub fn retry_policy(&self) -> ShopResult<RetryPolicy> {
        RetryPolicy::new(
            self.sync_attempts,
            Duration::from_millis(self.sync_base_delay_ms),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SyncArgs {
    fn default() -> Self {
        Self {
            sync_attempts: 3,
            sync_base_delay_ms: 500,
            timeout_ms: 5_000,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CatalogConfig {
    #[arg(long, env = "CATALOG_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    #[arg(long, env = "NODE_ROLE", value_enum)]
    pub role: NodeRole,

    /// Base URL of the catalog secondary (primary only).
    #[arg(long, env = "SECONDARY_URL")]
    pub secondary_url: Option<String>,

    /// Base URL of the gateway receiving invalidations (primary only).
    #[arg(long, env = "GATEWAY_URL")]
    pub gateway_url: Option<String>,

    /// JSON array of books to seed the store with.
    #[arg(long, env = "CATALOG_DATA")]
    pub data: Option<PathBuf>,

    #[command(flatten)]
    pub sync: SyncArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OrderConfig {
    #[arg(long, env = "ORDER_BIND", default_value = "0.0.0.0:8081")]
    pub bind: SocketAddr,

    #[arg(long, env = "NODE_ROLE", value_enum)]
    pub role: NodeRole,

    /// Base URL of the order secondary (primary only).
    #[arg(long, env = "SECONDARY_URL")]
    pub secondary_url: Option<String>,

    /// Base URL of the catalog primary (primary only).
    #[arg(long, env = "CATALOG_URL")]
    pub catalog_url: Option<String>,

    #[command(flatten)]
    pub sync: SyncArgs,
}
