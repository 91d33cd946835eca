//! WHOIS protocol plumbing: transport, server registry, referral discovery
//! and response normalization.

pub mod client;
pub mod config;
pub mod parser;
pub mod referral;
pub mod registrars;
pub mod registry;
pub mod servers;
pub mod time;

// Re-export main functionality
pub use client::TcpWhoisClient;
pub use config::{ServerConfig, ServerOverride};
pub use parser::parse_whois_raw;
pub use referral::RootReferralResolver;
pub use registrars::RegistrarTable;
pub use registry::ServerRegistry;
pub use servers::{load_server_list, update_whois_servers};

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for sending a raw WHOIS query to a server
#[async_trait]
pub trait WhoisTransport: Send + Sync {
    /// Send `query` to `server` and return the full response text.
    ///
    /// The whole exchange is bounded by `timeout`; failures surface as
    /// transport errors and are never retried.
    async fn query(&self, server: &str, query: &str, timeout: Duration) -> Result<String>;
}
