//! Domain WHOIS - registration dates and registrar details over WHOIS
//!
//! Normalizes arbitrary user input to a registrable domain, picks the
//! authoritative WHOIS server for its TLD (falling back to root referrals),
//! and maps the registry's answer onto a [`DomainRecord`].

pub mod domain;
pub mod error;
pub mod types;
pub mod whois;

// Re-export commonly used types
pub use error::{Result, WhoisError};
pub use types::{DomainRecord, LookupConfig};

// Re-export main functionality
pub use domain::{get_domain_info, get_raw_whois, normalize_domain, WhoisLookup};
pub use whois::{update_whois_servers, ServerConfig, ServerRegistry, WhoisTransport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
