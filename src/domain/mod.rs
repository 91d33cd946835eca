//! Domain normalization and registration lookup

pub mod lookup;
pub mod normalizer;

// Re-export main functionality
pub use lookup::{build_record, normalize_url, WhoisLookup};
pub use normalizer::{normalize_domain, tld_of};

use crate::error::Result;
use crate::types::{DomainRecord, LookupConfig};
use std::sync::OnceLock;

static DEFAULT_LOOKUP: OnceLock<WhoisLookup> = OnceLock::new();

/// Process-wide lookup configured from the environment on first use
pub fn default_lookup() -> &'static WhoisLookup {
    DEFAULT_LOOKUP.get_or_init(|| WhoisLookup::with_config(LookupConfig::from_env()))
}

/// Look up a domain through the process-wide [`WhoisLookup`]
pub async fn get_domain_info(domain: &str) -> Result<Option<DomainRecord>> {
    default_lookup().get_domain_info(domain).await
}

/// Fetch raw WHOIS text through the process-wide [`WhoisLookup`]
pub async fn get_raw_whois(domain: &str) -> Result<String> {
    default_lookup().get_raw_whois(domain).await
}
