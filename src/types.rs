//! Core types and structures for domain-whois

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Well-known root WHOIS server used for referral discovery
pub const DEFAULT_ROOT_SERVER: &str = "whois.iana.org";

/// Public source of the TLD to WHOIS server list
pub const DEFAULT_SERVERS_LIST_URL: &str =
    "https://raw.gitmirror.com/WooMai/whois-servers/master/list.txt";

/// Canonical registration record for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Normalized lookup key the record was fetched for
    pub domain: String,
    /// Server that answered the query
    pub whois_server: String,
    pub start_time: Option<NaiveDateTime>,
    pub expire_time: Option<NaiveDateTime>,
    pub registrar: Option<String>,
    pub registrar_url: Option<String>,
}

impl DomainRecord {
    /// Whole days from `now` until expiry, negative once expired
    pub fn days_until_expiry(&self, now: NaiveDateTime) -> Option<i64> {
        self.expire_time.map(|expire| (expire - now).num_days())
    }
}

/// Configuration for WHOIS lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Per-query socket timeout, applied to both root and registry queries
    pub timeout: Duration,
    pub root_server: String,
    /// Local copy of the server list written by `update_whois_servers`
    pub servers_path: PathBuf,
    pub servers_list_url: String,
    pub update_timeout: Duration,
    /// Optional JSON file of extra per-TLD overrides
    pub overrides_path: Option<PathBuf>,
    pub concurrent_lookups: usize,
    /// Remember servers discovered through root referrals
    pub cache_referrals: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            root_server: DEFAULT_ROOT_SERVER.to_string(),
            servers_path: std::env::temp_dir().join("whois-servers.txt"),
            servers_list_url: DEFAULT_SERVERS_LIST_URL.to_string(),
            update_timeout: Duration::from_secs(3),
            overrides_path: None,
            concurrent_lookups: 10,
            cache_referrals: false,
        }
    }
}

impl LookupConfig {
    /// Build a configuration from `WHOIS_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_parse::<u64>("WHOIS_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs.max(1));
        }
        if let Ok(server) = std::env::var("WHOIS_ROOT_SERVER") {
            if !server.trim().is_empty() {
                config.root_server = server.trim().to_string();
            }
        }
        if let Ok(path) = std::env::var("WHOIS_SERVERS_PATH") {
            config.servers_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("WHOIS_SERVERS_URL") {
            config.servers_list_url = url;
        }
        if let Ok(path) = std::env::var("WHOIS_OVERRIDES_PATH") {
            config.overrides_path = Some(PathBuf::from(path));
        }
        if let Some(limit) = env_parse::<usize>("WHOIS_CONCURRENCY") {
            config.concurrent_lookups = limit.max(1);
        }
        if let Ok(flag) = std::env::var("WHOIS_CACHE_REFERRALS") {
            config.cache_referrals =
                matches!(flag.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = std::env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key = %key, value = %value, "Ignoring unparseable environment variable");
            None
        }
    }
}
