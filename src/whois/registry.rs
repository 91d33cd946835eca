//! Server configuration registry.
//!
//! The TLD to [`ServerConfig`] map is built lazily, exactly once, from the
//! server list plus overrides, and is read-only afterwards. TLDs missing from
//! the map are resolved through the root referral server on every lookup
//! unless referral caching is enabled.

use crate::domain::normalizer::{encode_hostname, tld_of};
use crate::error::{Result, WhoisError};
use crate::types::LookupConfig;
use crate::whois::config::{builtin_overrides, load_overrides_file, ServerConfig, ServerOverride};
use crate::whois::referral::RootReferralResolver;
use crate::whois::servers::{bundled_server_list, load_server_list};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

type ServerLoader = Arc<dyn Fn() -> Result<HashMap<String, String>> + Send + Sync>;

/// Where the base TLD to server pairs come from
enum ServerSource {
    /// Refreshed list file if present, bundled list otherwise
    File(Option<PathBuf>),
    Static(HashMap<String, String>),
    Loader(ServerLoader),
}

pub struct ServerRegistry {
    source: ServerSource,
    overrides: Vec<ServerOverride>,
    referral: RootReferralResolver,
    cache_referrals: bool,
    configs: OnceLock<HashMap<String, ServerConfig>>,
    referrals: RwLock<HashMap<String, ServerConfig>>,
}

impl ServerRegistry {
    /// Registry over the bundled server list and built-in overrides
    pub fn new(referral: RootReferralResolver) -> Self {
        Self {
            source: ServerSource::File(None),
            overrides: builtin_overrides(),
            referral,
            cache_referrals: false,
            configs: OnceLock::new(),
            referrals: RwLock::new(HashMap::new()),
        }
    }

    /// Registry configured from a [`LookupConfig`]
    pub fn from_config(config: &LookupConfig, referral: RootReferralResolver) -> Self {
        let mut registry = Self::new(referral)
            .with_servers_path(config.servers_path.clone())
            .with_referral_cache(config.cache_referrals);

        if let Some(path) = &config.overrides_path {
            match load_overrides_file(path) {
                Ok(extra) => registry = registry.with_extra_overrides(extra),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Ignoring WHOIS overrides file"
                    );
                }
            }
        }

        registry
    }

    /// Prefer the server list stored at `path` over the bundled one
    pub fn with_servers_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = ServerSource::File(Some(path.into()));
        self
    }

    /// Use a fixed server list instead of loading one
    pub fn with_server_list(mut self, servers: HashMap<String, String>) -> Self {
        self.source = ServerSource::Static(servers);
        self
    }

    /// Load the server list with `loader` when the registry is first used
    pub fn with_server_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Result<HashMap<String, String>> + Send + Sync + 'static,
    {
        self.source = ServerSource::Loader(Arc::new(loader));
        self
    }

    /// Replace the override table
    pub fn with_overrides(mut self, overrides: Vec<ServerOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Apply `extra` after the current overrides
    pub fn with_extra_overrides(mut self, extra: Vec<ServerOverride>) -> Self {
        self.overrides.extend(extra);
        self
    }

    pub fn with_referral_cache(mut self, enabled: bool) -> Self {
        self.cache_referrals = enabled;
        self
    }

    /// Whether the TLD map has been built
    pub fn is_initialized(&self) -> bool {
        self.configs.get().is_some()
    }

    /// Static (server list plus overrides) config for a TLD key, building the map on first use
    pub fn static_config(&self, tld: &str) -> Option<ServerConfig> {
        self.configs().get(tld).cloned()
    }

    /// Resolve the query parameters for a normalized domain.
    ///
    /// Falls back to root referral discovery; fails with `UnsupportedTld`
    /// when no referral is returned.
    pub async fn get_config(&self, domain: &str) -> Result<ServerConfig> {
        let tld = tld_of(domain);

        if let Some(config) = self.static_config(tld) {
            return Ok(config);
        }
        if let Some(config) = self.cached_referral(tld) {
            tracing::debug!(tld = %tld, server = %config.whois_server, "Using cached referral");
            return Ok(config);
        }

        match self.referral.resolve(domain).await? {
            Some(server) => {
                let config = ServerConfig::generic(server);
                if self.cache_referrals {
                    self.referrals.write().insert(tld.to_string(), config.clone());
                }
                Ok(config)
            }
            None => Err(WhoisError::unsupported_tld(tld)),
        }
    }

    fn cached_referral(&self, tld: &str) -> Option<ServerConfig> {
        if !self.cache_referrals {
            return None;
        }
        self.referrals.read().get(tld).cloned()
    }

    fn configs(&self) -> &HashMap<String, ServerConfig> {
        self.configs.get_or_init(|| self.build())
    }

    fn build(&self) -> HashMap<String, ServerConfig> {
        let started = Instant::now();

        let loaded = match &self.source {
            ServerSource::File(path) => load_server_list(path.as_deref()),
            ServerSource::Static(servers) => Ok(servers.clone()),
            ServerSource::Loader(loader) => loader(),
        };
        let servers = loaded.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load WHOIS server list, using bundled list");
            bundled_server_list()
        });

        let mut configs = HashMap::with_capacity(servers.len() + self.overrides.len());
        for (tld, server) in servers {
            match encode_hostname(&tld) {
                Ok(key) => {
                    configs.insert(key, ServerConfig::generic(server));
                }
                Err(e) => tracing::warn!(tld = %tld, error = %e, "Skipping WHOIS server entry"),
            }
        }

        for over in &self.overrides {
            let key = match encode_hostname(&over.tld) {
                Ok(key) => key,
                Err(e) => {
                    tracing::warn!(tld = %over.tld, error = %e, "Skipping WHOIS override");
                    continue;
                }
            };

            let merged = match configs.get(&key) {
                Some(base) => over.apply(base),
                None => over.apply(&ServerConfig::generic(String::new())),
            };
            if merged.whois_server.is_empty() {
                tracing::warn!(tld = %over.tld, "Skipping WHOIS override without a server");
                continue;
            }
            configs.insert(key, merged);
        }

        tracing::debug!(
            tlds = configs.len(),
            duration_ms = %started.elapsed().as_millis(),
            "WHOIS server registry built"
        );
        configs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whois::WhoisTransport;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Root server stub answering every query with the same text
    struct RootStub {
        reply: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WhoisTransport for RootStub {
        async fn query(&self, _server: &str, _query: &str, _timeout: Duration) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn registry_with_root(reply: &str) -> (ServerRegistry, Arc<RootStub>) {
        let stub = Arc::new(RootStub {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        });
        let referral =
            RootReferralResolver::new(stub.clone(), "whois.iana.org", Duration::from_secs(10));
        let servers = HashMap::from([
            ("com".to_string(), "whois.verisign-grs.com".to_string()),
            ("example".to_string(), "whois.nic.example".to_string()),
            ("中国".to_string(), "cwhois.cnnic.cn".to_string()),
        ]);
        (ServerRegistry::new(referral).with_server_list(servers), stub)
    }

    #[tokio::test]
    async fn test_base_list_entry() {
        let (registry, stub) = registry_with_root("");
        assert!(!registry.is_initialized());

        let config = registry.get_config("baidu.com").await.unwrap();
        assert!(registry.is_initialized());
        assert_eq!(config, ServerConfig::generic("whois.verisign-grs.com"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_idn_tld_key() {
        let (registry, _) = registry_with_root("");
        let config = registry.get_config("xn--fiqs8s.xn--fiqs8s").await.unwrap();
        // built-in override for 中国 applies on top of the list entry
        assert_eq!(config.whois_server, "cwhois.cnnic.cn");
        assert_eq!(config.registry_time_field.as_deref(), Some("Registration Time"));
    }

    #[tokio::test]
    async fn test_partial_override_keeps_defaults() {
        let (registry, _) = registry_with_root("");
        let registry = registry
            .with_overrides(vec![ServerOverride::new("example").registrar_field("Sponsor")]);

        let config = registry.get_config("foo.example").await.unwrap();
        let base = ServerConfig::generic("whois.nic.example");
        assert_eq!(config.registrar_field.as_deref(), Some("Sponsor"));
        assert_eq!(config.whois_server, base.whois_server);
        assert_eq!(config.registry_time_field, base.registry_time_field);
        assert_eq!(config.expire_time_field, base.expire_time_field);
        assert_eq!(config.registrar_url_field, base.registrar_url_field);
        assert_eq!(config.registry_time_format, base.registry_time_format);
    }

    #[tokio::test]
    async fn test_override_for_unlisted_tld() {
        let (registry, _) = registry_with_root("");
        let registry = registry.with_overrides(vec![
            ServerOverride::new("new").whois_server("whois.nic.new").expire_time_field("Expires"),
            ServerOverride::new("orphan").registrar_field("Sponsor"),
        ]);

        let config = registry.static_config("new").unwrap();
        assert_eq!(config.whois_server, "whois.nic.new");
        assert_eq!(config.expire_time_field.as_deref(), Some("Expires"));
        assert_eq!(config.registry_time_field.as_deref(), Some("Creation Date"));
        // no server anywhere, so the entry is dropped
        assert!(registry.static_config("orphan").is_none());
    }

    #[tokio::test]
    async fn test_get_config_idempotent() {
        let (registry, _) = registry_with_root("");
        let first = registry.get_config("a.com").await.unwrap();
        let second = registry.get_config("b.com").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_root_referral_synthesizes_config() {
        let (registry, stub) = registry_with_root("refer: whois.example-registry.test\n");
        let config = registry.get_config("foo.xn--example").await.unwrap();

        assert_eq!(config, ServerConfig::generic("whois.example-registry.test"));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);

        // not cached by default: every lookup asks the root again
        registry.get_config("bar.xn--example").await.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
        assert!(registry.static_config("xn--example").is_none());
    }

    #[tokio::test]
    async fn test_referral_cache() {
        let (registry, stub) = registry_with_root("refer: whois.example-registry.test\n");
        let registry = registry.with_referral_cache(true);

        registry.get_config("foo.xn--example").await.unwrap();
        let cached = registry.get_config("bar.xn--example").await.unwrap();
        assert_eq!(cached.whois_server, "whois.example-registry.test");
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unsupported_tld() {
        let (registry, _) = registry_with_root("% This query returned 0 objects.\n");
        let err = registry.get_config("foo.zz").await.unwrap_err();
        assert!(matches!(err, WhoisError::UnsupportedTld { ref tld } if tld == "zz"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_builds_once() {
        let (registry, _) = registry_with_root("");
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let registry = Arc::new(registry.with_server_loader(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            // widen the window for racing initializers
            std::thread::sleep(Duration::from_millis(50));
            Ok(HashMap::from([("com".to_string(), "whois.verisign-grs.com".to_string())]))
        }));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.get_config(&format!("site{}.com", i)).await })
            })
            .collect();

        for handle in handles {
            let config = handle.await.unwrap().unwrap();
            assert_eq!(config.whois_server, "whois.verisign-grs.com");
        }
        assert!(registry.is_initialized());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_loader_falls_back_to_bundled() {
        let (registry, _) = registry_with_root("");
        let registry = registry.with_server_loader(|| Err(WhoisError::io("unreadable", None)));

        let config = registry.get_config("example.org").await.unwrap();
        assert_eq!(config.whois_server, "whois.pir.org");
    }
}
