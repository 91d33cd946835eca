//! Domain registration lookup over WHOIS

use crate::domain::normalizer::normalize_domain;
use crate::error::{Result, WhoisError};
use crate::types::{DomainRecord, LookupConfig};
use crate::whois::parser::parse_whois_raw;
use crate::whois::time::parse_time;
use crate::whois::{
    RegistrarTable, RootReferralResolver, ServerConfig, ServerRegistry, TcpWhoisClient,
    WhoisTransport,
};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Resolves registration dates and registrar details for domains
pub struct WhoisLookup {
    config: LookupConfig,
    transport: Arc<dyn WhoisTransport>,
    registry: ServerRegistry,
    registrars: RegistrarTable,
    semaphore: Semaphore,
}

impl WhoisLookup {
    /// Create a lookup with default configuration
    pub fn new() -> Self {
        Self::with_config(LookupConfig::default())
    }

    /// Create a lookup using the TCP transport
    pub fn with_config(config: LookupConfig) -> Self {
        Self::with_transport(config, Arc::new(TcpWhoisClient::new()))
    }

    /// Create a lookup over a custom transport
    pub fn with_transport(config: LookupConfig, transport: Arc<dyn WhoisTransport>) -> Self {
        let referral = RootReferralResolver::new(
            transport.clone(),
            config.root_server.clone(),
            config.timeout,
        );
        let registry = ServerRegistry::from_config(&config, referral);
        let semaphore = Semaphore::new(config.concurrent_lookups.max(1));

        Self {
            config,
            transport,
            registry,
            registrars: RegistrarTable::new(),
            semaphore,
        }
    }

    /// Replace the server registry
    pub fn with_registry(mut self, registry: ServerRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the registrar homepage table
    pub fn with_registrars(mut self, registrars: RegistrarTable) -> Self {
        self.registrars = registrars;
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn registry(&self) -> &ServerRegistry {
        &self.registry
    }

    /// Fetch the unparsed WHOIS response for a domain from its authoritative server
    pub async fn get_raw_whois(&self, domain: &str) -> Result<String> {
        let _permit = self.acquire().await?;
        let domain = normalize_domain(domain)?;
        let server_config = self.registry.get_config(&domain).await?;
        self.fetch_raw(&domain, &server_config).await
    }

    /// Look up a domain's registration record.
    ///
    /// Returns `Ok(None)` when the response carries neither a registration
    /// nor an expiry date.
    pub async fn get_domain_info(&self, domain: &str) -> Result<Option<DomainRecord>> {
        let _permit = self.acquire().await?;

        let start_time = Instant::now();
        let domain = normalize_domain(domain)?;
        let server_config = self.registry.get_config(&domain).await?;

        let raw = self.fetch_raw(&domain, &server_config).await?;
        let fields = parse_whois_raw(&raw);
        let record = build_record(&domain, &server_config, &fields, &self.registrars)?;

        tracing::debug!(
            domain = %domain,
            server = %server_config.whois_server,
            found = record.is_some(),
            duration_ms = %start_time.elapsed().as_millis(),
            "WHOIS lookup completed"
        );

        Ok(record)
    }

    /// Look up several domains concurrently; results keep the input order
    pub async fn get_domain_infos(
        &self,
        domains: &[String],
    ) -> Vec<(String, Result<Option<DomainRecord>>)> {
        let batch_start = Instant::now();
        let futures = domains.iter().map(|domain| self.get_domain_info(domain));
        let results = join_all(futures).await;

        let error_count = results.iter().filter(|r| r.is_err()).count();
        let found_count = results.iter().filter(|r| matches!(r, Ok(Some(_)))).count();
        tracing::info!(
            domains_requested = %domains.len(),
            records_found = %found_count,
            errors = %error_count,
            batch_duration_ms = %batch_start.elapsed().as_millis(),
            "Batch WHOIS lookup completed"
        );

        domains.iter().cloned().zip(results).collect()
    }

    async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.semaphore
            .acquire()
            .await
            .map_err(|e| WhoisError::internal(format!("Failed to acquire semaphore: {}", e)))
    }

    async fn fetch_raw(&self, domain: &str, server_config: &ServerConfig) -> Result<String> {
        self.transport
            .query(&server_config.whois_server, domain, self.config.timeout)
            .await
            .inspect_err(|e| {
                tracing::debug!(
                    domain = %domain,
                    server = %server_config.whois_server,
                    error = %e,
                    "WHOIS query failed"
                );
            })
    }
}

impl Default for WhoisLookup {
    fn default() -> Self {
        Self::new()
    }
}

/// Map parsed WHOIS fields onto a [`DomainRecord`] using the server's field names
pub fn build_record(
    domain: &str,
    server_config: &ServerConfig,
    fields: &HashMap<String, String>,
    registrars: &RegistrarTable,
) -> Result<Option<DomainRecord>> {
    let start_time = match field(fields, &server_config.registry_time_field) {
        Some(value) => parse_time(value, server_config.registry_time_format.as_deref())?,
        None => None,
    };
    let expire_time = match field(fields, &server_config.expire_time_field) {
        Some(value) => parse_time(value, server_config.expire_time_format.as_deref())?,
        None => None,
    };

    if start_time.is_none() && expire_time.is_none() {
        return Ok(None);
    }

    let registrar = field(fields, &server_config.registrar_field).map(str::to_string);
    let registrar_url = field(fields, &server_config.registrar_url_field)
        .map(str::to_string)
        .or_else(|| {
            registrar
                .as_deref()
                .and_then(|name| registrars.lookup(name))
                .map(str::to_string)
        })
        .map(|url| normalize_url(&url));

    Ok(Some(DomainRecord {
        domain: domain.to_string(),
        whois_server: server_config.whois_server.clone(),
        start_time,
        expire_time,
        registrar,
        registrar_url,
    }))
}

/// Prefix `http://` onto URLs that carry no scheme
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

fn field<'a>(fields: &'a HashMap<String, String>, name: &Option<String>) -> Option<&'a str> {
    name.as_deref()
        .and_then(|name| fields.get(name))
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}
