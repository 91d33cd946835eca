//! TLD to WHOIS server list: bundled copy, refreshed local copy, and refresh.

use crate::error::{Result, WhoisError};
use crate::types::LookupConfig;
use std::collections::HashMap;
use std::path::Path;

const BUNDLED_SERVERS: &str = include_str!("../../data/whois-servers.txt");

/// Parse `<tld> <server>` lines; blank lines, `#` comments and malformed lines are skipped
pub fn parse_server_list(text: &str) -> HashMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let tld = parts.next()?.trim_start_matches('.').to_lowercase();
            let server = parts.next()?.to_lowercase();
            if tld.is_empty() {
                None
            } else {
                Some((tld, server))
            }
        })
        .collect()
}

/// The server list shipped with the crate
pub fn bundled_server_list() -> HashMap<String, String> {
    parse_server_list(BUNDLED_SERVERS)
}

/// Load the refreshed list at `path` when present, otherwise the bundled list
pub fn load_server_list(path: Option<&Path>) -> Result<HashMap<String, String>> {
    match path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path).map_err(|e| {
                WhoisError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
            })?;
            let servers = parse_server_list(&content);
            if servers.is_empty() {
                return Err(WhoisError::parse(
                    format!("No WHOIS servers found in {}", path.display()),
                    None,
                ));
            }
            tracing::debug!(
                path = %path.display(),
                servers = servers.len(),
                "Loaded WHOIS server list"
            );
            Ok(servers)
        }
        _ => Ok(bundled_server_list()),
    }
}

/// Re-download the server list into `config.servers_path`.
///
/// Best effort: failures are logged and reported as `false`. Registries that
/// are already built keep their configuration.
pub async fn update_whois_servers(config: &LookupConfig) -> bool {
    match download_server_list(config).await {
        Ok(count) => {
            tracing::info!(
                url = %config.servers_list_url,
                path = %config.servers_path.display(),
                servers = count,
                "WHOIS server list updated"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                url = %config.servers_list_url,
                error = %e,
                "Failed to update WHOIS server list"
            );
            false
        }
    }
}

async fn download_server_list(config: &LookupConfig) -> Result<usize> {
    let client = reqwest::Client::builder()
        .timeout(config.update_timeout)
        .user_agent(concat!("domain-whois/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let response = client
        .get(&config.servers_list_url)
        .send()
        .await
        .map_err(|e| request_error(e, config))?;
    let status = response.status();
    if !status.is_success() {
        return Err(WhoisError::network(
            format!("Server list download failed with status {}", status),
            Some(config.servers_list_url.clone()),
        ));
    }

    let text = response.text().await.map_err(|e| request_error(e, config))?;
    let count = parse_server_list(&text).len();
    if count == 0 {
        return Err(WhoisError::parse("Downloaded server list is empty", None));
    }

    let path = &config.servers_path;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            WhoisError::io(e.to_string(), Some(parent.to_string_lossy().to_string()))
        })?;
    }
    tokio::fs::write(path, text).await.map_err(|e| {
        WhoisError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    Ok(count)
}

/// Report timeouts against the configured download limit
fn request_error(err: reqwest::Error, config: &LookupConfig) -> WhoisError {
    if err.is_timeout() {
        WhoisError::timeout(
            format!("Downloading {}", config.servers_list_url),
            config.update_timeout.as_secs(),
        )
    } else {
        err.into()
    }
}
