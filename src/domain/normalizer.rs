//! Domain name normalization utilities
//!
//! Every lookup is keyed by the registrable root domain in ASCII form, so
//! `https://WWW.Example.com:8443/login` and `example.com` resolve identically.

use crate::error::{Result, WhoisError};
use public_suffix::{EffectiveTLDProvider, DEFAULT_PROVIDER};
use std::borrow::Cow;
use std::net::Ipv4Addr;
use url::{Host, Url};

/// Check whether the input is a literal IPv4 address
pub fn is_ipv4(input: &str) -> bool {
    input.parse::<Ipv4Addr>().is_ok()
}

/// Encode an internationalized hostname (or single label) to its ASCII form
///
/// ASCII input is only lowercased, so `xn--` labels are kept even when they are
/// not valid punycode.
pub fn encode_hostname(hostname: &str) -> Result<String> {
    if hostname.is_ascii() {
        return Ok(hostname.to_ascii_lowercase());
    }
    idna::domain_to_ascii(hostname).map_err(|e| {
        WhoisError::invalid_domain(hostname, format!("IDN encoding failed: {:?}", e))
    })
}

/// Extract the host part of a domain-like input, dropping scheme, port, path and trailing dot
pub fn extract_host(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(WhoisError::invalid_domain(input, "Domain name cannot be empty"));
    }

    if input.is_ascii() {
        return strip_ascii_host(input);
    }

    let with_scheme: Cow<'_, str> = if input.contains("://") {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("http://{}", input))
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| WhoisError::invalid_domain(input, e.to_string()))?;

    match url.host() {
        Some(Host::Domain(domain)) => {
            let domain = domain.trim_end_matches('.').to_lowercase();
            if domain.is_empty() {
                Err(WhoisError::invalid_domain(input, "No host found"))
            } else {
                Ok(domain)
            }
        }
        Some(Host::Ipv4(ip)) => Ok(ip.to_string()),
        Some(Host::Ipv6(_)) => Err(ipv6_unsupported(input)),
        None => Err(WhoisError::invalid_domain(input, "No host found")),
    }
}

/// Host of an ASCII input without URL host validation, which would reject
/// `xn--` labels that are not valid punycode
fn strip_ascii_host(input: &str) -> Result<String> {
    let rest = input.split_once("://").map_or(input, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    if host_port.starts_with('[') {
        return Err(ipv6_unsupported(input));
    }

    let host = match host_port.rsplit_once(':') {
        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => host_port,
    };
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    let valid = !host.is_empty()
        && host.split('.').all(|label| {
            !label.is_empty()
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
    if valid {
        Ok(host)
    } else {
        Err(WhoisError::invalid_domain(input, "Not a valid hostname"))
    }
}

fn ipv6_unsupported(input: &str) -> WhoisError {
    WhoisError::invalid_domain(input, "IPv6 literals are not supported")
}

/// Reduce an ASCII hostname to its registrable root domain (`a.b.example.co.uk` -> `example.co.uk`)
pub fn root_domain(ascii_host: &str) -> Result<String> {
    DEFAULT_PROVIDER
        .effective_tld_plus_one(ascii_host)
        .map(str::to_string)
        .map_err(|e| {
            WhoisError::invalid_domain(
                ascii_host,
                format!("Cannot map to a registrable domain: {:?}", e),
            )
        })
}

/// Produce the lookup key for a raw domain input.
///
/// IPv4 literals are returned unchanged; anything else is reduced to its
/// punycode-encoded registrable root domain.
pub fn normalize_domain(raw: &str) -> Result<String> {
    let input = raw.trim();
    if is_ipv4(input) {
        return Ok(input.to_string());
    }

    let host = extract_host(input)?;
    if is_ipv4(&host) {
        return Ok(host);
    }

    let ascii = encode_hostname(&host)?;
    let root = root_domain(&ascii)?;
    tracing::debug!(input = %raw, domain = %root, "Normalized domain");
    Ok(root)
}

/// Trailing label of a normalized domain, used as the server registry key
pub fn tld_of(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}
