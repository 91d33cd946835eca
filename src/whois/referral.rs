//! Root server referral discovery for TLDs without a static mapping

use crate::error::Result;
use crate::whois::WhoisTransport;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static REFER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"refer:(.*)").expect("valid refer regex"));

/// Asks a root WHOIS server which server is authoritative for a domain
#[derive(Clone)]
pub struct RootReferralResolver {
    transport: Arc<dyn WhoisTransport>,
    root_server: String,
    timeout: Duration,
}

impl RootReferralResolver {
    pub fn new(
        transport: Arc<dyn WhoisTransport>,
        root_server: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            root_server: root_server.into(),
            timeout,
        }
    }

    pub fn root_server(&self) -> &str {
        &self.root_server
    }

    /// Query the root server for `domain` and return the referred server, if any
    pub async fn resolve(&self, domain: &str) -> Result<Option<String>> {
        let raw = self.transport.query(&self.root_server, domain, self.timeout).await?;
        let referral = parse_referral(&raw);

        match &referral {
            Some(server) => tracing::debug!(
                domain = %domain,
                root = %self.root_server,
                server = %server,
                "Root referral found"
            ),
            None => tracing::debug!(
                domain = %domain,
                root = %self.root_server,
                "Root server returned no referral"
            ),
        }
        Ok(referral)
    }
}

/// Trimmed value of the first `refer:` line; empty values count as absent
pub fn parse_referral(raw: &str) -> Option<String> {
    REFER
        .captures(raw)
        .map(|caps| caps[1].trim().to_string())
        .filter(|server| !server.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_referral() {
        let sample =
            "% IANA WHOIS server\r\n\r\nrefer:        whois.nic.io\r\n\r\ndomain:       IO\r\n";
        assert_eq!(parse_referral(sample).as_deref(), Some("whois.nic.io"));
    }

    #[test]
    fn test_first_referral_wins() {
        let sample = "refer: whois.first.test\nrefer: whois.second.test\n";
        assert_eq!(parse_referral(sample).as_deref(), Some("whois.first.test"));
    }

    #[test]
    fn test_missing_referral() {
        let sample = "% This query returned 0 objects.\n";
        assert_eq!(parse_referral(sample), None);
        assert_eq!(parse_referral("refer:   \n"), None);
    }
}
