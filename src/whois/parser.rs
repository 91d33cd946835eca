//! Free-text WHOIS response parsing

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `[Created on]   2001/01/01` style lines used by JPRS and a few others
static BRACKET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("valid bracket line regex"));

/// Parse a raw WHOIS response into unlabeled key/value pairs.
///
/// Comment lines (`%`, `#`, `>>>`) and empty values are skipped. When a key
/// appears several times the first value wins.
pub fn parse_whois_raw(raw: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty()
            || line.starts_with('%')
            || line.starts_with('#')
            || line.starts_with(">>>")
        {
            continue;
        }

        let pair = if let Some(caps) = BRACKET_LINE.captures(line) {
            Some((caps[1].trim().to_string(), caps[2].trim().to_string()))
        } else {
            line.split_once(':')
                .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        };

        if let Some((key, value)) = pair {
            if key.is_empty() || value.is_empty() {
                continue;
            }
            fields.entry(key).or_insert(value);
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gtld_response() {
        let raw = "   Domain Name: BAIDU.COM\r
   Registry Domain ID: 11181110_DOMAIN_COM-VRSN\r
   Registrar WHOIS Server: whois.markmonitor.com\r
   Registrar URL: http://www.markmonitor.com\r
   Updated Date: 2025-04-23T07:11:11Z\r
   Creation Date: 1999-10-11T11:05:17Z\r
   Registry Expiry Date: 2026-10-11T11:05:17Z\r
   Registrar: MarkMonitor Inc.\r
   Name Server: NS1.BAIDU.COM\r
   Name Server: NS2.BAIDU.COM\r
>>> Last update of whois database: 2025-05-01T00:00:00Z <<<\r
";
        let fields = parse_whois_raw(raw);
        assert_eq!(fields.get("Domain Name").map(String::as_str), Some("BAIDU.COM"));
        assert_eq!(fields.get("Creation Date").map(String::as_str), Some("1999-10-11T11:05:17Z"));
        assert_eq!(
            fields.get("Registrar URL").map(String::as_str),
            Some("http://www.markmonitor.com")
        );
        assert_eq!(fields.get("Registrar").map(String::as_str), Some("MarkMonitor Inc."));
        // first occurrence wins
        assert_eq!(fields.get("Name Server").map(String::as_str), Some("NS1.BAIDU.COM"));
        assert!(!fields.keys().any(|k| k.starts_with(">>>")));
    }

    #[test]
    fn test_comments_and_empty_values() {
        let raw =
            "% This is a comment: ignored\n# another: one\nDNSSEC:\nStatus: ok\n\nno separator here\n";
        let fields = parse_whois_raw(raw);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("Status").map(String::as_str), Some("ok"));
    }

    #[test]
    fn test_bracket_lines() {
        let raw = "[ JPRS database provides information on network administration. ]\n\
                   Domain Information:\n\
                   [Domain Name]                   EXAMPLE.JP\n\
                   [Created on]                    2001/02/03\n\
                   [Expires on]                    2026/02/28\n";
        let fields = parse_whois_raw(raw);
        assert_eq!(fields.get("Domain Name").map(String::as_str), Some("EXAMPLE.JP"));
        assert_eq!(fields.get("Created on").map(String::as_str), Some("2001/02/03"));
        assert_eq!(fields.get("Expires on").map(String::as_str), Some("2026/02/28"));
    }

    #[test]
    fn test_cnnic_response() {
        let raw = "Domain Name: baidu.cn\n\
                   Sponsoring Registrar: 北京新网数码信息技术有限公司\n\
                   Registration Time: 2003-03-17 12:20:05\n\
                   Expiration Time: 2026-03-17 12:48:36\n";
        let fields = parse_whois_raw(raw);
        assert_eq!(
            fields.get("Registration Time").map(String::as_str),
            Some("2003-03-17 12:20:05")
        );
        assert_eq!(
            fields.get("Sponsoring Registrar").map(String::as_str),
            Some("北京新网数码信息技术有限公司")
        );
    }
}
