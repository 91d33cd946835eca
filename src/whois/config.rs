//! Per-TLD WHOIS query parameters and the override table

use crate::error::{Result, WhoisError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REGISTRY_TIME_FIELD: &str = "Creation Date";
pub const DEFAULT_EXPIRE_TIME_FIELD: &str = "Registry Expiry Date";
pub const DEFAULT_REGISTRAR_FIELD: &str = "Registrar";
pub const DEFAULT_REGISTRAR_URL_FIELD: &str = "Registrar URL";

/// How to query a TLD and where its semantic values live in the parsed response.
///
/// The `*_field` attributes name keys of the raw-parsed mapping; an unset name
/// simply yields an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub whois_server: String,
    pub registry_time_field: Option<String>,
    pub expire_time_field: Option<String>,
    pub registrar_field: Option<String>,
    pub registrar_url_field: Option<String>,
    /// `strftime` pattern; `None` means free-form parsing
    pub registry_time_format: Option<String>,
    pub expire_time_format: Option<String>,
}

impl ServerConfig {
    /// Config with the ICANN-style field names used by most gTLD registries
    pub fn generic(whois_server: impl Into<String>) -> Self {
        Self {
            whois_server: whois_server.into(),
            registry_time_field: Some(DEFAULT_REGISTRY_TIME_FIELD.to_string()),
            expire_time_field: Some(DEFAULT_EXPIRE_TIME_FIELD.to_string()),
            registrar_field: Some(DEFAULT_REGISTRAR_FIELD.to_string()),
            registrar_url_field: Some(DEFAULT_REGISTRAR_URL_FIELD.to_string()),
            registry_time_format: None,
            expire_time_format: None,
        }
    }
}

/// Partial update of a [`ServerConfig`] for one TLD
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOverride {
    /// TLD the override applies to, Unicode or punycode
    pub tld: String,
    pub whois_server: Option<String>,
    pub registry_time_field: Option<String>,
    pub expire_time_field: Option<String>,
    pub registrar_field: Option<String>,
    pub registrar_url_field: Option<String>,
    pub registry_time_format: Option<String>,
    pub expire_time_format: Option<String>,
}

impl ServerOverride {
    pub fn new(tld: impl Into<String>) -> Self {
        Self {
            tld: tld.into(),
            ..Default::default()
        }
    }

    pub fn whois_server(mut self, server: impl Into<String>) -> Self {
        self.whois_server = Some(server.into());
        self
    }

    pub fn registry_time_field(mut self, field: impl Into<String>) -> Self {
        self.registry_time_field = Some(field.into());
        self
    }

    pub fn expire_time_field(mut self, field: impl Into<String>) -> Self {
        self.expire_time_field = Some(field.into());
        self
    }

    pub fn registrar_field(mut self, field: impl Into<String>) -> Self {
        self.registrar_field = Some(field.into());
        self
    }

    pub fn registrar_url_field(mut self, field: impl Into<String>) -> Self {
        self.registrar_url_field = Some(field.into());
        self
    }

    pub fn registry_time_format(mut self, format: impl Into<String>) -> Self {
        self.registry_time_format = Some(format.into());
        self
    }

    pub fn expire_time_format(mut self, format: impl Into<String>) -> Self {
        self.expire_time_format = Some(format.into());
        self
    }

    /// Overlay the attributes this override sets onto `base`; everything else is kept
    pub fn apply(&self, base: &ServerConfig) -> ServerConfig {
        fn pick(over: &Option<String>, base: &Option<String>) -> Option<String> {
            over.clone().or_else(|| base.clone())
        }

        ServerConfig {
            whois_server: self.whois_server.clone().unwrap_or_else(|| base.whois_server.clone()),
            registry_time_field: pick(&self.registry_time_field, &base.registry_time_field),
            expire_time_field: pick(&self.expire_time_field, &base.expire_time_field),
            registrar_field: pick(&self.registrar_field, &base.registrar_field),
            registrar_url_field: pick(&self.registrar_url_field, &base.registrar_url_field),
            registry_time_format: pick(&self.registry_time_format, &base.registry_time_format),
            expire_time_format: pick(&self.expire_time_format, &base.expire_time_format),
        }
    }
}

/// Overrides for registries that do not follow the ICANN field vocabulary
pub fn builtin_overrides() -> Vec<ServerOverride> {
    vec![
        ServerOverride::new("cn")
            .whois_server("whois.cnnic.cn")
            .registry_time_field("Registration Time")
            .expire_time_field("Expiration Time")
            .registrar_field("Sponsoring Registrar")
            .registry_time_format("%Y-%m-%d %H:%M:%S")
            .expire_time_format("%Y-%m-%d %H:%M:%S"),
        ServerOverride::new("中国")
            .whois_server("cwhois.cnnic.cn")
            .registry_time_field("Registration Time")
            .expire_time_field("Expiration Time")
            .registrar_field("Sponsoring Registrar")
            .registry_time_format("%Y-%m-%d %H:%M:%S")
            .expire_time_format("%Y-%m-%d %H:%M:%S"),
        ServerOverride::new("hk")
            .whois_server("whois.hkirc.hk")
            .registry_time_field("Domain Name Commencement Date")
            .expire_time_field("Expiry Date")
            .registrar_field("Registrar Name")
            .registry_time_format("%d-%m-%Y")
            .expire_time_format("%d-%m-%Y"),
        ServerOverride::new("tw")
            .whois_server("whois.twnic.net.tw")
            .registry_time_field("Record created on")
            .expire_time_field("Record expires on")
            .registrar_field("Registration Service Provider")
            .registrar_url_field("Registration Service URL"),
        ServerOverride::new("jp")
            .whois_server("whois.jprs.jp")
            .registry_time_field("Created on")
            .expire_time_field("Expires on")
            .registry_time_format("%Y/%m/%d")
            .expire_time_format("%Y/%m/%d"),
        ServerOverride::new("uk")
            .whois_server("whois.nic.uk")
            .registry_time_field("Registered on")
            .expire_time_field("Expiry date")
            .registrar_field("Registrar")
            .registrar_url_field("URL"),
        ServerOverride::new("de")
            .whois_server("whois.denic.de")
            .registry_time_field("Changed")
            .expire_time_field("Expiry Date"),
        ServerOverride::new("fr")
            .whois_server("whois.nic.fr")
            .registry_time_field("created")
            .expire_time_field("Expiry Date")
            .registrar_field("registrar")
            .registrar_url_field("website"),
        ServerOverride::new("ru")
            .whois_server("whois.tcinet.ru")
            .registry_time_field("created")
            .expire_time_field("paid-till")
            .registrar_field("registrar")
            .registrar_url_field("admin-contact"),
        ServerOverride::new("br")
            .whois_server("whois.registro.br")
            .registry_time_field("created")
            .expire_time_field("expires"),
        ServerOverride::new("kr")
            .whois_server("whois.kr")
            .registry_time_field("Registered Date")
            .expire_time_field("Expiration Date")
            .registrar_field("Authorized Agency"),
        ServerOverride::new("it")
            .whois_server("whois.nic.it")
            .registry_time_field("Created")
            .expire_time_field("Expire Date"),
        ServerOverride::new("pl")
            .whois_server("whois.dns.pl")
            .registry_time_field("created")
            .expire_time_field("renewal date")
            .registrar_field("REGISTRAR"),
        ServerOverride::new("se")
            .whois_server("whois.iis.se")
            .registry_time_field("created")
            .expire_time_field("expires")
            .registrar_field("registrar"),
        ServerOverride::new("nu")
            .whois_server("whois.iis.nu")
            .registry_time_field("created")
            .expire_time_field("expires")
            .registrar_field("registrar"),
        ServerOverride::new("fi")
            .whois_server("whois.fi")
            .registry_time_field("created")
            .expire_time_field("expires")
            .registrar_field("registrar")
            .registrar_url_field("www")
            .registry_time_format("%d.%m.%Y %H:%M:%S")
            .expire_time_format("%d.%m.%Y %H:%M:%S"),
        ServerOverride::new("ee")
            .whois_server("whois.tld.ee")
            .registry_time_field("registered")
            .expire_time_field("expire")
            .registrar_field("name")
            .registrar_url_field("url"),
    ]
}

/// Load extra overrides from a JSON array file
pub fn load_overrides_file(path: &Path) -> Result<Vec<ServerOverride>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        WhoisError::io(e.to_string(), Some(path.to_string_lossy().to_string()))
    })?;

    let overrides: Vec<ServerOverride> = serde_json::from_str(&content)?;
    if let Some(blank) = overrides.iter().find(|o| o.tld.trim().is_empty()) {
        return Err(WhoisError::config(format!(
            "Override without a TLD in {}: {:?}",
            path.display(),
            blank
        )));
    }

    Ok(overrides)
}
