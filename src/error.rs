//! Error handling for domain-whois

use thiserror::Error;

/// Main error type for domain-whois
#[derive(Error, Debug, Clone)]
pub enum WhoisError {
    #[error("Invalid domain '{domain}': {message}")]
    InvalidDomain { domain: String, message: String },

    #[error("Unsupported TLD: {tld}")]
    UnsupportedTld { tld: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        server: Option<String>,
    },

    #[error("Timeout error: {operation} timed out after {timeout_secs}s")]
    Timeout {
        operation: String,
        timeout_secs: u64,
    },

    #[error("Time parse error: '{value}' does not match '{format}': {message}")]
    TimeParse {
        value: String,
        format: String,
        message: String,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WhoisError {
    /// Create an invalid domain error
    pub fn invalid_domain(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported TLD error
    pub fn unsupported_tld(tld: impl Into<String>) -> Self {
        Self::UnsupportedTld { tld: tld.into() }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>, server: Option<String>) -> Self {
        Self::Network {
            message: message.into(),
            server,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_secs,
        }
    }

    /// Create a time parse error
    pub fn time_parse(
        value: impl Into<String>,
        format: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::TimeParse {
            value: value.into(),
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from the socket layer (connect, send, receive or timeout)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDomain { domain, message } => {
                format!(
                    "❌ '{}' is not a usable domain: {}\n💡 Check your input format",
                    domain, message
                )
            }
            Self::UnsupportedTld { tld } => {
                format!(
                    "⚠️  No WHOIS server is known for '.{}'\n💡 Add an override with WHOIS_OVERRIDES_PATH",
                    tld
                )
            }
            Self::Network { message, server } => {
                let server_info = server.as_ref().map_or(String::new(), |s| format!(" ({})", s));
                format!(
                    "❌ Network error{}: {}\n💡 Check your internet connection",
                    server_info, message
                )
            }
            Self::Timeout { operation, timeout_secs } => {
                format!(
                    "⏱️  Operation '{}' timed out after {}s\n💡 Try increasing WHOIS_TIMEOUT_SECS",
                    operation, timeout_secs
                )
            }
            Self::TimeParse { value, format, .. } => {
                format!(
                    "❌ Could not read date '{}' with format '{}'\n💡 The registry may have changed its output format",
                    value, format
                )
            }
            Self::Parse { message, .. } => {
                format!(
                    "❌ Parse error: {}\n💡 This might be a temporary issue, try again",
                    message
                )
            }
            Self::Config { message } => {
                format!(
                    "❌ Configuration problem: {}\n💡 Check your .env file or configuration",
                    message
                )
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!(
                    "❌ File error{}: {}\n💡 Check file permissions and paths",
                    path_info, message
                )
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

/// Convert from common error types
impl From<reqwest::Error> for WhoisError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::network("HTTP request timed out", url)
        } else if err.is_connect() {
            Self::network("Connection failed", url)
        } else {
            Self::network(err.to_string(), url)
        }
    }
}

impl From<serde_json::Error> for WhoisError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for WhoisError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, WhoisError>;
