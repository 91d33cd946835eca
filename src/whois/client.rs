//! Raw WHOIS transport over TCP port 43

use crate::error::{Result, WhoisError};
use crate::whois::WhoisTransport;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

pub const WHOIS_PORT: u16 = 43;

/// Responses larger than this are truncated
const MAX_RESPONSE_SIZE: u64 = 256 * 1024;

/// Pure Rust WHOIS client (no external `whois` binary required)
#[derive(Debug, Clone)]
pub struct TcpWhoisClient {
    port: u16,
}

impl TcpWhoisClient {
    pub fn new() -> Self {
        Self { port: WHOIS_PORT }
    }

    /// Client for servers listening on a non-standard port
    pub fn with_port(port: u16) -> Self {
        Self { port }
    }

    async fn exchange(&self, addr: &str, query: &str) -> Result<Vec<u8>> {
        let mut stream = TcpStream::connect(addr).await.map_err(|e| {
            WhoisError::network(format!("WHOIS connect failed: {}", e), Some(addr.to_string()))
        })?;

        stream
            .write_all(format!("{}\r\n", query).as_bytes())
            .await
            .map_err(|e| {
                WhoisError::network(format!("WHOIS write failed: {}", e), Some(addr.to_string()))
            })?;

        let mut buf = Vec::new();
        (&mut stream)
            .take(MAX_RESPONSE_SIZE)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| {
                WhoisError::network(format!("WHOIS read failed: {}", e), Some(addr.to_string()))
            })?;

        Ok(buf)
    }
}

impl Default for TcpWhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WhoisTransport for TcpWhoisClient {
    async fn query(&self, server: &str, query: &str, limit: Duration) -> Result<String> {
        let addr = format!("{}:{}", server, self.port);
        tracing::debug!(server = %addr, query = %query, "Sending WHOIS query");

        let buf = timeout(limit, self.exchange(&addr, query))
            .await
            .map_err(|_| {
                WhoisError::timeout(format!("WHOIS query to {}", addr), limit.as_secs())
            })??;

        if buf.len() as u64 == MAX_RESPONSE_SIZE {
            tracing::warn!(
                server = %addr,
                limit = MAX_RESPONSE_SIZE,
                "WHOIS response truncated at size limit"
            );
        }

        let reply = decode_response(&buf);
        tracing::trace!(server = %addr, bytes = buf.len(), "WHOIS response:\n{}", reply);
        Ok(reply)
    }
}

/// Decode as UTF-8, falling back to Latin-1 for registries that still use it
pub fn decode_response(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&c| c as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn test_decode_response() {
        assert_eq!(decode_response("Registrar: Ünïcode".as_bytes()), "Registrar: Ünïcode");
        assert_eq!(decode_response(&[b'N', 0xe9, b'e']), "Née");
    }

    #[tokio::test]
    async fn test_query_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let n = socket.read(&mut buf).await.unwrap();
            let query = String::from_utf8_lossy(&buf[..n]).to_string();
            socket.write_all(b"refer: whois.example.test\r\n").await.unwrap();
            query
        });

        let client = TcpWhoisClient::with_port(port);
        let reply = client
            .query("127.0.0.1", "example.com", Duration::from_secs(5))
            .await
            .unwrap();

        assert_eq!(reply, "refer: whois.example.test\r\n");
        assert_eq!(server.await.unwrap(), "example.com\r\n");
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = TcpWhoisClient::with_port(port)
            .query("127.0.0.1", "example.com", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, WhoisError::Network { .. }));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let err = TcpWhoisClient::with_port(port)
            .query("127.0.0.1", "example.com", Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, WhoisError::Timeout { .. }));
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_oversized_response_is_truncated() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await;
            let body = vec![b'a'; MAX_RESPONSE_SIZE as usize + 4096];
            // the client hangs up once it has read the limit
            let _ = socket.write_all(&body).await;
        });

        let reply = TcpWhoisClient::with_port(port)
            .query("127.0.0.1", "example.com", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(reply.len() as u64, MAX_RESPONSE_SIZE);
    }
}
