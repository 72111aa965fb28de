// ABOUTME: HTTP probe against a deployed site.
// ABOUTME: One GET / over a fresh hyper HTTP/1 connection per attempt.

use crate::types::HostPort;
use async_trait::async_trait;
use bytes::Bytes;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::net::TcpStream;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// A single health request.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// `GET /` on `localhost:<port>`, returning the response status code.
    async fn get(&self, port: HostPort) -> Result<u16, ProbeError>;
}

/// Probe over plain HTTP/1.1 to the loopback interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpProbe;

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn get(&self, port: HostPort) -> Result<u16, ProbeError> {
        let stream = TcpStream::connect(("127.0.0.1", port.get()))
            .await
            .map_err(|e| ProbeError::Connect(e.to_string()))?;

        let io = TokioIo::new(stream);

        let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
            .await
            .map_err(|e| ProbeError::Connect(format!("HTTP handshake failed: {}", e)))?;

        let connection = tokio::spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!("probe connection error: {}", e);
            }
        });

        let req = hyper::Request::builder()
            .method("GET")
            .uri("/")
            .header("Host", format!("localhost:{}", port))
            .body(http_body_util::Empty::<Bytes>::new())
            .map_err(|e| ProbeError::Request(format!("failed to build request: {}", e)))?;

        let result = sender
            .send_request(req)
            .await
            .map(|resp| resp.status().as_u16())
            .map_err(|e| ProbeError::Request(e.to_string()));

        connection.abort();
        result
    }
}

/// 2xx and 3xx count as serving.
pub fn is_serving(status: u16) -> bool {
    (200..400).contains(&status)
}
