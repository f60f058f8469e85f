use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportFailure;

/// Raw outcome of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Minimal HTTP capability the session client needs
///
/// Implementations return `Err` only when no response was received at all;
/// every status code, including 4xx/5xx, comes back as an `HttpResponse`.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportFailure>;
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportFailure>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestTransport;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use async_trait::async_trait;
    use serde_json::Value;

    use super::{HttpResponse, HttpTransport};
    use crate::error::TransportFailure;

    /// `reqwest`-backed transport for native front-ends
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for ReqwestTransport {
        async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportFailure> {
            let response = self
                .client
                .post(url)
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await
                .map_err(|e| TransportFailure::new(format!("POST {} failed: {}", url, e)))?;
            read_response(url, response).await
        }

        async fn get(&self, url: &str) -> Result<HttpResponse, TransportFailure> {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| TransportFailure::new(format!("GET {} failed: {}", url, e)))?;
            read_response(url, response).await
        }
    }

    async fn read_response(url: &str, response: reqwest::Response) -> Result<HttpResponse, TransportFailure> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(format!("reading body from {} failed: {}", url, e)))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(500, "").is_success());
    }
}
