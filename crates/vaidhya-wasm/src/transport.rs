use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use serde_json::Value;

use vaidhya_client::{HttpResponse, HttpTransport, TransportFailure};

/// `HttpTransport` over the browser's fetch API
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTransport;

impl GlooTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportFailure> {
        let response = Request::post(url)
            .json(body)
            .map_err(|e| TransportFailure::new(format!("Failed to encode request: {}", e)))?
            .send()
            .await
            .map_err(|e| TransportFailure::new(format!("POST {} failed: {}", url, e)))?;
        read_response(url, response).await
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, TransportFailure> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| TransportFailure::new(format!("GET {} failed: {}", url, e)))?;
        read_response(url, response).await
    }
}

async fn read_response(url: &str, response: Response) -> Result<HttpResponse, TransportFailure> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TransportFailure::new(format!("Failed to read response from {}: {}", url, e)))?;
    Ok(HttpResponse::new(status, body))
}
