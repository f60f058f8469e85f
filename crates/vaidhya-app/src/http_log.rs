use std::path::PathBuf;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use vaidhya_client::{HttpResponse, HttpTransport, TransportFailure};
use vaidhya_logging::{log_request_to_file, log_response_to_file};

/// Transport decorator dumping each exchange to `req-*`/`resp-*` files
///
/// Dump failures are logged and never affect the exchange itself.
pub struct LoggingTransport {
    inner: Rc<dyn HttpTransport>,
    dir: PathBuf,
}

impl LoggingTransport {
    pub fn new(inner: Rc<dyn HttpTransport>, dir: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            dir: dir.into(),
        }
    }

    fn record_request(&self, method: &str, url: &str, body: Option<&Value>) -> Option<String> {
        match log_request_to_file(&self.dir, method, url, body) {
            Ok(logged) => Some(logged.stamp),
            Err(e) => {
                log::warn!("Could not log request: {:#}", e);
                None
            }
        }
    }

    fn record_response(&self, stamp: Option<String>, outcome: &Result<HttpResponse, TransportFailure>) {
        let Some(stamp) = stamp else { return };
        let written = match outcome {
            Ok(response) => log_response_to_file(&self.dir, &stamp, response.status, &response.body),
            Err(failure) => log_response_to_file(&self.dir, &stamp, 0, &failure.to_string()),
        };
        if let Err(e) = written {
            log::warn!("Could not log response: {:#}", e);
        }
    }
}

#[async_trait(?Send)]
impl HttpTransport for LoggingTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpResponse, TransportFailure> {
        let stamp = self.record_request("POST", url, Some(body));
        let outcome = self.inner.post_json(url, body).await;
        self.record_response(stamp, &outcome);
        outcome
    }

    async fn get(&self, url: &str) -> Result<HttpResponse, TransportFailure> {
        let stamp = self.record_request("GET", url, None);
        let outcome = self.inner.get(url).await;
        self.record_response(stamp, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FixedTransport;

    #[async_trait(?Send)]
    impl HttpTransport for FixedTransport {
        async fn post_json(&self, _url: &str, _body: &Value) -> Result<HttpResponse, TransportFailure> {
            Ok(HttpResponse::new(200, r#"{"status":"success"}"#))
        }

        async fn get(&self, _url: &str) -> Result<HttpResponse, TransportFailure> {
            Err(TransportFailure::new("connection refused"))
        }
    }

    fn dumped(dir: &std::path::Path, prefix: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_exchange_is_passed_through_and_dumped() {
        let dir = tempfile::tempdir().unwrap();
        let transport = LoggingTransport::new(Rc::new(FixedTransport), dir.path());

        let response = transport
            .post_json("http://localhost:5000/api/chat", &json!({"message": "hi"}))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let requests = dumped(dir.path(), "req-");
        let responses = dumped(dir.path(), "resp-");
        assert_eq!(requests.len(), 1);
        assert_eq!(responses.len(), 1);
        assert_eq!(requests[0].trim_start_matches("req-"), responses[0].trim_start_matches("resp-"));
    }

    #[tokio::test]
    async fn test_failures_are_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let transport = LoggingTransport::new(Rc::new(FixedTransport), dir.path());

        let failure = transport.get("http://localhost:5000/health").await.unwrap_err();
        assert_eq!(failure.to_string(), "connection refused");

        let responses = dumped(dir.path(), "resp-");
        let logged = std::fs::read_to_string(dir.path().join(&responses[0])).unwrap();
        assert!(logged.contains("Status: 0"));
        assert!(logged.contains("connection refused"));
    }
}
