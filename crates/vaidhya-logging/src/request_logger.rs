use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use serde_json::Value;

/// Where a request dump landed; the matching response reuses its stamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLog {
    pub stamp: String,
    pub path: PathBuf,
}

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Wall-clock stamp plus a sequence number so fast exchanges never collide
fn new_stamp() -> String {
    format!(
        "{}-{:04}",
        chrono::Local::now().format("%Y%m%d-%H%M%S%.3f"),
        SEQUENCE.fetch_add(1, Ordering::Relaxed)
    )
}

/// Log an outgoing HTTP request to `req-<stamp>.txt` in `dir`
pub fn log_request_to_file(dir: &Path, method: &str, url: &str, body: Option<&Value>) -> Result<RequestLog> {
    let stamp = new_stamp();
    let file_path = dir.join(format!("req-{}.txt", stamp));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", stamp));
    log_content.push_str(&format!("{} {}\n\n", method, url));

    match body {
        Some(body) => {
            log_content.push_str("Headers:\n");
            log_content.push_str("  Content-Type: application/json\n\n");
            log_content.push_str("Request Body:\n");
            match serde_json::to_string_pretty(body) {
                Ok(json) => log_content.push_str(&json),
                Err(e) => log_content.push_str(&format!("Error serializing request: {}", e)),
            }
            log_content.push('\n');
        }
        None => log_content.push_str("(no body)\n"),
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;
    log::debug!("request logged to {}", file_path.display());

    Ok(RequestLog {
        stamp,
        path: file_path,
    })
}

/// Log the HTTP response paired with `stamp` to `resp-<stamp>.txt` in `dir`
pub fn log_response_to_file(dir: &Path, stamp: &str, status: u16, body: &str) -> Result<PathBuf> {
    let file_path = dir.join(format!("resp-{}.txt", stamp));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", stamp));
    log_content.push_str(&format!("Status: {}\n\n", status));

    log_content.push_str("Response Body:\n");
    // Pretty-print JSON, fall back to raw text
    let pretty = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok());
    log_content.push_str(pretty.as_deref().unwrap_or(body));
    log_content.push('\n');

    log_content.push_str("\n---\n");
    log_content.push_str(&format!("Response Size: {} bytes\n", body.len()));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;
    log::debug!("response logged to {}", file_path.display());

    Ok(file_path)
}
