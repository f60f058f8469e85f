use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock backend speaking the chat/reset/health contract
pub struct BackendMockServer {
    server: MockServer,
}

impl BackendMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Reply to a chat turn carrying `message` with a successful envelope
    pub async fn mock_chat_reply(&self, message: &str, response: Value) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({ "message": message })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "response": response,
                "session_id": "echoed"
            })))
            .mount(&self.server)
            .await;
    }

    /// Reply to any chat turn with an arbitrary status and raw body
    pub async fn mock_chat_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Reset endpoint as the backend implements it
    pub async fn mock_reset_success(&self, session_id: &str) {
        Mock::given(method("POST"))
            .and(path("/api/reset"))
            .and(body_json(json!({ "session_id": session_id })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Session reset successfully",
                "status": "success"
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_health(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "status": "healthy",
                "service": "medical-bot-backend",
                "timestamp": "2025-01-01T00:00:00"
            })))
            .mount(&self.server)
            .await;
    }
}

/// Canned structured replies taken from the backend's flows
pub mod replies {
    use serde_json::{json, Value};

    pub fn greeting() -> Value {
        json!({ "text": "Hi!", "type": "message", "buttons": [] })
    }

    pub fn summary_with_booking() -> Value {
        json!({
            "text": "Summary of your answers:\n- Fever: 3 days",
            "type": "summary",
            "buttons": [{ "text": "Book Appointment", "value": "book" }]
        })
    }

    pub fn time_selection() -> Value {
        json!({
            "text": "Please select one of the time options (1/2/3).",
            "type": "error",
            "buttons": [
                { "text": "1", "value": "1" },
                { "text": "2", "value": "2" },
                { "text": "3", "value": "3" }
            ]
        })
    }
}
