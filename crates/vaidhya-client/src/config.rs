use vaidhya_types::{API_URL_ENV, DEFAULT_API_URL};

/// Where the backend lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Pick the configured URL, falling back to the default when unset or blank
    pub fn resolve(value: Option<String>) -> Self {
        value
            .filter(|url| !url.trim().is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Read `VAIDHYA_API_URL` from the process environment
    pub fn from_env() -> Self {
        Self::resolve(std::env::var(API_URL_ENV).ok())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vaidhya_types::CHAT_PATH;

    #[test]
    fn test_default_url() {
        assert_eq!(ClientConfig::default().base_url, "http://localhost:5000");
    }

    #[test]
    fn test_blank_value_falls_back() {
        assert_eq!(ClientConfig::resolve(Some("   ".to_string())), ClientConfig::default());
        assert_eq!(ClientConfig::resolve(None), ClientConfig::default());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig::resolve(Some("https://bot.example.com/".to_string()));
        assert_eq!(config.endpoint(CHAT_PATH), "https://bot.example.com/api/chat");
    }
}
