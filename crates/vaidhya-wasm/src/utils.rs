/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escaped text with newlines turned into line breaks
pub fn plain_text_html(s: &str) -> String {
    escape_html(s).replace('\n', "<br>")
}

/// Pick the backend URL: page argument first, then the build-time value
pub fn resolve_api_url(from_page: Option<String>, built_in: Option<&str>) -> Option<String> {
    from_page
        .filter(|url| !url.trim().is_empty())
        .or_else(|| built_in.map(str::to_string))
}
