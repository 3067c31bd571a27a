//! Base-URL comparison and user-input URL normalization

/// URL with its fragment (everything from the first `#`) removed
pub fn base_url(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}

/// True when the two URLs point at different documents, ignoring fragments
pub fn is_url_change(prev: &str, next: &str) -> bool {
    base_url(prev) != base_url(next)
}

/// Normalize an incomplete URL typed by the user by adding a missing protocol
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    const SCHEMES: [&str; 7] =
        ["http://", "https://", "file://", "data:", "about:", "chrome://", "chrome-extension://"];
    if SCHEMES.iter().any(|scheme| trimmed.starts_with(scheme)) {
        return trimmed.to_string();
    }

    // Relative path - return as-is
    if trimmed.starts_with('/') || trimmed.starts_with("./") || trimmed.starts_with("../") {
        return trimmed.to_string();
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    if trimmed.contains('.') {
        return format!("https://{}", trimmed);
    }

    // Single word, e.g. "github" -> "https://www.github.com"
    format!("https://www.{}.com", trimmed)
}
