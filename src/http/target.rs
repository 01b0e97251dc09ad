use url::Url;

/// Concatenates host and path with exactly one inserted `/` when the path
/// lacks a leading one. Nothing else is normalized.
#[must_use]
pub fn join_url(target_host: &str, path: &str) -> String {
    let separator = if path.starts_with('/') { "" } else { "/" };
    format!("{}{}{}", target_host, separator, path)
}

/// Port of the target host: the explicit port, else 80/443 for http/https.
#[must_use]
pub fn extract_port(target_host: &str) -> Option<u16> {
    let parsed = Url::parse(target_host).ok()?;
    if let Some(port) = parsed.port() {
        return Some(port);
    }
    match parsed.scheme() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}
