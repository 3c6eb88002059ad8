//! Favicon lookup for a location's canonical URL

use reqwest::Url;
use tracing::warn;

/// Icon URL for the host of `page_url`, or `None` when no host can be derived.
#[must_use]
pub fn favicon_url(service: &str, page_url: &str) -> Option<String> {
    let parsed = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            warn!("Invalid URL {:?}, omitting favicon: {}", page_url, e);
            return None;
        }
    };

    let Some(host) = parsed.host_str() else {
        warn!("URL {:?} has no host, omitting favicon", page_url);
        return None;
    };

    Some(format!(
        "{}?domain={}&sz=32",
        service,
        urlencoding::encode(host)
    ))
}
