//! Origin and host helpers for storefront URLs.

use reqwest::Url;

/// Reduces a storefront URL to `scheme://host[:port]`.
///
/// `"https://rideengine.com/collections/all"` becomes `"https://rideengine.com"`,
/// so the configured base URL may point anywhere on the shop.
#[must_use]
pub fn extract_store_origin(base_url: &Url) -> String {
    base_url.origin().ascii_serialization()
}

/// Hostname of `url` for error messages, or `url` itself when unparseable.
pub(super) fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}
