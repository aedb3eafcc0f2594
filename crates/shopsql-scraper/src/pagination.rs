//! Page-number pagination for the storefront listing endpoint.
//!
//! The listing is requested as `?limit={limit}&page={n}` with `n` starting at
//! 1. There is no cursor and no total count, so the only end-of-listing
//! signals are the page contents themselves:
//!
//! - an empty page, or
//! - a page shorter than the requested `limit`.
//!
//! A full page always triggers one more request, so a catalog whose size is an
//! exact multiple of `limit` ends on an empty page.

/// Upper bound on pages requested in a single listing walk. A storefront that
/// ignores `page` and keeps returning full pages would otherwise loop forever.
pub const MAX_PAGES: u32 = 200;

/// First page number of every listing walk.
pub const FIRST_PAGE: u32 = 1;

/// Returns the page to request after `current`, or `None` when the page that
/// just arrived with `received` items was the last one.
#[must_use]
pub fn next_page(current: u32, received: usize, limit: u32) -> Option<u32> {
    if received == 0 {
        return None;
    }
    let full = usize::try_from(limit).is_ok_and(|limit| received >= limit);
    full.then(|| current.saturating_add(1))
}
