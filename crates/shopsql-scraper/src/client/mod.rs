//! HTTP client for a storefront's public catalog endpoints.

mod fetch_all;
mod origin;

use std::time::Duration;

use reqwest::{Client, Response, Url};

use crate::error::ScraperError;
use crate::types::ProductsPage;

pub use fetch_all::{CollectionFetch, PartialFetch};
pub use origin::extract_store_origin;
// Re-export for test visibility via `use super::*`
#[cfg(test)]
use origin::extract_domain;

/// Largest page size the collection endpoint is asked for. Collections are
/// fetched as a single page.
pub const COLLECTION_PAGE_LIMIT: u32 = 250;

/// HTTP client bound to one storefront origin.
///
/// Maps 429, 404 and other non-2xx responses to typed errors. Every request
/// carries the configured timeout; there is no retry. A failed request ends
/// the fetch loop that issued it.
pub struct CatalogClient {
    pub(super) client: Client,
    pub(super) origin: String,
}

impl CatalogClient {
    /// Creates a `CatalogClient` for `base_url` with the given per-request
    /// timeout and `User-Agent`.
    ///
    /// Any path on `base_url` is ignored; requests always go to its origin.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` is not an absolute URL.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed (e.g., invalid TLS config).
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let parsed = Url::parse(base_url).map_err(|e| ScraperError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !parsed.has_host() {
            return Err(ScraperError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL has no host".to_owned(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            origin: extract_store_origin(&parsed),
        })
    }

    /// Scheme and host every request is sent to, e.g. `https://rideengine.com`.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Fetches one page of the full product listing.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::RateLimited`] — HTTP 429.
    /// - [`ScraperError::NotFound`] — HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScraperError::Http`] — network, timeout or TLS failure.
    /// - [`ScraperError::Deserialize`] — response body is not a JSON object.
    pub async fn fetch_products_page(
        &self,
        limit: u32,
        page: u32,
    ) -> Result<ProductsPage, ScraperError> {
        let url = self.products_url(limit, page)?;
        self.get_page(url, &format!("products page {page}")).await
    }

    /// Fetches the product listing of one collection.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_products_page`].
    pub async fn fetch_collection_page(
        &self,
        handle: &str,
        limit: u32,
    ) -> Result<ProductsPage, ScraperError> {
        let url = self.collection_products_url(handle, limit)?;
        self.get_page(url, &format!("collection '{handle}'")).await
    }

    /// Storefront page for a collection, recorded alongside its products.
    #[must_use]
    pub fn collection_page_url(&self, handle: &str) -> String {
        format!("{}/collections/{handle}", self.origin)
    }

    async fn get_page(&self, url: Url, context: &str) -> Result<ProductsPage, ScraperError> {
        let response = self.get(url.as_str()).await?;
        let body = response.text().await?;
        serde_json::from_str::<ProductsPage>(&body).map_err(|e| ScraperError::Deserialize {
            context: format!("{context} from {}", self.origin),
            source: e,
        })
    }

    /// Sends a GET and maps non-success statuses to [`ScraperError`].
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_products_page`].
    pub async fn get(&self, url: &str) -> Result<Response, ScraperError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json,*/*;q=0.8")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain: origin::extract_domain(url),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response)
    }

    /// Builds `{origin}/products.json?limit={limit}&page={page}`.
    fn products_url(&self, limit: u32, page: u32) -> Result<Url, ScraperError> {
        let mut url = self.endpoint("/products.json")?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Builds `{origin}/collections/{handle}/products.json?limit={limit}`.
    fn collection_products_url(&self, handle: &str, limit: u32) -> Result<Url, ScraperError> {
        let mut url = self.endpoint("/collections/")?;
        url.path_segments_mut()
            .map_err(|()| ScraperError::InvalidBaseUrl {
                url: self.origin.clone(),
                reason: "origin cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .push(handle)
            .push("products.json");
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ScraperError> {
        Url::parse(&format!("{}{path}", self.origin)).map_err(|e| ScraperError::InvalidBaseUrl {
            url: self.origin.clone(),
            reason: format!("origin is not a valid URL base: {e}"),
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
