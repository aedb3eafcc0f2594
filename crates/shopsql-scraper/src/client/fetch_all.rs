//! Multi-request fetch loops for `CatalogClient`.
//!
//! Neither loop returns a bare `Result`. A transport or HTTP failure stops the
//! loop, and whatever was collected before it is handed back together with
//! the error, so downstream stages can still run on a partial catalog.

use crate::error::ScraperError;
use crate::pagination::{next_page, FIRST_PAGE, MAX_PAGES};
use crate::types::{RawCollection, RawProduct};

use super::{CatalogClient, COLLECTION_PAGE_LIMIT};

/// Items gathered by a fetch loop, and the error that ended it early, if any.
#[derive(Debug)]
pub struct PartialFetch<T> {
    pub items: Vec<T>,
    pub interrupted: Option<ScraperError>,
}

/// Outcome of fetching a fixed set of collections. A failing handle is
/// recorded and skipped; the remaining handles are still fetched.
#[derive(Debug, Default)]
pub struct CollectionFetch {
    /// Successfully fetched collections, in request order.
    pub collections: Vec<RawCollection>,
    pub failures: Vec<(String, ScraperError)>,
}

impl CollectionFetch {
    #[must_use]
    pub fn total_products(&self) -> usize {
        self.collections.iter().map(|c| c.product_count).sum()
    }
}

impl CatalogClient {
    /// Walks the product listing page by page until a page comes back empty
    /// or shorter than `limit`.
    ///
    /// Products are returned in listing order. On the first failing page the
    /// walk stops; products from earlier pages are kept in
    /// [`PartialFetch::items`]. Exceeding [`MAX_PAGES`] is reported as
    /// [`ScraperError::PaginationLimit`] in the same way.
    pub async fn fetch_all_products(&self, limit: u32) -> PartialFetch<RawProduct> {
        let mut items: Vec<RawProduct> = Vec::new();
        let mut page = FIRST_PAGE;

        loop {
            if page > MAX_PAGES {
                return PartialFetch {
                    items,
                    interrupted: Some(ScraperError::PaginationLimit {
                        base_url: self.origin.clone(),
                        max_pages: MAX_PAGES,
                    }),
                };
            }

            let response = match self.fetch_products_page(limit, page).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(
                        page,
                        collected = items.len(),
                        error = %e,
                        "product listing interrupted"
                    );
                    return PartialFetch {
                        items,
                        interrupted: Some(e),
                    };
                }
            };

            let received = response.products.len();
            tracing::debug!(page, received, "fetched products page");
            items.extend(response.products);

            match next_page(page, received, limit) {
                Some(next) => page = next,
                None => break,
            }
        }

        tracing::info!(total = items.len(), "product listing complete");
        PartialFetch {
            items,
            interrupted: None,
        }
    }

    /// Fetches a single collection's product listing.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_collection_page`].
    pub async fn fetch_collection(&self, handle: &str) -> Result<RawCollection, ScraperError> {
        let page = self
            .fetch_collection_page(handle, COLLECTION_PAGE_LIMIT)
            .await?;
        Ok(RawCollection::new(
            handle,
            self.collection_page_url(handle),
            page.products,
        ))
    }

    /// Fetches each collection in `handles`, in order.
    pub async fn fetch_collections<S: AsRef<str>>(&self, handles: &[S]) -> CollectionFetch {
        let mut outcome = CollectionFetch::default();

        for handle in handles {
            let handle = handle.as_ref();
            match self.fetch_collection(handle).await {
                Ok(collection) => {
                    tracing::debug!(
                        handle,
                        products = collection.product_count,
                        "fetched collection"
                    );
                    outcome.collections.push(collection);
                }
                Err(e) => {
                    tracing::warn!(handle, error = %e, "collection fetch failed");
                    outcome.failures.push((handle.to_owned(), e));
                }
            }
        }

        outcome
    }
}
