use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("pagination limit reached for {base_url}: exceeded {max_pages} pages")]
    PaginationLimit { base_url: String, max_pages: u32 },

    #[error("invalid storefront URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
