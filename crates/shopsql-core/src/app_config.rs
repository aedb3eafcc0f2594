use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::classify::ClassificationMode;
use crate::ConfigError;

/// Display name, natural key, and description of the brand collection every
/// imported product is linked to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandIdentity {
    pub name: String,
    /// Natural key of the brand collection; also the prefix of every product
    /// canonical slug (`{slug}-{handle}`).
    pub slug: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub source_base_url: String,
    pub output_dir: PathBuf,
    pub taxonomy_path: PathBuf,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub image_delay_ms: u64,
    /// Multiplier from the storefront currency to the target currency.
    pub exchange_rate: Decimal,
    pub classification: ClassificationMode,
    pub brand: BrandIdentity,
    pub sample_size: usize,
    pub low_stock_threshold: i64,
    pub log_level: String,
    pub database_url: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("source_base_url", &self.source_base_url)
            .field("output_dir", &self.output_dir)
            .field("taxonomy_path", &self.taxonomy_path)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("image_delay_ms", &self.image_delay_ms)
            .field("exchange_rate", &self.exchange_rate)
            .field("classification", &self.classification)
            .field("brand", &self.brand)
            .field("sample_size", &self.sample_size)
            .field("low_stock_threshold", &self.low_stock_threshold)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

impl AppConfig {
    /// Connection string for the `apply` command.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `DATABASE_URL` is unset.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }
}
