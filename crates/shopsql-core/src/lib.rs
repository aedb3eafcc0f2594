pub mod app_config;
pub mod category;
pub mod classify;
pub mod config;
pub mod products;
pub mod taxonomy;

use thiserror::Error;

pub use app_config::{AppConfig, BrandIdentity};
pub use category::Category;
pub use classify::{ClassificationMode, Sport};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{CanonicalImage, CanonicalProduct, CanonicalVariant, ProductStatus, Seo};
pub use taxonomy::{load_taxonomy, CategoryTree, RootCategory, SubCategory};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read taxonomy file {path}: {source}")]
    TaxonomyFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy file: {0}")]
    TaxonomyFileParse(#[source] serde_yaml::Error),

    #[error("taxonomy validation failed: {0}")]
    Validation(String),
}
