pub mod analysis;
pub mod client;
pub mod error;
pub mod images;
mod lenient;
pub mod normalize;
pub mod pagination;
pub mod types;

pub use analysis::CatalogAnalysis;
pub use client::{CatalogClient, CollectionFetch, PartialFetch};
pub use error::ScraperError;
pub use images::{ImageMaterializer, MaterializeReport};
pub use normalize::{normalize_catalog, normalize_product, NormalizeOptions, NormalizedCatalog};
pub use types::{ProductsPage, RawCollection, RawImage, RawProduct, RawTags, RawVariant};
