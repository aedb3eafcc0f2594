use chrono::Utc;

use shopsql_core::{load_taxonomy, AppConfig};
use shopsql_scraper::{normalize_catalog, NormalizeOptions, NormalizedCatalog};
use shopsql_store::{
    json_bytes, layout, load_json, ArtifactStore, ImportSummary, RawCollectionsFile,
    RawProductsFile, StoreError,
};

/// Normalizes the raw catalog into `import_ready/`.
///
/// The raw products file is required. Without a collections file every
/// product gets an empty `collection_handles`. The products file is written
/// last; `sql` requires it.
///
/// # Errors
///
/// Returns an error, before writing anything, if the raw products file is
/// missing or empty, or the taxonomy cannot be loaded. A failed write leaves
/// the products file absent.
pub(crate) fn prepare(config: &AppConfig, store: &dyn ArtifactStore) -> anyhow::Result<NormalizedCatalog> {
    let raw: RawProductsFile = load_json(store, layout::RAW_PRODUCTS)?;
    if raw.products.is_empty() {
        anyhow::bail!(
            "{} contains no products; run fetch-products first",
            store.describe(layout::RAW_PRODUCTS)
        );
    }

    let collections = match load_json::<_, RawCollectionsFile>(store, layout::RAW_COLLECTIONS) {
        Ok(file) => file.collections,
        Err(StoreError::Missing { key }) => {
            tracing::warn!(%key, "no collections file; products will have no category links");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let tree = load_taxonomy(&config.taxonomy_path)?;
    let options = NormalizeOptions {
        default_vendor: config.brand.name.clone(),
    };
    let catalog = normalize_catalog(&raw.products, &collections, &tree, &options);

    let summary = ImportSummary {
        prepared_at: Utc::now(),
        source: raw.source,
        total_categories: catalog.categories.len(),
        total_products: catalog.products.len(),
        total_variants: catalog.total_variants(),
        total_images: catalog.total_images(),
        files: vec![
            layout::IMPORT_CATEGORIES.to_owned(),
            layout::IMPORT_PRODUCTS.to_owned(),
        ],
    };

    let categories_bytes = json_bytes(layout::IMPORT_CATEGORIES, &catalog.categories)?;
    let products_bytes = json_bytes(layout::IMPORT_PRODUCTS, &catalog.products)?;
    let summary_bytes = json_bytes(layout::IMPORT_SUMMARY, &summary)?;

    store.write(layout::IMPORT_CATEGORIES, &categories_bytes)?;
    store.write(layout::IMPORT_SUMMARY, &summary_bytes)?;
    store.write(layout::IMPORT_PRODUCTS, &products_bytes)?;

    tracing::info!(
        categories = summary.total_categories,
        products = summary.total_products,
        variants = summary.total_variants,
        images = summary.total_images,
        "import data prepared"
    );
    Ok(catalog)
}
