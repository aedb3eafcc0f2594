use shopsql_core::{load_taxonomy, AppConfig};
use shopsql_scraper::analysis::summary_text;
use shopsql_scraper::{CatalogAnalysis, CatalogClient};
use shopsql_store::{
    json_bytes, layout, save_json, ArtifactStore, RawCollectionsFile, RawProductsFile,
};

/// Fetches every product page, then writes the raw products file, the
/// catalog analysis and the plain-text summary.
///
/// A page failure after at least one product keeps the products fetched so
/// far. Returns the number of products saved.
///
/// The raw products file is written last, so later stages never see it
/// unless the analysis and summary were written too.
///
/// # Errors
///
/// Returns an error, and writes nothing, when no product could be fetched.
/// A failed write leaves the raw products file absent.
pub(crate) async fn fetch_products(
    config: &AppConfig,
    client: &CatalogClient,
    store: &dyn ArtifactStore,
) -> anyhow::Result<usize> {
    tracing::info!(
        origin = client.origin(),
        page_size = config.page_size,
        "fetching product catalog"
    );

    let fetch = client.fetch_all_products(config.page_size).await;
    if let Some(error) = &fetch.interrupted {
        tracing::warn!(
            error = %error,
            kept = fetch.items.len(),
            "product fetch stopped early"
        );
    }

    if fetch.items.is_empty() {
        return match fetch.interrupted {
            Some(error) => Err(anyhow::Error::new(error)
                .context(format!("no products fetched from {}", client.origin()))),
            None => Err(anyhow::anyhow!("no products found at {}", client.origin())),
        };
    }

    let file = RawProductsFile::new(client.origin(), fetch.items);
    let analysis = CatalogAnalysis::from_products(&file.products);
    let summary = summary_text(&file.source, &file.scraped_at.to_rfc3339(), &file.products);

    let raw_bytes = json_bytes(layout::RAW_PRODUCTS, &file)?;
    let analysis_bytes = json_bytes(layout::ANALYSIS, &analysis)?;

    store.write(layout::ANALYSIS, &analysis_bytes)?;
    store.write(layout::SUMMARY, summary.as_bytes())?;
    store.write(layout::RAW_PRODUCTS, &raw_bytes)?;

    tracing::info!(
        products = file.total_products,
        variants = analysis.total_variants,
        images = analysis.total_images,
        path = %store.describe(layout::RAW_PRODUCTS),
        "product catalog saved"
    );
    Ok(file.total_products)
}

/// Fetches the product list of every taxonomy collection, in taxonomy order.
///
/// Writes `category_tree.json`, one raw file per fetched collection and the
/// combined collections file. Collections that fail are logged and left out.
/// Returns the number of collections saved.
///
/// # Errors
///
/// Returns an error if the taxonomy cannot be loaded or an artifact cannot
/// be written.
pub(crate) async fn fetch_collections(
    config: &AppConfig,
    client: &CatalogClient,
    store: &dyn ArtifactStore,
) -> anyhow::Result<usize> {
    let tree = load_taxonomy(&config.taxonomy_path)?;
    save_json(store, layout::CATEGORY_TREE, &tree.to_nested())?;

    let handles = tree.handles();
    tracing::info!(collections = handles.len(), "fetching collections");

    let outcome = client.fetch_collections(&handles).await;
    for (handle, error) in &outcome.failures {
        tracing::warn!(handle = %handle, error = %error, "collection skipped");
    }

    for collection in &outcome.collections {
        save_json(store, &layout::raw_collection(&collection.handle), collection)?;
    }

    let total_products = outcome.total_products();
    let failed = outcome.failures.len();
    let file = RawCollectionsFile::new(client.origin(), outcome.collections);
    save_json(store, layout::RAW_COLLECTIONS, &file)?;

    tracing::info!(
        collections = file.total_collections,
        failed,
        products = total_products,
        "collections saved"
    );
    Ok(file.total_collections)
}
