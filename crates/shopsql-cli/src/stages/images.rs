use std::time::Duration;

use chrono::Utc;

use shopsql_core::AppConfig;
use shopsql_scraper::{CatalogClient, ImageMaterializer, MaterializeReport};
use shopsql_store::{layout, load_json, save_json, ArtifactStore, ImagesSummary, RawProductsFile};

/// Downloads the images of every raw product under `{output_dir}/images`.
///
/// Image files always go to the filesystem; only the summary goes through
/// `store`.
///
/// # Errors
///
/// Returns an error if the raw products file is missing or an image file
/// cannot be written. Individual download failures are counted, not fatal.
pub(crate) async fn download_images(
    config: &AppConfig,
    client: &CatalogClient,
    store: &dyn ArtifactStore,
) -> anyhow::Result<MaterializeReport> {
    let raw: RawProductsFile = load_json(store, layout::RAW_PRODUCTS)?;

    let materializer = ImageMaterializer::new(
        client,
        &config.output_dir,
        Duration::from_millis(config.image_delay_ms),
    );
    let report = materializer.materialize_all(&raw.products).await?;

    let summary = ImagesSummary {
        downloaded_at: Utc::now(),
        total_products: report.total_products,
        products_with_images: report.products_with_images,
        total_images_downloaded: report.images_downloaded,
        images_directory: materializer.images_dir().display().to_string(),
    };
    save_json(store, layout::IMAGES_SUMMARY, &summary)?;

    if report.images_failed > 0 {
        tracing::warn!(failed = report.images_failed, "some images could not be downloaded");
    }
    tracing::info!(
        products_with_images = report.products_with_images,
        downloaded = report.images_downloaded,
        already_present = report.images_already_present,
        directory = %summary.images_directory,
        "images saved"
    );
    Ok(report)
}
