//! Downloads product images into a directory tree keyed by product handle.
//!
//! Layout under the output root:
//!
//! ```text
//! images/
//!   {sanitised handle}/
//!     00_{basename}
//!     01_{basename}
//!     images_metadata.json
//! ```
//!
//! The same naming is used by the normalizer to fill in
//! `CanonicalImage::local_path`, so a prepared product points at the file this
//! module writes whether or not it has run yet.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::types::RawProduct;

/// Directory under the output root that holds all product image folders.
pub const IMAGES_DIR: &str = "images";

/// Per-product sidecar file name.
pub const METADATA_FILE: &str = "images_metadata.json";

/// Directory name for a product handle: every character that is not a
/// Unicode letter or digit, `.`, `-` or `_` becomes `_`. An empty handle maps
/// to `unknown`.
#[must_use]
pub fn sanitize_dir_name(handle: &str) -> String {
    if handle.is_empty() {
        return "unknown".to_owned();
    }
    handle
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File name for the image at 0-based `index`: `{index:02}_{basename}`, where
/// `basename` is the last path segment of `src` without its query string.
#[must_use]
pub fn image_file_name(index: usize, src: &str) -> String {
    let basename = url_basename(src)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map_or_else(|| format!("image_{index}.jpg"), str::to_owned);
    format!("{index:02}_{basename}")
}

/// Path of an image relative to the output root, with `/` separators.
#[must_use]
pub fn local_image_path(handle: &str, index: usize, src: &str) -> String {
    format!(
        "{IMAGES_DIR}/{}/{}",
        sanitize_dir_name(handle),
        image_file_name(index, src)
    )
}

fn url_basename(src: &str) -> Option<&str> {
    let without_query = src.split(['?', '#']).next().unwrap_or(src);
    without_query.rsplit('/').next()
}

/// One entry of `images_metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub index: usize,
    pub filename: String,
    pub original_url: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub alt: String,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImagesMetadata {
    pub product_handle: String,
    pub product_title: String,
    pub images: Vec<ImageMetadata>,
}

/// Counts for one product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductImagesOutcome {
    /// Images present on disk after the run, including ones skipped because
    /// they already existed.
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: usize,
}

/// Counts for a whole catalog, written to `images_summary.json` by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    pub total_products: usize,
    pub products_with_images: usize,
    pub images_downloaded: usize,
    pub images_already_present: usize,
    pub images_failed: usize,
}

/// Sequential image downloader with a fixed pause after each download.
pub struct ImageMaterializer<'a> {
    client: &'a CatalogClient,
    output_root: PathBuf,
    delay: Duration,
}

impl<'a> ImageMaterializer<'a> {
    #[must_use]
    pub fn new(client: &'a CatalogClient, output_root: impl Into<PathBuf>, delay: Duration) -> Self {
        Self {
            client,
            output_root: output_root.into(),
            delay,
        }
    }

    #[must_use]
    pub fn images_dir(&self) -> PathBuf {
        self.output_root.join(IMAGES_DIR)
    }

    /// Downloads every image of every product.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Io`] or [`ScraperError::Encode`] when a
    /// directory or sidecar file cannot be written. Failed individual
    /// downloads are logged and counted, not returned.
    pub async fn materialize_all(
        &self,
        products: &[RawProduct],
    ) -> Result<MaterializeReport, ScraperError> {
        let mut report = MaterializeReport {
            total_products: products.len(),
            ..MaterializeReport::default()
        };

        for (position, product) in products.iter().enumerate() {
            if product.images.is_empty() {
                continue;
            }
            tracing::info!(
                product = position + 1,
                of = products.len(),
                handle = %product.handle,
                images = product.images.len(),
                "downloading product images"
            );

            let outcome = self.materialize_product(product).await?;
            report.products_with_images += 1;
            report.images_downloaded += outcome.downloaded;
            report.images_already_present += outcome.already_present;
            report.images_failed += outcome.failed;
        }

        Ok(report)
    }

    /// Downloads one product's images and writes its metadata sidecar.
    ///
    /// Files that already exist are not fetched again. Images with an empty
    /// `src` are ignored.
    ///
    /// # Errors
    ///
    /// See [`Self::materialize_all`].
    pub async fn materialize_product(
        &self,
        product: &RawProduct,
    ) -> Result<ProductImagesOutcome, ScraperError> {
        let mut outcome = ProductImagesOutcome::default();
        if product.images.is_empty() {
            return Ok(outcome);
        }

        let product_dir = self.images_dir().join(sanitize_dir_name(&product.handle));
        tokio::fs::create_dir_all(&product_dir)
            .await
            .map_err(io_error(&product_dir))?;

        let mut metadata = Vec::new();

        for (index, image) in product.images.iter().enumerate() {
            if image.src.is_empty() {
                continue;
            }

            let filename = image_file_name(index, &image.src);
            let dest = product_dir.join(&filename);

            let exists = tokio::fs::try_exists(&dest)
                .await
                .map_err(io_error(&dest))?;
            if exists {
                outcome.already_present += 1;
            } else {
                match self.download_to(&image.src, &dest).await {
                    Ok(()) => {}
                    Err(e @ ScraperError::Io { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(url = %image.src, error = %e, "image download failed");
                        outcome.failed += 1;
                        continue;
                    }
                }
                if !self.delay.is_zero() {
                    tokio::time::sleep(self.delay).await;
                }
            }

            outcome.downloaded += 1;
            metadata.push(ImageMetadata {
                index,
                filename,
                original_url: image.src.clone(),
                width: image.width,
                height: image.height,
                alt: image.alt.clone().unwrap_or_else(|| product.title.clone()),
                position: image
                    .position
                    .unwrap_or_else(|| i64::try_from(index + 1).unwrap_or(i64::MAX)),
            });
        }

        if !metadata.is_empty() {
            let sidecar = ProductImagesMetadata {
                product_handle: product.handle.clone(),
                product_title: product.title.clone(),
                images: metadata,
            };
            let path = product_dir.join(METADATA_FILE);
            let body = serde_json::to_vec_pretty(&sidecar).map_err(|e| ScraperError::Encode {
                context: path.display().to_string(),
                source: e,
            })?;
            tokio::fs::write(&path, body)
                .await
                .map_err(io_error(&path))?;
        }

        Ok(outcome)
    }

    /// Streams `url` into `{dest}.part`, then renames it to `dest`.
    async fn download_to(&self, url: &str, dest: &Path) -> Result<(), ScraperError> {
        let mut part = dest.as_os_str().to_owned();
        part.push(".part");
        let part = PathBuf::from(part);

        let result = self.stream_to(url, &part).await;
        if result.is_err() {
            // best effort; the partial file is never read
            let _ = tokio::fs::remove_file(&part).await;
            return result;
        }

        tokio::fs::rename(&part, dest)
            .await
            .map_err(io_error(dest))
    }

    async fn stream_to(&self, url: &str, path: &Path) -> Result<(), ScraperError> {
        let mut response = self.client.get(url).await?;
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(io_error(path))?;

        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await.map_err(io_error(path))?;
        }
        file.flush().await.map_err(io_error(path))?;
        Ok(())
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ScraperError + '_ {
    move |source| ScraperError::Io {
        path: path.display().to_string(),
        source,
    }
}
