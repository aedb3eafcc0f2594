//! One handler per pipeline stage.
//!
//! Every handler takes the configuration and an [`ArtifactStore`] explicitly.
//! Fetch stages keep whatever was fetched before a transport failure; the
//! other stages read their predecessor's artifacts and fail before writing
//! anything when one is missing.

mod apply;
mod fetch;
mod images;
mod prepare;
mod sql;

use anyhow::Context;

use shopsql_core::AppConfig;
use shopsql_scraper::CatalogClient;
use shopsql_store::{layout, ArtifactStore};

pub(crate) use apply::apply;
pub(crate) use fetch::{fetch_collections, fetch_products};
pub(crate) use images::download_images;
pub(crate) use prepare::prepare;
pub(crate) use sql::generate_sql;

/// Runs every stage up to SQL generation, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing stage's error, prefixed with the stage name.
pub(crate) async fn run_pipeline(
    config: &AppConfig,
    client: &CatalogClient,
    store: &dyn ArtifactStore,
    skip_images: bool,
) -> anyhow::Result<()> {
    fetch_products(config, client, store)
        .await
        .context("fetch-products failed")?;
    fetch_collections(config, client, store)
        .await
        .context("fetch-collections failed")?;

    if skip_images {
        tracing::info!("image download skipped");
    } else {
        download_images(config, client, store)
            .await
            .context("images failed")?;
    }

    prepare(config, store).context("prepare failed")?;
    generate_sql(config, store).context("sql failed")?;

    tracing::info!(
        sql_dir = %store.describe(layout::SQL_DIR),
        "pipeline complete"
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests_support;

#[cfg(test)]
#[path = "stages_test.rs"]
mod tests;
