use shopsql_core::{AppConfig, CanonicalProduct, Category};
use shopsql_emit::{EmitConfig, SqlBundle, SqlEmitter};
use shopsql_store::{layout, load_json, ArtifactStore};

pub(crate) fn emit_config(config: &AppConfig) -> EmitConfig {
    EmitConfig {
        brand: config.brand.clone(),
        exchange_rate: config.exchange_rate,
        classification: config.classification,
        low_stock_threshold: config.low_stock_threshold,
    }
}

/// Renders every script from `import_ready/` and writes them under `sql/`.
///
/// # Errors
///
/// Returns an error, before writing any script, if an import-ready file is
/// missing or a statement fails to render.
pub(crate) fn generate_sql(config: &AppConfig, store: &dyn ArtifactStore) -> anyhow::Result<SqlBundle> {
    let categories: Vec<Category> = load_json(store, layout::IMPORT_CATEGORIES)?;
    let products: Vec<CanonicalProduct> = load_json(store, layout::IMPORT_PRODUCTS)?;

    let bundle = SqlEmitter::new(emit_config(config)).bundle(
        &categories,
        &products,
        config.sample_size,
    )?;

    // The master script is written last so it never includes a missing unit.
    let files = bundle.files();
    for file in files.iter().skip(1).chain(files.first()) {
        store.write(&layout::sql_file(file.name), file.contents.as_bytes())?;
    }

    tracing::info!(
        categories = categories.len(),
        products = products.len(),
        sample = config.sample_size.min(products.len()),
        master = %store.describe(&layout::sql_file(SqlBundle::MASTER)),
        "sql scripts written"
    );
    Ok(bundle)
}
