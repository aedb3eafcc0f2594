use anyhow::Context;

use shopsql_core::AppConfig;
use shopsql_emit::SqlBundle;
use shopsql_store::{
    apply_scripts, connect_pool, layout, ping, ArtifactStore, PoolConfig, ScriptUnit,
};

/// Reads the generated import units in master-script order.
///
/// # Errors
///
/// Returns an error if a unit is missing or not UTF-8.
pub(crate) fn load_import_units(store: &dyn ArtifactStore) -> anyhow::Result<Vec<(&'static str, String)>> {
    SqlBundle::IMPORT_ORDER
        .into_iter()
        .map(|name| -> anyhow::Result<(&'static str, String)> {
            let bytes = store.read(&layout::sql_file(name))?;
            let sql = String::from_utf8(bytes)
                .with_context(|| format!("{name} is not valid UTF-8"))?;
            Ok((name, sql))
        })
        .collect()
}

/// Executes the generated scripts against `DATABASE_URL` in one transaction.
/// Returns the number of rows affected.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, a script is missing, the
/// connection fails, or any statement fails (nothing is committed).
pub(crate) async fn apply(config: &AppConfig, store: &dyn ArtifactStore) -> anyhow::Result<u64> {
    let database_url = config.require_database_url()?;
    let scripts = load_import_units(store)?;

    let pool = connect_pool(database_url, PoolConfig::default())
        .await
        .context("failed to connect to DATABASE_URL")?;
    ping(&pool).await.context("database ping failed")?;

    let units: Vec<ScriptUnit<'_>> = scripts
        .iter()
        .map(|(name, sql)| ScriptUnit {
            name,
            sql: sql.as_str(),
        })
        .collect();
    let rows = apply_scripts(&pool, &units).await?;
    pool.close().await;

    tracing::info!(scripts = units.len(), rows, "import applied");
    Ok(rows)
}
