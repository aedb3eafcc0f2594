mod stages;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shopsql_scraper::CatalogClient;
use shopsql_store::FsStore;

#[derive(Debug, Parser)]
#[command(name = "shopsql")]
#[command(about = "Storefront catalog to SQL import pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every product page and write raw/all_products.json
    FetchProducts,
    /// Fetch the product list of every taxonomy collection
    FetchCollections,
    /// Download product images listed in raw/all_products.json
    Images,
    /// Normalize raw data into import_ready/
    Prepare,
    /// Generate the sql/ scripts from import_ready/
    Sql,
    /// Execute the generated scripts against DATABASE_URL in one transaction
    Apply,
    /// Run fetch-products, fetch-collections, images, prepare and sql in order
    Run {
        /// Do not download images
        #[arg(long)]
        skip_images: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = shopsql_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = FsStore::new(&config.output_dir);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::FetchProducts => {
            stages::fetch_products(&config, &build_client(&config)?, &store).await?;
        }
        Commands::FetchCollections => {
            stages::fetch_collections(&config, &build_client(&config)?, &store).await?;
        }
        Commands::Images => {
            stages::download_images(&config, &build_client(&config)?, &store).await?;
        }
        Commands::Prepare => {
            stages::prepare(&config, &store)?;
        }
        Commands::Sql => {
            stages::generate_sql(&config, &store)?;
        }
        Commands::Apply => {
            stages::apply(&config, &store).await?;
        }
        Commands::Run { skip_images } => {
            stages::run_pipeline(&config, &build_client(&config)?, &store, skip_images).await?;
        }
    }

    Ok(())
}

fn build_client(config: &shopsql_core::AppConfig) -> anyhow::Result<CatalogClient> {
    CatalogClient::new(
        &config.source_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )
    .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))
}
