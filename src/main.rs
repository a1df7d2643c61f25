//! conversion-sync - imports warehouse conversion rows into a Google Sheet.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use conversion_sync::cli::Cli;
use conversion_sync::config::Config;
use conversion_sync::error::{ImportError, Result};
use conversion_sync::import::Importer;
use conversion_sync::sheet::{GoogleSheetsClient, MockSheetClient, SheetClient, SheetsConfig};
use conversion_sync::warehouse::{BigQueryClient, BigQueryConfig, WarehouseClient};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Pick up GOOGLE_ACCESS_TOKEN and friends from a local .env if present
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config);
    config.apply_env_defaults();
    config.validate()?;

    let warehouse = build_warehouse_client(&config)?;

    let sheet: Box<dyn SheetClient> = if cli.dry_run {
        info!("Dry run: writing to an in-memory sheet");
        Box::new(MockSheetClient::new())
    } else {
        Box::new(build_sheets_client(&config)?)
    };

    let summary = Importer::new(warehouse.as_ref(), sheet.as_ref(), &config)
        .run()
        .await?;

    if cli.dry_run {
        info!(
            would_write = summary.written,
            skipped = summary.skipped,
            "Dry run complete; nothing was written"
        );
    }

    info!("Done.");
    Ok(())
}

fn build_warehouse_client(config: &Config) -> Result<Box<dyn WarehouseClient>> {
    let table = config.table_ref()?;
    let mut client_config = BigQueryConfig::new(token_from_env()?, table.project);
    if let Some(api_url) = &config.warehouse.api_url {
        client_config = client_config.with_base_url(api_url)?;
    }
    Ok(Box::new(BigQueryClient::new(client_config)?))
}

fn build_sheets_client(config: &Config) -> Result<GoogleSheetsClient> {
    let mut client_config = SheetsConfig::new(token_from_env()?, config.spreadsheet_id()?);
    if let Some(api_url) = &config.sheet.api_url {
        client_config = client_config.with_base_url(api_url)?;
    }
    GoogleSheetsClient::new(client_config)
}

fn token_from_env() -> Result<String> {
    std::env::var("GOOGLE_ACCESS_TOKEN")
        .map_err(|_| ImportError::config("GOOGLE_ACCESS_TOKEN environment variable not set"))
}
