use anyhow::Result;
use invoice_verify::config::AppConfig;
use invoice_verify::server::ServerBuilder;
use invoice_verify::storage::InMemoryRecordStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("invoice_verify=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let addr = config.server.bind_address();

    let builder = ServerBuilder::new().with_config(&config);

    #[cfg(feature = "postgres")]
    let builder = match config.database.url {
        Some(_) => {
            use invoice_verify::storage::postgres::{PostgresRecordStore, connect, run_migrations};

            let pool = connect(&config.database).await?;
            run_migrations(&pool).await?;
            tracing::info!("Using PostgreSQL record store");
            builder.with_store(PostgresRecordStore::new(pool))
        }
        None => {
            tracing::warn!("No database configured, records are kept in memory only");
            builder.with_store(InMemoryRecordStore::new())
        }
    };

    #[cfg(not(feature = "postgres"))]
    let builder = {
        if config.database.url.is_some() {
            tracing::warn!("database.url is set but the postgres feature is disabled");
        }
        tracing::warn!("Records are kept in memory only");
        builder.with_store(InMemoryRecordStore::new())
    };

    builder.serve(&addr).await
}
