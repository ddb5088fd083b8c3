use anyhow::Context;
use rental_store::{Config, DbService, init_logger_with_file, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env) and configuration
    setup_environment();
    let config = Config::from_env();

    // 2. Logging
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating log dir {dir}"))?;
    }
    init_logger_with_file(
        Some(config.log_level.as_str()),
        config.log_json,
        config.log_dir.as_deref(),
    );
    config.validate()?;

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Movie rental store starting"
    );

    // 3. Open, migrate and define the schema
    let service = DbService::open(&config).await?;

    // 4. Summary
    for (table, count) in service.table_counts().await? {
        tracing::info!(table = %table, count, "Table ready");
    }

    tracing::info!("Database ready");
    Ok(())
}
