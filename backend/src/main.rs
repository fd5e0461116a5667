use anyhow::anyhow;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use backend::config::Settings;
use backend::db;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    info!(environment = %settings.environment, database = %settings.database_url, "starting notes api");

    let pool = db::connect(&settings.database_url).await?;
    backend::build(pool, settings)
        .launch()
        .await
        .map_err(|err| anyhow!("Rocket failed to launch: {}", err))?;

    Ok(())
}
