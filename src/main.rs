use dotenvy::dotenv;
use petrichor::{
    bot, config,
    db::DatabaseManager,
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Critical error loading application configuration: {e}"))?;
    info!("Successfully processed application configuration.");

    // 4. Connect to PostgreSQL and make sure the schema is reachable
    let database = DatabaseManager::connect()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database
        .ping_tables()
        .await
        .inspect_err(|e| error!("Failed to list database tables: {e}"))?;

    // 5. Run the bot
    let token = env::var("BOT_TOKEN")
        .inspect_err(|e| error!("BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(app_config), database).await
}
