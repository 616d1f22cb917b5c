use std::sync::Arc;

use barbershop_api::config::ApiConfig;
use barbershop_core::{BookingService, ShopSettings};
use barbershop_db::{create_pool, schema::initialize_database, PgStore};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    let settings = ShopSettings::from_env()?;

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    // One store serves both the directory and the appointment book
    let store = Arc::new(PgStore::new(db_pool));
    let booking = BookingService::new(store.clone(), store, Arc::new(settings));

    // Start API server
    barbershop_api::start_server(config, booking).await?;

    Ok(())
}
