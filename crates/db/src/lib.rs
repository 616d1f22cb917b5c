//! PostgreSQL storage for the barbershop: schema bootstrap, row models,
//! query functions and [`PgStore`], which implements the core storage traits.
//! [`mock`] holds the in-memory store and the mockall mocks used by tests.

pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use std::time::Duration;

use eyre::{Result, WrapErr};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use store::PgStore;

pub type DbPool = Pool<Postgres>;

/// Checked writes hold a connection for the whole transaction, so waiting for
/// one is bounded and surfaces as a transient failure.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to database")?;

    Ok(pool)
}
