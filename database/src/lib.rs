pub mod database_error;
mod database_path;
pub mod models;
pub mod repository;
pub mod repository_manager;
pub mod test_fixtures;

use std::{str::FromStr, sync::Arc};

use sqlx::{
    Pool, Sqlite, SqlitePool, migrate,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub use database_path::get_database_url;

/// Connects to the database at `DATABASE_URL` (or the default data dir) and applies migrations.
pub async fn get_db_pool() -> Result<Arc<Pool<Sqlite>>, sqlx::Error> {
    let db_url = database_path::get_database_url()?;
    connect(&db_url).await
}

pub async fn connect(db_url: &str) -> Result<Arc<Pool<Sqlite>>, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    migrate!("./migrations").run(&pool).await?;
    tracing::info!("Connected to database {}", db_url);
    Ok(Arc::new(pool))
}

pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Failed to parse in-memory database url")
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .expect("Failed to connect to the in-memory SQLite database");

    migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}
