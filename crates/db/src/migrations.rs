use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Catalog tables the connected database exposes, in name order. A fresh
/// database reports an empty list until migrations run.
pub async fn visible_catalog_tables(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master
         WHERE type = 'table' AND name IN ('price_book', 'price_entry', 'tax_rule')
         ORDER BY name",
    )
    .fetch_all(pool)
    .await
}
