use linequote_core::domain::price_book::{PriceBook, PriceBookId};
use sqlx::Row;

use super::{PriceBookRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPriceBookRepository {
    pool: DbPool,
}

impl SqlPriceBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PriceBookRepository for SqlPriceBookRepository {
    async fn find_by_id(&self, id: &PriceBookId) -> Result<Option<PriceBook>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, currency, is_default, is_active FROM price_book WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(PriceBook {
                id: PriceBookId(row.try_get("id")?),
                currency: row.try_get("currency")?,
                is_default: row.try_get("is_default")?,
                is_active: row.try_get("is_active")?,
            })
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use linequote_core::domain::price_book::PriceBookId;

    use crate::repositories::{PriceBookRepository, SqlPriceBookRepository};
    use crate::{connect_with_settings, migrations, DbPool};

    #[tokio::test]
    async fn find_by_id_returns_stored_book_with_flags() {
        let pool = setup_pool().await;
        insert_price_book(&pool, "pb-eu-retail", "EUR", true, true).await;
        insert_price_book(&pool, "pb-legacy-2023", "EUR", false, false).await;

        let repo = SqlPriceBookRepository::new(pool.clone());
        let book = repo
            .find_by_id(&PriceBookId("pb-legacy-2023".to_string()))
            .await
            .expect("find book")
            .expect("book present");

        assert_eq!(book.currency, "EUR");
        assert!(!book.is_default);
        assert!(!book.is_active);

        pool.close().await;
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_unknown_book() {
        let pool = setup_pool().await;

        let repo = SqlPriceBookRepository::new(pool.clone());
        let book =
            repo.find_by_id(&PriceBookId("pb-missing".to_string())).await.expect("find book");

        assert!(book.is_none());

        pool.close().await;
    }

    async fn setup_pool() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 30)
            .await
            .expect("connect test pool");
        migrations::run_pending(&pool).await.expect("run migrations");
        pool
    }

    async fn insert_price_book(
        pool: &DbPool,
        id: &str,
        currency: &str,
        is_default: bool,
        is_active: bool,
    ) {
        let timestamp = "2026-01-05T00:00:00Z";
        sqlx::query(
            "INSERT INTO price_book (id, currency, is_default, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(currency)
        .bind(is_default)
        .bind(is_active)
        .bind(timestamp)
        .bind(timestamp)
        .execute(pool)
        .await
        .expect("insert price book");
    }
}
