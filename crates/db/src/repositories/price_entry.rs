use std::str::FromStr;

use chrono::{DateTime, Utc};
use linequote_core::domain::price_book::PriceBookId;
use linequote_core::domain::price_entry::{PriceEntry, PriceEntryId, ProductId, VariantId};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, Row};

use super::{PriceEntryRepository, RepositoryError};
use crate::DbPool;

pub struct SqlPriceEntryRepository {
    pool: DbPool,
}

impl SqlPriceEntryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn entry_from_row(row: &SqliteRow) -> Result<PriceEntry, RepositoryError> {
        let unit_price_text: String = row.try_get("unit_price_text")?;
        let discount_pct_text: Option<String> = row.try_get("discount_pct_text")?;
        let min_qty: Option<i64> = row.try_get("min_qty")?;
        let max_qty: Option<i64> = row.try_get("max_qty")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        Ok(PriceEntry {
            id: PriceEntryId(row.try_get("id")?),
            price_book_id: PriceBookId(row.try_get("price_book_id")?),
            product_id: row.try_get::<Option<String>, _>("product_id")?.map(ProductId),
            variant_id: row.try_get::<Option<String>, _>("variant_id")?.map(VariantId),
            unit_price: Self::parse_decimal("unit_price", &unit_price_text)?,
            min_qty: min_qty.map(|value| Self::quantity_bound("min_qty", value)).transpose()?,
            max_qty: max_qty.map(|value| Self::quantity_bound("max_qty", value)).transpose()?,
            discount_pct: discount_pct_text
                .as_deref()
                .map(|value| Self::parse_decimal("discount_pct", value))
                .transpose()?,
            created_at,
        })
    }

    fn parse_decimal(field: &str, value: &str) -> Result<Decimal, RepositoryError> {
        Decimal::from_str(value).map_err(|error| {
            RepositoryError::Decode(format!("invalid decimal value for {field}: {error}"))
        })
    }

    fn quantity_bound(field: &str, value: i64) -> Result<u32, RepositoryError> {
        u32::try_from(value).map_err(|_| {
            RepositoryError::Decode(format!("{field} value `{value}` does not fit in u32"))
        })
    }
}

#[async_trait::async_trait]
impl PriceEntryRepository for SqlPriceEntryRepository {
    async fn list_for_scope(
        &self,
        price_book_id: &PriceBookId,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> Result<Vec<PriceEntry>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                price_book_id,
                product_id,
                variant_id,
                CAST(unit_price AS TEXT) AS unit_price_text,
                min_qty,
                max_qty,
                CAST(discount_pct AS TEXT) AS discount_pct_text,
                created_at
            FROM price_entry
            WHERE price_book_id = ? AND (product_id = ? OR variant_id = ?)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(&price_book_id.0)
        .bind(&product_id.0)
        .bind(variant_id.map(|variant| variant.0.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::entry_from_row).collect()
    }
}
