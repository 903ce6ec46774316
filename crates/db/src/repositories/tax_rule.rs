//! SQLite-backed tax rule repository.
//!
//! Tax rules are few and change rarely, so the repository loads the whole
//! table and leaves jurisdiction filtering to the quoting engine. Rules come
//! back ordered by id so downstream tax application is deterministic.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use std::str::FromStr;

use linequote_core::domain::tax_rule::{JurisdictionMatch, TaxRule, TaxRuleId};

use crate::connection::DbPool;
use crate::repositories::{RepositoryError, TaxRuleRepository};

pub struct SqlTaxRuleRepository {
    pool: DbPool,
}

impl SqlTaxRuleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn rule_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TaxRule, RepositoryError> {
        let rate_text: String = row.try_get("rate_pct_text")?;
        Ok(TaxRule {
            id: TaxRuleId(row.try_get("id")?),
            name: row.try_get("name")?,
            rate_pct: Self::parse_decimal("rate_pct", &rate_text)?,
            compound: row.try_get("compound")?,
            jurisdiction: JurisdictionMatch {
                country: row.try_get("country")?,
                region: row.try_get("region")?,
                postal: row.try_get("postal")?,
            },
        })
    }

    fn parse_decimal(field: &str, value: &str) -> Result<Decimal, RepositoryError> {
        Decimal::from_str(value).map_err(|e| {
            RepositoryError::Decode(format!("tax_rule.{field} is not a valid decimal: {e}"))
        })
    }
}

#[async_trait]
impl TaxRuleRepository for SqlTaxRuleRepository {
    async fn list_all(&self) -> Result<Vec<TaxRule>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id, name, CAST(rate_pct AS TEXT) AS rate_pct_text,
                compound, country, region, postal
            FROM tax_rule
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::rule_from_row).collect()
    }
}
