//! Per-request catalog snapshot assembly.
//!
//! The quoting engine computes over an immutable [`CatalogSnapshot`]; this
//! loader is the only place that turns live tables into one. Each call reads
//! the price book, the price entries in scope, and the tax rules, then hands
//! the snapshot to the caller and forgets it. Snapshots are never cached, so
//! catalog edits are visible on the very next quote.

use linequote_core::domain::price_book::PriceBookId;
use linequote_core::domain::price_entry::{ProductId, VariantId};
use linequote_core::engine::CatalogSnapshot;

use crate::connection::DbPool;
use crate::repositories::{
    PriceBookRepository, PriceEntryRepository, RepositoryError, SqlPriceBookRepository,
    SqlPriceEntryRepository, SqlTaxRuleRepository, TaxRuleRepository,
};

pub struct SqlCatalogLoader {
    books: SqlPriceBookRepository,
    entries: SqlPriceEntryRepository,
    tax_rules: SqlTaxRuleRepository,
}

impl SqlCatalogLoader {
    pub fn new(pool: DbPool) -> Self {
        Self {
            books: SqlPriceBookRepository::new(pool.clone()),
            entries: SqlPriceEntryRepository::new(pool.clone()),
            tax_rules: SqlTaxRuleRepository::new(pool),
        }
    }

    /// Assembles the catalog state one quote needs. Returns `Ok(None)` when
    /// the price book does not exist; the caller decides what that means.
    pub async fn load(
        &self,
        price_book_id: &PriceBookId,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> Result<Option<CatalogSnapshot>, RepositoryError> {
        let Some(price_book) = self.books.find_by_id(price_book_id).await? else {
            return Ok(None);
        };

        let entries = self
            .entries
            .list_for_scope(price_book_id, product_id, variant_id)
            .await?;
        let tax_rules = self.tax_rules.list_all().await?;

        Ok(Some(CatalogSnapshot {
            price_book,
            entries,
            tax_rules,
        }))
    }
}
