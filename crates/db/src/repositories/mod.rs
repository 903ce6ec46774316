use async_trait::async_trait;
use thiserror::Error;

use linequote_core::domain::price_book::{PriceBook, PriceBookId};
use linequote_core::domain::price_entry::{PriceEntry, ProductId, VariantId};
use linequote_core::domain::tax_rule::TaxRule;

pub mod memory;
pub mod price_book;
pub mod price_entry;
pub mod snapshot;
pub mod tax_rule;

pub use memory::{
    InMemoryPriceBookRepository, InMemoryPriceEntryRepository, InMemoryTaxRuleRepository,
};
pub use price_book::SqlPriceBookRepository;
pub use price_entry::SqlPriceEntryRepository;
pub use snapshot::SqlCatalogLoader;
pub use tax_rule::SqlTaxRuleRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PriceBookRepository: Send + Sync {
    async fn find_by_id(&self, id: &PriceBookId) -> Result<Option<PriceBook>, RepositoryError>;
}

/// Read access to price entries, scoped the way resolution consumes them:
/// every entry in the book that names the product or the variant.
#[async_trait]
pub trait PriceEntryRepository: Send + Sync {
    async fn list_for_scope(
        &self,
        price_book_id: &PriceBookId,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> Result<Vec<PriceEntry>, RepositoryError>;
}

#[async_trait]
pub trait TaxRuleRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<TaxRule>, RepositoryError>;
}
