use std::collections::HashMap;

use tokio::sync::RwLock;

use linequote_core::domain::price_book::{PriceBook, PriceBookId};
use linequote_core::domain::price_entry::{PriceEntry, ProductId, VariantId};
use linequote_core::domain::tax_rule::TaxRule;

use super::{PriceBookRepository, PriceEntryRepository, RepositoryError, TaxRuleRepository};

/// In-memory catalog stores for tests and the smoke path. The repository
/// traits stay read-only like their SQL counterparts; seeding goes through
/// the inherent `save` methods.
#[derive(Default)]
pub struct InMemoryPriceBookRepository {
    books: RwLock<HashMap<String, PriceBook>>,
}

impl InMemoryPriceBookRepository {
    pub async fn save(&self, book: PriceBook) {
        let mut books = self.books.write().await;
        books.insert(book.id.0.clone(), book);
    }
}

#[async_trait::async_trait]
impl PriceBookRepository for InMemoryPriceBookRepository {
    async fn find_by_id(&self, id: &PriceBookId) -> Result<Option<PriceBook>, RepositoryError> {
        let books = self.books.read().await;
        Ok(books.get(&id.0).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryPriceEntryRepository {
    entries: RwLock<Vec<PriceEntry>>,
}

impl InMemoryPriceEntryRepository {
    pub async fn save(&self, entry: PriceEntry) {
        let mut entries = self.entries.write().await;
        entries.push(entry);
    }
}

#[async_trait::async_trait]
impl PriceEntryRepository for InMemoryPriceEntryRepository {
    async fn list_for_scope(
        &self,
        price_book_id: &PriceBookId,
        product_id: &ProductId,
        variant_id: Option<&VariantId>,
    ) -> Result<Vec<PriceEntry>, RepositoryError> {
        let entries = self.entries.read().await;
        let mut matched: Vec<PriceEntry> = entries
            .iter()
            .filter(|entry| entry.price_book_id == *price_book_id)
            .filter(|entry| {
                entry.product_id.as_ref() == Some(product_id)
                    || variant_id.map_or(false, |want| entry.variant_id.as_ref() == Some(want))
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(matched)
    }
}

#[derive(Default)]
pub struct InMemoryTaxRuleRepository {
    rules: RwLock<Vec<TaxRule>>,
}

impl InMemoryTaxRuleRepository {
    pub async fn save(&self, rule: TaxRule) {
        let mut rules = self.rules.write().await;
        rules.push(rule);
    }
}

#[async_trait::async_trait]
impl TaxRuleRepository for InMemoryTaxRuleRepository {
    async fn list_all(&self) -> Result<Vec<TaxRule>, RepositoryError> {
        let rules = self.rules.read().await;
        let mut all: Vec<TaxRule> = rules.clone();
        all.sort_by(|a, b| a.id.0.cmp(&b.id.0));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use linequote_core::domain::price_book::{PriceBook, PriceBookId};
    use linequote_core::domain::price_entry::{PriceEntry, PriceEntryId, ProductId, VariantId};
    use linequote_core::domain::tax_rule::{JurisdictionMatch, TaxRule, TaxRuleId};

    use crate::repositories::{
        InMemoryPriceBookRepository, InMemoryPriceEntryRepository, InMemoryTaxRuleRepository,
        PriceBookRepository, PriceEntryRepository, TaxRuleRepository,
    };

    fn entry(id: &str, book: &str, product: Option<&str>, variant: Option<&str>) -> PriceEntry {
        PriceEntry {
            id: PriceEntryId(id.to_string()),
            price_book_id: PriceBookId(book.to_string()),
            product_id: product.map(|p| ProductId(p.to_string())),
            variant_id: variant.map(|v| VariantId(v.to_string())),
            unit_price: Decimal::new(1000, 2),
            min_qty: None,
            max_qty: None,
            discount_pct: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn in_memory_price_book_repo_round_trip() {
        let repo = InMemoryPriceBookRepository::default();
        let book = PriceBook {
            id: PriceBookId("pb-usd".to_string()),
            currency: "USD".to_string(),
            is_default: true,
            is_active: true,
        };

        repo.save(book.clone()).await;
        let found = repo.find_by_id(&book.id).await.expect("find book");

        assert_eq!(found, Some(book));
    }

    #[tokio::test]
    async fn in_memory_entries_filter_by_book_and_scope() {
        let repo = InMemoryPriceEntryRepository::default();
        repo.save(entry("pe-product", "pb-1", Some("prod-a"), None)).await;
        repo.save(entry("pe-variant", "pb-1", None, Some("var-a-red"))).await;
        repo.save(entry("pe-other-product", "pb-1", Some("prod-b"), None)).await;
        repo.save(entry("pe-other-book", "pb-2", Some("prod-a"), None)).await;

        let listed = repo
            .list_for_scope(
                &PriceBookId("pb-1".to_string()),
                &ProductId("prod-a".to_string()),
                Some(&VariantId("var-a-red".to_string())),
            )
            .await
            .expect("list entries");

        let ids: Vec<&str> = listed.iter().map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, vec!["pe-product", "pe-variant"]);
    }

    #[tokio::test]
    async fn in_memory_entries_skip_variants_when_none_requested() {
        let repo = InMemoryPriceEntryRepository::default();
        repo.save(entry("pe-product", "pb-1", Some("prod-a"), None)).await;
        repo.save(entry("pe-variant", "pb-1", None, Some("var-a-red"))).await;

        let listed = repo
            .list_for_scope(
                &PriceBookId("pb-1".to_string()),
                &ProductId("prod-a".to_string()),
                None,
            )
            .await
            .expect("list entries");

        let ids: Vec<&str> = listed.iter().map(|e| e.id.0.as_str()).collect();
        assert_eq!(ids, vec!["pe-product"]);
    }

    #[tokio::test]
    async fn in_memory_tax_rules_list_sorted_by_id() {
        let repo = InMemoryTaxRuleRepository::default();
        repo.save(TaxRule {
            id: TaxRuleId("tr-b".to_string()),
            name: "Second".to_string(),
            rate_pct: Decimal::new(5, 0),
            compound: false,
            jurisdiction: JurisdictionMatch::default(),
        })
        .await;
        repo.save(TaxRule {
            id: TaxRuleId("tr-a".to_string()),
            name: "First".to_string(),
            rate_pct: Decimal::new(10, 0),
            compound: false,
            jurisdiction: JurisdictionMatch::default(),
        })
        .await;

        let rules = repo.list_all().await.expect("list rules");
        let ids: Vec<&str> = rules.iter().map(|r| r.id.0.as_str()).collect();

        assert_eq!(ids, vec!["tr-a", "tr-b"]);
    }
}
