use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::price_book::PriceBookId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceEntryId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryScope {
    Product,
    Variant,
}

/// One quantity-tiered price rule for a product or variant within a price
/// book. Scoped to exactly one of `product_id` / `variant_id`; the stored
/// `unit_price` is the net price with any `discount_pct` already applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub id: PriceEntryId,
    pub price_book_id: PriceBookId,
    pub product_id: Option<ProductId>,
    pub variant_id: Option<VariantId>,
    pub unit_price: Decimal,
    pub min_qty: Option<u32>,
    pub max_qty: Option<u32>,
    pub discount_pct: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl PriceEntry {
    pub fn scope(&self) -> EntryScope {
        if self.variant_id.is_some() {
            EntryScope::Variant
        } else {
            EntryScope::Product
        }
    }

    /// Inclusive tier containment: absent `min_qty` means 0, absent
    /// `max_qty` means unbounded.
    pub fn covers_quantity(&self, quantity: u32) -> bool {
        quantity >= self.min_qty.unwrap_or(0) && self.max_qty.map_or(true, |max| quantity <= max)
    }

    /// Tier width for the overlap tie-break. `None` is an unbounded tier,
    /// treated as infinitely wide.
    pub fn tier_width(&self) -> Option<u32> {
        self.max_qty.map(|max| max.saturating_sub(self.min_qty.unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::price_book::PriceBookId;

    use super::{EntryScope, PriceEntry, PriceEntryId, ProductId, VariantId};

    fn entry(min_qty: Option<u32>, max_qty: Option<u32>) -> PriceEntry {
        PriceEntry {
            id: PriceEntryId("pe-1".to_string()),
            price_book_id: PriceBookId("pb-1".to_string()),
            product_id: Some(ProductId("prod-desk-01".to_string())),
            variant_id: None,
            unit_price: Decimal::new(1000, 2),
            min_qty,
            max_qty,
            discount_pct: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn tier_bounds_are_inclusive() {
        let entry = entry(Some(1), Some(9));

        assert!(entry.covers_quantity(1));
        assert!(entry.covers_quantity(9));
        assert!(!entry.covers_quantity(10));
    }

    #[test]
    fn absent_min_qty_defaults_to_zero() {
        let entry = entry(None, Some(5));

        assert!(entry.covers_quantity(0));
        assert!(entry.covers_quantity(5));
    }

    #[test]
    fn absent_max_qty_is_unbounded() {
        let entry = entry(Some(10), None);

        assert!(entry.covers_quantity(10));
        assert!(entry.covers_quantity(1_000_000));
        assert_eq!(entry.tier_width(), None);
    }

    #[test]
    fn tier_width_spans_min_to_max() {
        assert_eq!(entry(Some(1), Some(9)).tier_width(), Some(8));
        assert_eq!(entry(None, Some(9)).tier_width(), Some(9));
    }

    #[test]
    fn scope_follows_variant_presence() {
        let product_scoped = entry(None, None);
        assert_eq!(product_scoped.scope(), EntryScope::Product);

        let mut variant_scoped = entry(None, None);
        variant_scoped.product_id = None;
        variant_scoped.variant_id = Some(VariantId("var-desk-01-oak".to_string()));
        assert_eq!(variant_scoped.scope(), EntryScope::Variant);
    }
}
