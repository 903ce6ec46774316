use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::price_book::PriceBookId;
use crate::domain::price_entry::{PriceEntry, PriceEntryId};
use crate::domain::quote::QuoteRequest;
use crate::engine::CatalogSnapshot;
use crate::errors::QuoteError;

/// Catalog defect observed during resolution: more than one entry covered
/// the requested quantity. The quote still succeeds with the winning entry;
/// callers surface this to operators instead of the requester.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverlap {
    pub price_book_id: PriceBookId,
    pub quantity: u32,
    pub selected: PriceEntryId,
    pub contenders: Vec<PriceEntryId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPrice {
    pub entry: PriceEntry,
    pub overlap: Option<PriceOverlap>,
}

/// Picks the price entry for a request.
///
/// Variant-scoped entries win over product-scoped ones; when no variant
/// entry covers the quantity, resolution falls back to the product scope.
/// Overlapping tiers are broken by narrowest range first (an unbounded
/// tier counts as infinitely wide), then by most recent `created_at`.
pub fn resolve_price(
    snapshot: &CatalogSnapshot,
    request: &QuoteRequest,
) -> Result<ResolvedPrice, QuoteError> {
    let mut candidates: Vec<&PriceEntry> = match &request.variant_id {
        Some(variant_id) => {
            let variant_entries: Vec<&PriceEntry> = snapshot
                .entries
                .iter()
                .filter(|entry| entry.variant_id.as_ref() == Some(variant_id))
                .filter(|entry| entry.covers_quantity(request.quantity))
                .collect();

            if variant_entries.is_empty() {
                product_candidates(snapshot, request)
            } else {
                variant_entries
            }
        }
        None => product_candidates(snapshot, request),
    };

    if candidates.is_empty() {
        return Err(QuoteError::NoPriceForQuantity {
            product_id: request.product_id.clone(),
            variant_id: request.variant_id.clone(),
            quantity: request.quantity,
        });
    }

    candidates.sort_by(|a, b| tie_break(a, b));

    let entry = candidates[0].clone();
    let overlap = (candidates.len() > 1).then(|| PriceOverlap {
        price_book_id: snapshot.price_book.id.clone(),
        quantity: request.quantity,
        selected: entry.id.clone(),
        contenders: candidates[1..].iter().map(|contender| contender.id.clone()).collect(),
    });

    Ok(ResolvedPrice { entry, overlap })
}

fn product_candidates<'a>(
    snapshot: &'a CatalogSnapshot,
    request: &QuoteRequest,
) -> Vec<&'a PriceEntry> {
    snapshot
        .entries
        .iter()
        .filter(|entry| entry.product_id.as_ref() == Some(&request.product_id))
        .filter(|entry| entry.covers_quantity(request.quantity))
        .collect()
}

fn tie_break(a: &PriceEntry, b: &PriceEntry) -> Ordering {
    match (a.tier_width(), b.tier_width()) {
        (Some(width_a), Some(width_b)) => width_a.cmp(&width_b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| b.created_at.cmp(&a.created_at))
    .then_with(|| a.id.0.cmp(&b.id.0))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use crate::domain::price_book::{PriceBook, PriceBookId};
    use crate::domain::price_entry::{PriceEntry, PriceEntryId, ProductId, VariantId};
    use crate::domain::quote::{QuoteRequest, TaxBasis};
    use crate::engine::CatalogSnapshot;
    use crate::errors::QuoteError;

    use super::resolve_price;

    fn entry(
        id: &str,
        product_id: Option<&str>,
        variant_id: Option<&str>,
        min_qty: Option<u32>,
        max_qty: Option<u32>,
        created_day: u32,
    ) -> PriceEntry {
        PriceEntry {
            id: PriceEntryId(id.to_string()),
            price_book_id: PriceBookId("pb-eu-retail".to_string()),
            product_id: product_id.map(|value| ProductId(value.to_string())),
            variant_id: variant_id.map(|value| VariantId(value.to_string())),
            unit_price: Decimal::new(1000, 2),
            min_qty,
            max_qty,
            discount_pct: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, created_day, 12, 0, 0).unwrap(),
        }
    }

    fn snapshot(entries: Vec<PriceEntry>) -> CatalogSnapshot {
        CatalogSnapshot {
            price_book: PriceBook {
                id: PriceBookId("pb-eu-retail".to_string()),
                currency: "EUR".to_string(),
                is_default: true,
                is_active: true,
            },
            entries,
            tax_rules: Vec::new(),
        }
    }

    fn request(variant_id: Option<&str>, quantity: u32) -> QuoteRequest {
        QuoteRequest {
            product_id: ProductId("prod-desk-01".to_string()),
            variant_id: variant_id.map(|value| VariantId(value.to_string())),
            price_book_id: PriceBookId("pb-eu-retail".to_string()),
            quantity,
            ship_to: None,
            basis: TaxBasis::Exclusive,
        }
    }

    #[test]
    fn variant_entries_win_over_product_entries() {
        let snapshot = snapshot(vec![
            entry("pe-product", Some("prod-desk-01"), None, Some(1), None, 1),
            entry("pe-variant", None, Some("var-desk-01-oak"), Some(1), None, 1),
        ]);

        let resolved = resolve_price(&snapshot, &request(Some("var-desk-01-oak"), 5))
            .expect("variant entry should resolve");

        assert_eq!(resolved.entry.id.0, "pe-variant");
        assert!(resolved.overlap.is_none());
    }

    #[test]
    fn falls_back_to_product_scope_when_no_variant_tier_covers() {
        let snapshot = snapshot(vec![
            entry("pe-variant-small", None, Some("var-desk-01-oak"), Some(1), Some(5), 1),
            entry("pe-product", Some("prod-desk-01"), None, Some(1), None, 1),
        ]);

        let resolved = resolve_price(&snapshot, &request(Some("var-desk-01-oak"), 10))
            .expect("product entry should cover the fallback");

        assert_eq!(resolved.entry.id.0, "pe-product");
    }

    #[test]
    fn narrowest_tier_wins_and_overlap_is_reported() {
        let snapshot = snapshot(vec![
            entry("pe-wide", Some("prod-desk-01"), None, Some(1), Some(100), 1),
            entry("pe-narrow", Some("prod-desk-01"), None, Some(10), Some(20), 1),
        ]);

        let resolved =
            resolve_price(&snapshot, &request(None, 15)).expect("overlap should still resolve");

        assert_eq!(resolved.entry.id.0, "pe-narrow");
        let overlap = resolved.overlap.expect("overlap report");
        assert_eq!(overlap.selected.0, "pe-narrow");
        assert_eq!(overlap.contenders.len(), 1);
        assert_eq!(overlap.contenders[0].0, "pe-wide");
    }

    #[test]
    fn unbounded_tier_loses_to_any_bounded_tier() {
        let snapshot = snapshot(vec![
            entry("pe-open", Some("prod-desk-01"), None, Some(10), None, 1),
            entry("pe-capped", Some("prod-desk-01"), None, Some(10), Some(50), 1),
        ]);

        let resolved =
            resolve_price(&snapshot, &request(None, 20)).expect("bounded tier should win");

        assert_eq!(resolved.entry.id.0, "pe-capped");
    }

    #[test]
    fn most_recent_entry_wins_among_equal_widths() {
        let snapshot = snapshot(vec![
            entry("pe-older", Some("prod-desk-01"), None, Some(1), Some(10), 1),
            entry("pe-newer", Some("prod-desk-01"), None, Some(1), Some(10), 20),
        ]);

        let resolved =
            resolve_price(&snapshot, &request(None, 5)).expect("newer entry should win");

        assert_eq!(resolved.entry.id.0, "pe-newer");
    }

    #[test]
    fn uncovered_quantity_is_a_quote_error() {
        let snapshot = snapshot(vec![entry(
            "pe-small",
            Some("prod-desk-01"),
            None,
            Some(1),
            Some(9),
            1,
        )]);

        let error =
            resolve_price(&snapshot, &request(None, 50)).expect_err("no tier covers qty 50");

        assert!(matches!(error, QuoteError::NoPriceForQuantity { quantity: 50, .. }));
    }
}
