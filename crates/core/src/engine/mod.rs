pub mod assembler;
pub mod discount;
pub mod resolver;
pub mod tax;

use rust_decimal::Decimal;

use crate::domain::price_book::PriceBook;
use crate::domain::price_entry::PriceEntry;
use crate::domain::quote::{PriceQuoteResult, QuoteRequest};
use crate::domain::tax_rule::TaxRule;
use crate::errors::QuoteError;

pub use self::resolver::PriceOverlap;

/// Catalog state captured for one request. Loaders build a fresh snapshot
/// per quote and drop it afterwards; nothing here outlives the request, so
/// concurrent catalog edits can never tear a quote mid-computation.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogSnapshot {
    pub price_book: PriceBook,
    pub entries: Vec<PriceEntry>,
    pub tax_rules: Vec<TaxRule>,
}

/// A successful quote plus any catalog defect observed on the way. The
/// defect never fails the quote; callers log it for operators.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteOutcome {
    pub quote: PriceQuoteResult,
    pub overlap: Option<PriceOverlap>,
}

pub trait QuotingEngine: Send + Sync {
    fn quote(
        &self,
        snapshot: &CatalogSnapshot,
        request: &QuoteRequest,
    ) -> Result<QuoteOutcome, QuoteError>;
}

#[derive(Default)]
pub struct DeterministicQuotingEngine;

impl QuotingEngine for DeterministicQuotingEngine {
    fn quote(
        &self,
        snapshot: &CatalogSnapshot,
        request: &QuoteRequest,
    ) -> Result<QuoteOutcome, QuoteError> {
        if request.quantity == 0 {
            return Err(QuoteError::InvalidQuantity { given: request.quantity.to_string() });
        }

        if !snapshot.price_book.is_active {
            return Err(QuoteError::PriceBookInactive {
                price_book_id: snapshot.price_book.id.clone(),
            });
        }

        let resolved = resolver::resolve_price(snapshot, request)?;
        let discount = discount::discount_breakdown(&resolved.entry);

        let rules = tax::applicable_rules(&snapshot.tax_rules, request.ship_to.as_ref());
        let base = discount.net_unit_price * Decimal::from(request.quantity);
        let computation = tax::compute(&rules, base);

        let quote = assembler::assemble(
            request.basis,
            &snapshot.price_book.currency,
            request.quantity,
            &discount,
            &computation,
        );

        Ok(QuoteOutcome { quote, overlap: resolved.overlap })
    }
}
