pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;

pub use domain::price_book::{PriceBook, PriceBookId};
pub use domain::price_entry::{EntryScope, PriceEntry, PriceEntryId, ProductId, VariantId};
pub use domain::quote::{
    AppliedTaxRule, PriceQuoteResult, QuoteRequest, TaxBasis, TaxBreakdown,
};
pub use domain::tax_rule::{JurisdictionMatch, ShipTo, TaxRule, TaxRuleId};
pub use engine::{
    CatalogSnapshot, DeterministicQuotingEngine, PriceOverlap, QuoteOutcome, QuotingEngine,
};
pub use errors::{ApplicationError, InterfaceError, QuoteError};
