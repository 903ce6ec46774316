use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::price_book::PriceBookId;
use crate::domain::price_entry::{ProductId, VariantId};
use crate::domain::tax_rule::{ShipTo, TaxRuleId};

/// Whether the resolved unit price already contains tax.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxBasis {
    #[default]
    Exclusive,
    Inclusive,
}

/// A single line to be quoted. Quantity must be at least one; the engine
/// rejects anything else before touching the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub product_id: ProductId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    pub price_book_id: PriceBookId,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<ShipTo>,
    #[serde(default)]
    pub basis: TaxBasis,
}

/// One tax rule as it participated in a quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedTaxRule {
    pub rule_id: TaxRuleId,
    pub name: String,
    pub rate_pct: Decimal,
    pub compound: bool,
}

/// Tax portion of a quote. `effective_rate_pct` is tax over the taxable
/// base, zero when the base is zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub rules: Vec<AppliedTaxRule>,
    pub tax_amount: Decimal,
    pub effective_rate_pct: Decimal,
}

/// The priced line returned to callers. Monetary fields are rounded to two
/// decimal places; `line_total` always equals `line_subtotal` plus
/// `tax_amount` after rounding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuoteResult {
    pub unit_price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_unit_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_pct: Option<Decimal>,
    pub tax: TaxBreakdown,
    pub line_subtotal: Decimal,
    pub line_total: Decimal,
    pub basis: TaxBasis,
    pub currency: String,
}
