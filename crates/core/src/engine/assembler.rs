use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::quote::{PriceQuoteResult, TaxBasis, TaxBreakdown};
use crate::engine::discount::DiscountBreakdown;
use crate::engine::tax::TaxComputation;

/// Rounds a monetary amount to two decimal places, half away from zero,
/// and pins the scale so every reported amount reads the same way.
pub fn round_minor(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Builds the reported line from unrounded stage outputs. Rounding happens
/// here and nowhere else, and `line_total` always equals `line_subtotal`
/// plus the reported tax amount.
pub fn assemble(
    basis: TaxBasis,
    currency: &str,
    quantity: u32,
    discount: &DiscountBreakdown,
    tax: &TaxComputation,
) -> PriceQuoteResult {
    let gross = discount.net_unit_price * Decimal::from(quantity);

    let (line_subtotal, tax_amount, line_total) = match basis {
        TaxBasis::Exclusive => {
            let line_subtotal = round_minor(gross);
            let tax_amount = round_minor(tax.tax_amount);
            (line_subtotal, tax_amount, line_subtotal + tax_amount)
        }
        TaxBasis::Inclusive => {
            let line_total = round_minor(gross);
            let divisor = Decimal::ONE + tax.effective_rate_pct / Decimal::ONE_HUNDRED;
            let line_subtotal = round_minor(gross / divisor);
            (line_subtotal, line_total - line_subtotal, line_total)
        }
    };

    PriceQuoteResult {
        unit_price: round_minor(discount.net_unit_price),
        list_unit_price: discount.list_unit_price.map(round_minor),
        discount_pct: discount.discount_pct,
        tax: TaxBreakdown {
            rules: tax.applied.clone(),
            tax_amount,
            effective_rate_pct: tax.effective_rate_pct,
        },
        line_subtotal,
        line_total,
        basis,
        currency: currency.to_string(),
    }
}
