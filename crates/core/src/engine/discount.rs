use rust_decimal::Decimal;

use crate::domain::price_entry::PriceEntry;

/// Discount view of a resolved entry. `net_unit_price` is the price the
/// catalog stores; the list price is reconstructed for display only and is
/// absent unless the discount lies strictly between 0% and 100%.
#[derive(Clone, Debug, PartialEq)]
pub struct DiscountBreakdown {
    pub net_unit_price: Decimal,
    pub discount_pct: Option<Decimal>,
    pub list_unit_price: Option<Decimal>,
}

pub fn discount_breakdown(entry: &PriceEntry) -> DiscountBreakdown {
    let list_unit_price = entry.discount_pct.and_then(|pct| {
        if pct <= Decimal::ZERO || pct >= Decimal::ONE_HUNDRED {
            return None;
        }

        Some(entry.unit_price / (Decimal::ONE - pct / Decimal::ONE_HUNDRED))
    });

    DiscountBreakdown {
        net_unit_price: entry.unit_price,
        discount_pct: entry.discount_pct,
        list_unit_price,
    }
}
