use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceBookId(pub String);

/// A named, currency-scoped collection of price entries.
///
/// Currency is immutable per book; the engine never converts between
/// currencies. Callers are expected to keep exactly one active default book
/// per tenant, but the engine does not enforce that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBook {
    pub id: PriceBookId,
    pub currency: String,
    pub is_default: bool,
    pub is_active: bool,
}
