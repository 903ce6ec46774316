use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxRuleId(pub String);

/// Shipping destination supplied with a quote request. All fields are
/// optional; a request may carry no destination at all.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipTo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub postal: Option<String>,
}

/// Jurisdiction conditions on a tax rule. A condition that is `None` is not
/// checked; a rule with no conditions at all is global.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionMatch {
    pub country: Option<String>,
    pub region: Option<String>,
    pub postal: Option<String>,
}

impl JurisdictionMatch {
    pub fn is_global(&self) -> bool {
        self.country.is_none() && self.region.is_none() && self.postal.is_none()
    }

    /// Whether the destination satisfies this rule.
    ///
    /// Every condition the rule sets must match the corresponding
    /// destination field; comparisons are trimmed and case-insensitive.
    /// A global rule matches any destination, including an absent one; a
    /// conditioned rule never matches an absent destination.
    pub fn matches(&self, ship_to: Option<&ShipTo>) -> bool {
        if self.is_global() {
            return true;
        }

        let Some(ship_to) = ship_to else {
            return false;
        };

        condition_matches(self.country.as_deref(), ship_to.country.as_deref())
            && condition_matches(self.region.as_deref(), ship_to.region.as_deref())
            && condition_matches(self.postal.as_deref(), ship_to.postal.as_deref())
    }
}

fn condition_matches(condition: Option<&str>, value: Option<&str>) -> bool {
    match condition {
        None => true,
        Some(expected) => value
            .map(|actual| actual.trim().eq_ignore_ascii_case(expected.trim()))
            .unwrap_or(false),
    }
}

/// A named tax rate with a jurisdiction filter and a compounding flag.
/// `compound` rules tax the base plus tax accumulated by earlier rules;
/// plain rules all tax the original base independently.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaxRule {
    pub id: TaxRuleId,
    pub name: String,
    pub rate_pct: Decimal,
    pub compound: bool,
    pub jurisdiction: JurisdictionMatch,
}
