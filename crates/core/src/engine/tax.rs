use rust_decimal::Decimal;

use crate::domain::quote::AppliedTaxRule;
use crate::domain::tax_rule::{ShipTo, TaxRule};

#[derive(Clone, Debug, PartialEq)]
pub struct TaxComputation {
    pub applied: Vec<AppliedTaxRule>,
    pub tax_amount: Decimal,
    pub effective_rate_pct: Decimal,
}

/// Rules matching the destination, in ascending rule id order. The order is
/// part of the engine contract: compound rules see exactly the tax
/// accumulated by the rules ahead of them.
pub fn applicable_rules<'a>(rules: &'a [TaxRule], ship_to: Option<&ShipTo>) -> Vec<&'a TaxRule> {
    let mut matched: Vec<&TaxRule> =
        rules.iter().filter(|rule| rule.jurisdiction.matches(ship_to)).collect();
    matched.sort_by(|a, b| a.id.0.cmp(&b.id.0));
    matched
}

/// Applies the rules to an untaxed base. Plain rules each tax the original
/// base; compound rules tax the base plus everything accumulated so far.
pub fn compute(rules: &[&TaxRule], base: Decimal) -> TaxComputation {
    let mut accumulated = Decimal::ZERO;
    let mut applied = Vec::with_capacity(rules.len());

    for rule in rules {
        let rule_base = if rule.compound { base + accumulated } else { base };
        accumulated += rule_base * rule.rate_pct / Decimal::ONE_HUNDRED;

        applied.push(AppliedTaxRule {
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            rate_pct: rule.rate_pct,
            compound: rule.compound,
        });
    }

    let effective_rate_pct = if base.is_zero() {
        Decimal::ZERO
    } else {
        (accumulated / base * Decimal::ONE_HUNDRED).normalize()
    };

    TaxComputation { applied, tax_amount: accumulated, effective_rate_pct }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::domain::tax_rule::{JurisdictionMatch, ShipTo, TaxRule, TaxRuleId};

    use super::{applicable_rules, compute};

    fn rule(id: &str, rate_pct: Decimal, compound: bool, country: Option<&str>) -> TaxRule {
        TaxRule {
            id: TaxRuleId(id.to_string()),
            name: id.to_uppercase(),
            rate_pct,
            compound,
            jurisdiction: JurisdictionMatch {
                country: country.map(str::to_string),
                region: None,
                postal: None,
            },
        }
    }

    #[test]
    fn compound_rule_taxes_base_plus_accumulated_tax() {
        let standard = rule("tr-a-standard", Decimal::new(10, 0), false, None);
        let stacked = rule("tr-b-stacked", Decimal::new(5, 0), true, None);

        let computation = compute(&[&standard, &stacked], Decimal::new(100, 0));

        assert_eq!(computation.tax_amount, Decimal::new(155, 1));
        assert_eq!(computation.effective_rate_pct, Decimal::new(155, 1));
        assert_eq!(computation.applied.len(), 2);
    }

    #[test]
    fn plain_rules_each_tax_the_original_base() {
        let first = rule("tr-a", Decimal::new(10, 0), false, None);
        let second = rule("tr-b", Decimal::new(5, 0), false, None);

        let computation = compute(&[&first, &second], Decimal::new(100, 0));

        assert_eq!(computation.tax_amount, Decimal::new(15, 0));
    }

    #[test]
    fn rules_are_matched_and_ordered_by_id() {
        let rules = vec![
            rule("tr-b-stacked", Decimal::new(5, 0), true, Some("CA")),
            rule("tr-c-elsewhere", Decimal::new(7, 0), false, Some("US")),
            rule("tr-a-standard", Decimal::new(10, 0), false, Some("CA")),
        ];
        let destination = ShipTo { country: Some("CA".to_string()), region: None, postal: None };

        let matched = applicable_rules(&rules, Some(&destination));

        let ids: Vec<&str> = matched.iter().map(|rule| rule.id.0.as_str()).collect();
        assert_eq!(ids, vec!["tr-a-standard", "tr-b-stacked"]);

        let computation = compute(&matched, Decimal::new(100, 0));
        assert_eq!(computation.tax_amount, Decimal::new(155, 1));
    }

    #[test]
    fn absent_destination_matches_only_global_rules() {
        let rules = vec![
            rule("tr-de-vat", Decimal::new(19, 0), false, Some("DE")),
            rule("tr-global-levy", Decimal::new(2, 0), false, None),
        ];

        let matched = applicable_rules(&rules, None);

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id.0, "tr-global-levy");
    }

    #[test]
    fn no_rules_yield_a_zero_breakdown() {
        let computation = compute(&[], Decimal::new(8000, 2));

        assert!(computation.applied.is_empty());
        assert_eq!(computation.tax_amount, Decimal::ZERO);
        assert_eq!(computation.effective_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn zero_base_reports_zero_effective_rate() {
        let vat = rule("tr-de-vat", Decimal::new(19, 0), false, None);

        let computation = compute(&[&vat], Decimal::ZERO);

        assert_eq!(computation.tax_amount, Decimal::ZERO);
        assert_eq!(computation.effective_rate_pct, Decimal::ZERO);
        assert_eq!(computation.applied.len(), 1);
    }
}
