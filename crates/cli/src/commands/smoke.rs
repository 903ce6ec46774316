use std::time::Instant;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::CommandResult;
use linequote_core::config::{AppConfig, LoadOptions};
use linequote_core::domain::price_book::{PriceBook, PriceBookId};
use linequote_core::domain::price_entry::{PriceEntry, PriceEntryId, ProductId};
use linequote_core::domain::quote::{QuoteRequest, TaxBasis};
use linequote_core::domain::tax_rule::{JurisdictionMatch, ShipTo, TaxRule, TaxRuleId};
use linequote_core::engine::{CatalogSnapshot, DeterministicQuotingEngine, QuotingEngine};
use linequote_db::{connect_with_settings, migrations};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Pass,
                elapsed_ms,
                message: "configuration loaded and validated".to_string(),
            });
            Some(config)
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck {
                name: "config_validation",
                status: SmokeStatus::Fail,
                elapsed_ms,
                message: error.to_string(),
            });
            None
        }
    };

    // Pure engine check, runs even when configuration is broken.
    checks.push(engine_determinism_check());

    let Some(config) = config else {
        checks.push(skipped("db_connectivity"));
        checks.push(skipped("migration_visibility"));
        return finalize_report(checks, started.elapsed().as_millis() as u64);
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Fail,
                elapsed_ms: 0,
                message: format!("failed to initialize async runtime: {error}"),
            });
            checks.push(skipped("migration_visibility"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let db_started = Instant::now();
    let db_result = runtime.block_on(async {
        connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
    });

    let pool = match db_result {
        Ok(pool) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Pass,
                elapsed_ms: db_started.elapsed().as_millis() as u64,
                message: format!("connected using `{}`", config.database.url),
            });
            pool
        }
        Err(error) => {
            checks.push(SmokeCheck {
                name: "db_connectivity",
                status: SmokeStatus::Fail,
                elapsed_ms: db_started.elapsed().as_millis() as u64,
                message: format!("failed to connect: {error}"),
            });
            checks.push(skipped("migration_visibility"));
            return finalize_report(checks, started.elapsed().as_millis() as u64);
        }
    };

    let migration_started = Instant::now();
    let migration_result = runtime.block_on(async { migrations::run_pending(&pool).await });
    runtime.block_on(async {
        pool.close().await;
    });

    match migration_result {
        Ok(()) => checks.push(SmokeCheck {
            name: "migration_visibility",
            status: SmokeStatus::Pass,
            elapsed_ms: migration_started.elapsed().as_millis() as u64,
            message: "migrations are visible and executable".to_string(),
        }),
        Err(error) => checks.push(SmokeCheck {
            name: "migration_visibility",
            status: SmokeStatus::Fail,
            elapsed_ms: migration_started.elapsed().as_millis() as u64,
            message: format!("migration execution failed: {error}"),
        }),
    }

    finalize_report(checks, started.elapsed().as_millis() as u64)
}

/// Quotes a fixed reference catalog and compares against hand-computed
/// totals. Any drift here means the pricing math changed.
fn engine_determinism_check() -> SmokeCheck {
    let started = Instant::now();

    let request = QuoteRequest {
        product_id: ProductId("prod-desk-01".to_string()),
        variant_id: None,
        price_book_id: PriceBookId("pb-smoke".to_string()),
        quantity: 10,
        ship_to: Some(ShipTo { country: Some("DE".to_string()), region: None, postal: None }),
        basis: TaxBasis::Exclusive,
    };

    let expected_unit = Decimal::new(800, 2);
    let expected_tax = Decimal::new(1520, 2);
    let expected_total = Decimal::new(9520, 2);

    match DeterministicQuotingEngine.quote(&reference_catalog(), &request) {
        Ok(outcome)
            if outcome.quote.unit_price == expected_unit
                && outcome.quote.tax.tax_amount == expected_tax
                && outcome.quote.line_total == expected_total =>
        {
            SmokeCheck {
                name: "engine_determinism",
                status: SmokeStatus::Pass,
                elapsed_ms: started.elapsed().as_millis() as u64,
                message: format!("reference quote priced to {expected_total} as expected"),
            }
        }
        Ok(outcome) => SmokeCheck {
            name: "engine_determinism",
            status: SmokeStatus::Fail,
            elapsed_ms: started.elapsed().as_millis() as u64,
            message: format!(
                "reference quote priced to {} instead of {expected_total}",
                outcome.quote.line_total
            ),
        },
        Err(error) => SmokeCheck {
            name: "engine_determinism",
            status: SmokeStatus::Fail,
            elapsed_ms: started.elapsed().as_millis() as u64,
            message: format!("reference quote failed: {error}"),
        },
    }
}

fn reference_catalog() -> CatalogSnapshot {
    let entry = |id: &str, unit_price: Decimal, min_qty, max_qty, discount_pct| PriceEntry {
        id: PriceEntryId(id.to_string()),
        price_book_id: PriceBookId("pb-smoke".to_string()),
        product_id: Some(ProductId("prod-desk-01".to_string())),
        variant_id: None,
        unit_price,
        min_qty,
        max_qty,
        discount_pct,
        created_at: DateTime::UNIX_EPOCH,
    };

    CatalogSnapshot {
        price_book: PriceBook {
            id: PriceBookId("pb-smoke".to_string()),
            currency: "EUR".to_string(),
            is_default: true,
            is_active: true,
        },
        entries: vec![
            entry("pe-smoke-tier1", Decimal::new(1000, 2), Some(1), Some(9), None),
            entry("pe-smoke-tier2", Decimal::new(800, 2), Some(10), None, Some(Decimal::new(20, 0))),
        ],
        tax_rules: vec![TaxRule {
            id: TaxRuleId("tr-smoke-de-vat".to_string()),
            name: "DE VAT".to_string(),
            rate_pct: Decimal::new(19, 0),
            compound: false,
            jurisdiction: JurisdictionMatch {
                country: Some("DE".to_string()),
                region: None,
                postal: None,
            },
        }],
    }
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((started.elapsed().as_millis() as u64, value)),
        Err(error) => Err((started.elapsed().as_millis() as u64, error)),
    }
}

fn skipped(name: &'static str) -> SmokeCheck {
    SmokeCheck {
        name,
        status: SmokeStatus::Skipped,
        elapsed_ms: 0,
        message: "skipped because an earlier check failed".to_string(),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}

#[cfg(test)]
mod tests {
    use super::{engine_determinism_check, SmokeStatus};

    #[test]
    fn reference_quote_matches_expected_totals() {
        let check = engine_determinism_check();

        assert_eq!(check.status, SmokeStatus::Pass);
        assert!(check.message.contains("95.20"));
    }
}
