//! Quote API routes.
//!
//! JSON API Endpoints:
//! - `POST /api/v1/quote` — price one line item against the current catalog
//!
//! A quote request either prices or it does not; both answers travel as a
//! 200 with an `ok` flag. Non-2xx statuses are reserved for transport-level
//! faults such as an unreachable catalog store.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use linequote_core::domain::price_book::PriceBookId;
use linequote_core::domain::price_entry::{ProductId, VariantId};
use linequote_core::domain::quote::{PriceQuoteResult, QuoteRequest, TaxBasis};
use linequote_core::domain::tax_rule::ShipTo;
use linequote_core::engine::{DeterministicQuotingEngine, QuotingEngine};
use linequote_core::errors::{ApplicationError, QuoteError};
use linequote_db::repositories::{RepositoryError, SqlCatalogLoader};
use linequote_db::DbPool;

#[derive(Clone)]
pub struct QuoteApiState {
    db_pool: DbPool,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Wire shape of a quote request. `quantity` arrives as a JSON number and is
/// validated before anything touches the catalog; a non-positive, fractional
/// or oversized value is answered as a value-level error, not a 4xx.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteApiRequest {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub price_book_id: String,
    pub quantity: f64,
    #[serde(default)]
    pub ship_to: Option<ShipTo>,
    #[serde(default)]
    pub basis: Option<TaxBasis>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponseBody {
    pub ok: bool,
    #[serde(flatten)]
    pub quote: Option<PriceQuoteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<QuoteErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct QuoteErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    pub error: String,
    pub correlation_id: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/api/v1/quote", post(create_quote))
        .with_state(QuoteApiState { db_pool })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn create_quote(
    State(state): State<QuoteApiState>,
    Json(body): Json<QuoteApiRequest>,
) -> Result<Json<QuoteResponseBody>, (StatusCode, Json<ServiceError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    let quantity = match validated_quantity(body.quantity) {
        Ok(quantity) => quantity,
        Err(quote_error) => {
            info!(
                event_name = "quote.rejected",
                correlation_id = %correlation_id,
                code = quote_error.code(),
                "quote request rejected before catalog resolution"
            );
            return Ok(Json(failure(&quote_error)));
        }
    };

    let request = QuoteRequest {
        product_id: ProductId(body.product_id),
        variant_id: body.variant_id.map(VariantId),
        price_book_id: PriceBookId(body.price_book_id),
        quantity,
        ship_to: body.ship_to,
        basis: body.basis.unwrap_or_default(),
    };

    // Fresh snapshot per request; it is dropped as soon as the quote returns.
    let loader = SqlCatalogLoader::new(state.db_pool.clone());
    let snapshot = loader
        .load(&request.price_book_id, &request.product_id, request.variant_id.as_ref())
        .await
        .map_err(|db_fault| catalog_unavailable(&correlation_id, db_fault))?;

    let Some(snapshot) = snapshot else {
        let quote_error =
            QuoteError::PriceBookNotFound { price_book_id: request.price_book_id.clone() };
        info!(
            event_name = "quote.rejected",
            correlation_id = %correlation_id,
            code = quote_error.code(),
            price_book_id = %request.price_book_id.0,
            "quote request named an unknown price book"
        );
        return Ok(Json(failure(&quote_error)));
    };

    match DeterministicQuotingEngine.quote(&snapshot, &request) {
        Ok(outcome) => {
            if let Some(overlap) = &outcome.overlap {
                warn!(
                    event_name = "quote.price_overlap",
                    correlation_id = %correlation_id,
                    price_book_id = %overlap.price_book_id.0,
                    quantity = overlap.quantity,
                    selected = %overlap.selected.0,
                    contenders = ?overlap
                        .contenders
                        .iter()
                        .map(|id| id.0.as_str())
                        .collect::<Vec<_>>(),
                    "multiple price entries matched one quantity"
                );
            }
            info!(
                event_name = "quote.priced",
                correlation_id = %correlation_id,
                product_id = %request.product_id.0,
                price_book_id = %request.price_book_id.0,
                quantity = request.quantity,
                "quote priced"
            );
            Ok(Json(success(outcome.quote)))
        }
        Err(quote_error) => {
            info!(
                event_name = "quote.rejected",
                correlation_id = %correlation_id,
                code = quote_error.code(),
                "quote request rejected"
            );
            Ok(Json(failure(&quote_error)))
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validated_quantity(raw: f64) -> Result<u32, QuoteError> {
    if !raw.is_finite() || raw <= 0.0 || raw.fract() != 0.0 || raw > f64::from(u32::MAX) {
        return Err(QuoteError::InvalidQuantity { given: raw.to_string() });
    }
    Ok(raw as u32)
}

fn success(quote: PriceQuoteResult) -> QuoteResponseBody {
    QuoteResponseBody { ok: true, quote: Some(quote), error: None }
}

fn failure(quote_error: &QuoteError) -> QuoteResponseBody {
    QuoteResponseBody {
        ok: false,
        quote: None,
        error: Some(QuoteErrorBody {
            code: quote_error.code(),
            message: quote_error.to_string(),
        }),
    }
}

fn catalog_unavailable(
    correlation_id: &str,
    db_fault: RepositoryError,
) -> (StatusCode, Json<ServiceError>) {
    error!(
        event_name = "quote.catalog_read_failed",
        correlation_id = %correlation_id,
        error = %db_fault,
        "catalog read failed"
    );
    let interface = ApplicationError::Persistence(db_fault.to_string()).into_interface(correlation_id);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ServiceError {
            error: interface.user_message().to_string(),
            correlation_id: correlation_id.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};
    use linequote_db::{connect_with_settings, migrations, DemoCatalog};

    use super::*;

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 30)
            .await
            .expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        DemoCatalog::load(&pool).await.expect("seed demo catalog");
        pool
    }

    fn state(pool: sqlx::SqlitePool) -> State<QuoteApiState> {
        State(QuoteApiState { db_pool: pool })
    }

    fn request(product: &str, book: &str, quantity: f64) -> QuoteApiRequest {
        QuoteApiRequest {
            product_id: product.to_string(),
            variant_id: None,
            price_book_id: book.to_string(),
            quantity,
            ship_to: None,
            basis: None,
        }
    }

    fn destination(country: &str, region: Option<&str>) -> Option<ShipTo> {
        Some(ShipTo {
            country: Some(country.to_string()),
            region: region.map(str::to_string),
            postal: None,
        })
    }

    #[tokio::test]
    async fn bulk_tier_quote_includes_reconstructed_list_price() {
        let pool = setup().await;
        let mut body = request("prod-desk-01", "pb-eu-retail", 10.0);
        body.ship_to = destination("DE", None);

        let Json(response) = create_quote(state(pool.clone()), Json(body))
            .await
            .expect("transport should succeed");

        assert!(response.ok);
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["unitPrice"], "8.00");
        assert_eq!(value["listUnitPrice"], "10.00");
        assert_eq!(value["discountPct"], "20");
        assert_eq!(value["lineSubtotal"], "80.00");
        assert_eq!(value["tax"]["taxAmount"], "15.20");
        assert_eq!(value["tax"]["effectiveRatePct"], "19");
        assert_eq!(value["lineTotal"], "95.20");
        assert_eq!(value["currency"], "EUR");
        assert_eq!(value["basis"], "EXCLUSIVE");
        pool.close().await;
    }

    #[tokio::test]
    async fn quantity_of_zero_is_rejected_before_the_catalog_is_read() {
        // No migrations on purpose; validation must answer before any query.
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 30)
            .await
            .expect("connect");

        let Json(response) =
            create_quote(state(pool.clone()), Json(request("prod-desk-01", "pb-eu-retail", 0.0)))
                .await
                .expect("transport should succeed");

        assert!(!response.ok);
        let quote_error = response.error.expect("error body");
        assert_eq!(quote_error.code, "InvalidQuantity");
        pool.close().await;
    }

    #[tokio::test]
    async fn fractional_quantity_is_a_value_error() {
        let pool = setup().await;

        let Json(response) =
            create_quote(state(pool.clone()), Json(request("prod-desk-01", "pb-eu-retail", 2.5)))
                .await
                .expect("transport should succeed");

        assert!(!response.ok);
        let quote_error = response.error.expect("error body");
        assert_eq!(quote_error.code, "InvalidQuantity");
        assert!(quote_error.message.contains("2.5"));
        pool.close().await;
    }

    #[tokio::test]
    async fn unknown_price_book_is_a_value_error_not_a_transport_fault() {
        let pool = setup().await;

        let Json(response) =
            create_quote(state(pool.clone()), Json(request("prod-desk-01", "pb-missing", 1.0)))
                .await
                .expect("transport should succeed");

        assert!(!response.ok);
        let quote_error = response.error.expect("error body");
        assert_eq!(quote_error.code, "PriceBookNotFound");
        assert!(quote_error.message.contains("pb-missing"));
        pool.close().await;
    }

    #[tokio::test]
    async fn inactive_price_book_is_reported_by_code() {
        let pool = setup().await;

        let Json(response) =
            create_quote(state(pool.clone()), Json(request("prod-desk-01", "pb-legacy-2023", 1.0)))
                .await
                .expect("transport should succeed");

        assert!(!response.ok);
        assert_eq!(response.error.expect("error body").code, "PriceBookInactive");
        pool.close().await;
    }

    #[tokio::test]
    async fn unpriced_product_yields_no_price_for_quantity() {
        let pool = setup().await;

        let Json(response) =
            create_quote(state(pool.clone()), Json(request("prod-floor-lamp", "pb-eu-retail", 3.0)))
                .await
                .expect("transport should succeed");

        assert!(!response.ok);
        assert_eq!(response.error.expect("error body").code, "NoPriceForQuantity");
        pool.close().await;
    }

    #[tokio::test]
    async fn inclusive_basis_backs_tax_out_of_the_total() {
        let pool = setup().await;
        let mut body = request("prod-desk-01", "pb-eu-retail", 10.0);
        body.ship_to = destination("DE", None);
        body.basis = Some(TaxBasis::Inclusive);

        let Json(response) = create_quote(state(pool.clone()), Json(body))
            .await
            .expect("transport should succeed");

        assert!(response.ok);
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["basis"], "INCLUSIVE");
        assert_eq!(value["lineTotal"], "80.00");
        assert_eq!(value["lineSubtotal"], "67.23");
        assert_eq!(value["tax"]["taxAmount"], "12.77");
        pool.close().await;
    }

    #[tokio::test]
    async fn absent_destination_applies_no_jurisdiction_tax() {
        let pool = setup().await;

        let Json(response) =
            create_quote(state(pool.clone()), Json(request("prod-chair-02", "pb-eu-retail", 2.0)))
                .await
                .expect("transport should succeed");

        assert!(response.ok);
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["lineSubtotal"], "90.00");
        assert_eq!(value["lineTotal"], "90.00");
        assert_eq!(value["tax"]["taxAmount"], "0.00");
        assert_eq!(value["tax"]["effectiveRatePct"], "0");
        assert!(value["tax"]["rules"].as_array().expect("rules array").is_empty());
        pool.close().await;
    }

    #[tokio::test]
    async fn quebec_destination_compounds_qst_on_gst() {
        let pool = setup().await;
        let mut body = request("prod-chair-02", "pb-eu-retail", 2.0);
        body.ship_to = destination("CA", Some("QC"));

        let Json(response) = create_quote(state(pool.clone()), Json(body))
            .await
            .expect("transport should succeed");

        assert!(response.ok);
        let value = serde_json::to_value(&response).expect("serialize");
        let rules = value["tax"]["rules"].as_array().expect("rules array");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["ruleId"], "tr-ca-gst");
        assert_eq!(rules[1]["ruleId"], "tr-ca-qc-qst");
        assert_eq!(rules[1]["compound"], true);
        assert_eq!(value["tax"]["taxAmount"], "13.93");
        assert_eq!(value["lineTotal"], "103.93");
        assert_eq!(value["tax"]["effectiveRatePct"], "15.47375");
        pool.close().await;
    }

    #[tokio::test]
    async fn catalog_failures_surface_as_service_unavailable() {
        // Schema never migrated, so the first catalog read fails.
        let pool = connect_with_settings("sqlite::memory:?cache=shared", 1, 30)
            .await
            .expect("connect");

        let result =
            create_quote(state(pool.clone()), Json(request("prod-desk-01", "pb-eu-retail", 1.0)))
                .await;

        let (status, Json(fault)) = result.err().expect("expected transport fault");
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(fault.error, "The service is temporarily unavailable. Please retry shortly.");
        assert!(!fault.correlation_id.is_empty());
        pool.close().await;
    }
}
