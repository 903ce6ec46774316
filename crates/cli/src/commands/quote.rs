use clap::Args;
use serde::Serialize;

use crate::commands::{command_context, open_catalog_pool, CommandResult};
use linequote_core::domain::price_book::PriceBookId;
use linequote_core::domain::price_entry::{ProductId, VariantId};
use linequote_core::domain::quote::{PriceQuoteResult, QuoteRequest, TaxBasis};
use linequote_core::domain::tax_rule::ShipTo;
use linequote_core::engine::{DeterministicQuotingEngine, QuotingEngine};
use linequote_core::errors::QuoteError;
use linequote_db::repositories::SqlCatalogLoader;

#[derive(Debug, Args)]
pub struct QuoteArgs {
    #[arg(long, help = "Product to price")]
    pub product_id: String,
    #[arg(long, help = "Variant of the product, when one is quoted")]
    pub variant_id: Option<String>,
    #[arg(long, help = "Price book to resolve against")]
    pub price_book_id: String,
    #[arg(long, help = "Units on the line")]
    pub quantity: u32,
    #[arg(long, help = "Destination country code")]
    pub country: Option<String>,
    #[arg(long, help = "Destination region or state code")]
    pub region: Option<String>,
    #[arg(long, help = "Destination postal code")]
    pub postal: Option<String>,
    #[arg(long, help = "Treat catalog prices as tax inclusive")]
    pub inclusive: bool,
}

pub fn run(args: QuoteArgs) -> CommandResult {
    let (config, runtime) = match command_context("quote") {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let request = request_from_args(args);

    let result = runtime.block_on(async {
        let pool = open_catalog_pool(&config).await?;

        let snapshot = SqlCatalogLoader::new(pool.clone())
            .load(&request.price_book_id, &request.product_id, request.variant_id.as_ref())
            .await
            .map_err(|error| ("catalog_read", error.to_string(), 4u8));

        pool.close().await;
        snapshot
    });

    let snapshot = match result {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            let error =
                QuoteError::PriceBookNotFound { price_book_id: request.price_book_id.clone() };
            return CommandResult::failure("quote", "quoting", error.to_string(), 1);
        }
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("quote", error_class, message, exit_code);
        }
    };

    match DeterministicQuotingEngine.quote(&snapshot, &request) {
        Ok(outcome) => {
            #[derive(Serialize)]
            struct QuoteOutput<'a> {
                command: &'static str,
                quote: &'a PriceQuoteResult,
            }

            let payload = QuoteOutput { command: "quote", quote: &outcome.quote };
            let output = serde_json::to_string_pretty(&payload).unwrap_or_else(|error| {
                format!(
                    "{{\"command\":\"quote\",\"status\":\"error\",\"error\":\"{}\"}}",
                    error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
                )
            });

            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult::failure("quote", "quoting", error.to_string(), 1),
    }
}

fn request_from_args(args: QuoteArgs) -> QuoteRequest {
    let ship_to = if args.country.is_some() || args.region.is_some() || args.postal.is_some() {
        Some(ShipTo { country: args.country, region: args.region, postal: args.postal })
    } else {
        None
    };

    QuoteRequest {
        product_id: ProductId(args.product_id),
        variant_id: args.variant_id.map(VariantId),
        price_book_id: PriceBookId(args.price_book_id),
        quantity: args.quantity,
        ship_to,
        basis: if args.inclusive { TaxBasis::Inclusive } else { TaxBasis::Exclusive },
    }
}
