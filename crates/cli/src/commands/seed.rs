use crate::commands::{command_context, open_catalog_pool, CommandResult, FailurePayload};
use linequote_db::{migrations, DemoCatalog};

pub fn run() -> CommandResult {
    let (config, runtime) = match command_context("seed") {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_catalog_pool(&config).await?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        let seed_result = DemoCatalog::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;

        let verification = DemoCatalog::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let run_result: Result<SeedOutput, FailurePayload> = if !verification.all_present {
            Err(("seed_verification", verification_failure_message(&verification.checks), 6u8))
        } else {
            Ok(SeedOutput { books: seed_result.books_seeded })
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(output) => {
            let book_descriptions: Vec<String> = output
                .books
                .iter()
                .map(|b| format!("  - {}: {} ({})", b.price_book_id, b.currency, b.description))
                .collect();
            let message = format!(
                "demo catalog loaded and verified:\n{}",
                book_descriptions.join("\n")
            );
            CommandResult::success("seed", message)
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn verification_failure_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks =
        checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect::<Vec<_>>();

    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}

struct SeedOutput {
    books: Vec<linequote_db::BookSeedInfo>,
}
