use crate::commands::{command_context, open_catalog_pool, CommandResult, FailurePayload};
use linequote_db::migrations;

pub fn run() -> CommandResult {
    let (config, runtime) = match command_context("migrate") {
        Ok(context) => context,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = open_catalog_pool(&config).await?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), 5u8))?;

        pool.close().await;
        Ok::<(), FailurePayload>(())
    });

    match result {
        Ok(()) => CommandResult::success(
            "migrate",
            "applied pending migrations; catalog schema is current",
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("migrate", error_class, message, exit_code)
        }
    }
}
