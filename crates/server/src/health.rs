//! Health routes.
//!
//! JSON API Endpoints:
//! - `GET /health` — database and catalog readiness probes
//!
//! The service is ready when the database answers and the catalog schema is
//! migrated; anything less is a 503 with per-probe detail.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use linequote_db::{migrations, DbPool};

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthProbe {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: HealthProbe,
    pub catalog: HealthProbe,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = database_probe(&state.db_pool).await;
    let catalog = catalog_probe(&state.db_pool).await;
    let ready = database.status == "ready" && catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        database,
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn database_probe(pool: &DbPool) -> HealthProbe {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthProbe { status: "ready", detail: "database query succeeded".to_string() },
        Err(error) => {
            HealthProbe { status: "degraded", detail: format!("database query failed: {error}") }
        }
    }
}

async fn catalog_probe(pool: &DbPool) -> HealthProbe {
    match migrations::visible_catalog_tables(pool).await {
        Ok(tables) if tables == ["price_book", "price_entry", "tax_rule"] => HealthProbe {
            status: "ready",
            detail: "catalog schema is migrated".to_string(),
        },
        Ok(tables) => HealthProbe {
            status: "degraded",
            detail: format!("catalog schema incomplete, saw tables: [{}]", tables.join(", ")),
        },
        Err(error) => HealthProbe {
            status: "degraded",
            detail: format!("catalog inspection failed: {error}"),
        },
    }
}
