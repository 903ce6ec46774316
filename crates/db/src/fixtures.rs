use crate::connection::DbPool;
use crate::repositories::RepositoryError;
use sqlx::Executor;

/// Canonical demo catalog seeds and their verification contract.
const SEED_PRICE_BOOKS: &[SeedPriceBook] = &[
    SeedPriceBook {
        id: "pb-eu-retail",
        currency: "EUR",
        is_default: true,
        is_active: true,
        expected_entry_count: 4,
        description: "Active EUR retail book with tiered desk pricing",
    },
    SeedPriceBook {
        id: "pb-legacy-2023",
        currency: "EUR",
        is_default: false,
        is_active: false,
        expected_entry_count: 1,
        description: "Retired 2023 book kept for inactive-book error demos",
    },
];

const SEED_PRICE_ENTRY_IDS: &[&str] = &[
    "pe-desk-tier1",
    "pe-desk-tier2",
    "pe-desk-oak-bulk",
    "pe-chair-flat",
    "pe-legacy-desk",
];

const SEED_TAX_RULE_IDS: &[&str] = &["tr-ca-gst", "tr-ca-qc-qst", "tr-de-vat", "tr-fr-vat"];

/// Deterministic demo catalog.
///
/// Seeds two price books, a tiered and variant-scoped entry set, and a tax
/// rule set that exercises plain and compound rules. Every quote the demo
/// tooling issues against this catalog has a known answer, which is what the
/// seed verification and the smoke command check against.
pub struct DemoCatalog;

impl DemoCatalog {
    /// SQL fixture content for the demo catalog.
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_catalog.sql");

    /// Load the demo catalog into the database. Re-running replaces the same
    /// rows, so the loaded state is identical either way.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;

        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        let books_seeded = SEED_PRICE_BOOKS
            .iter()
            .map(|book| BookSeedInfo {
                price_book_id: book.id,
                currency: book.currency,
                description: book.description,
            })
            .collect::<Vec<_>>();

        Ok(SeedResult { books_seeded })
    }

    /// Verify that the seeded catalog exists and matches the contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let quoted_entries = sql_array_from_ids(SEED_PRICE_ENTRY_IDS);
        let expected_entry_total = SEED_PRICE_ENTRY_IDS.len() as i64;
        let existing_entry_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM price_entry WHERE id IN {quoted_entries}"
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("price-entries", existing_entry_count == expected_entry_total));

        let quoted_rules = sql_array_from_ids(SEED_TAX_RULE_IDS);
        let expected_rule_total = SEED_TAX_RULE_IDS.len() as i64;
        let existing_rule_count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(1) FROM tax_rule WHERE id IN {quoted_rules}"
        ))
        .fetch_one(pool)
        .await?;
        checks.push(("tax-rules", existing_rule_count == expected_rule_total));

        for book in SEED_PRICE_BOOKS {
            let book_exists: i64 = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM price_book WHERE id = ?1 AND currency = ?2 AND is_default = ?3 AND is_active = ?4)",
            )
            .bind(book.id)
            .bind(book.currency)
            .bind(book.is_default)
            .bind(book.is_active)
            .fetch_one(pool)
            .await?;
            checks.push((book.exists_label(), book_exists == 1));

            let entry_count: i64 =
                sqlx::query_scalar("SELECT COUNT(1) FROM price_entry WHERE price_book_id = ?1")
                    .bind(book.id)
                    .fetch_one(pool)
                    .await?;
            checks.push((book.entry_count_label(), entry_count == book.expected_entry_count));
        }

        let misscoped_entries: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM price_entry WHERE (product_id IS NULL) = (variant_id IS NULL)",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("entry-scope-exclusive", misscoped_entries == 0));

        let desk_tiers_adjacent: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM price_entry t1, price_entry t2 WHERE t1.id = 'pe-desk-tier1' AND t2.id = 'pe-desk-tier2' AND t1.max_qty + 1 = t2.min_qty)",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("desk-tier-adjacency", desk_tiers_adjacent == 1));

        let qst_compounds: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM tax_rule WHERE id = 'tr-ca-qc-qst' AND compound = 1 AND country = 'CA' AND region = 'QC')",
        )
        .fetch_one(pool)
        .await?;
        checks.push(("qst-compounds-on-gst", qst_compounds == 1));

        let all_present = checks.iter().all(|(_, exists)| *exists);
        Ok(VerificationResult { all_present, checks })
    }

    /// Clean up seeded fixtures from a test database.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        let quoted_rules = sql_array_from_ids(SEED_TAX_RULE_IDS);
        let quoted_entries = sql_array_from_ids(SEED_PRICE_ENTRY_IDS);
        let quoted_books =
            sql_array_from_ids(&SEED_PRICE_BOOKS.iter().map(|b| b.id).collect::<Vec<_>>());

        sqlx::query(&format!("DELETE FROM tax_rule WHERE id IN {quoted_rules}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM price_entry WHERE id IN {quoted_entries}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM price_book WHERE id IN {quoted_books}"))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct SeedPriceBook {
    id: &'static str,
    currency: &'static str,
    is_default: bool,
    is_active: bool,
    expected_entry_count: i64,
    description: &'static str,
}

impl SeedPriceBook {
    fn exists_label(&self) -> &'static str {
        match self.id {
            "pb-eu-retail" => "book-eu-retail",
            _ => "book-legacy-2023",
        }
    }

    fn entry_count_label(&self) -> &'static str {
        match self.id {
            "pb-eu-retail" => "book-eu-retail-entry-count",
            _ => "book-legacy-2023-entry-count",
        }
    }
}

fn sql_array_from_ids(ids: &[&str]) -> String {
    let quoted = ids.iter().map(|id| format!("'{}'", id)).collect::<Vec<_>>().join(",");
    format!("({quoted})")
}

#[derive(Debug)]
pub struct SeedResult {
    pub books_seeded: Vec<BookSeedInfo>,
}

#[derive(Debug)]
pub struct BookSeedInfo {
    pub price_book_id: &'static str,
    pub currency: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
