//! # Quote Repository
//!
//! Quote headers and their committed line items.
//!
//! ## Line Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Line Item Lifecycle                               │
//! │                                                                         │
//! │  1. CREATE QUOTE                                                       │
//! │     └── create_quote() → Quote { reference: "Q-20261015-0001" }        │
//! │                                                                         │
//! │  2. COMMIT A CONFIGURATION                                             │
//! │     └── session.commit() → QuoteLineItem                               │
//! │     └── append_line_item(quote_id, item) → LineItemId                  │
//! │         (position = last + 1, payload = full JSON snapshot)            │
//! │                                                                         │
//! │  3. (OPTIONAL) RE-EDIT                                                 │
//! │     └── get_line_item(id) → ConfigurationSession::reopen(..)           │
//! │     └── replace_line_item(id, new_item)  (position kept)               │
//! │                                                                         │
//! │  4. TOTAL                                                              │
//! │     └── quote_total(quote_id) = Σ line_total                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload column is the source of truth; the scalar columns are copies
//! kept for listing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use quotecraft_core::{LineItemId, Money, Quote, QuoteLineItem};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: String,
    reference: String,
    customer_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuoteRow> for Quote {
    fn from(row: QuoteRow) -> Self {
        Quote {
            id: row.id,
            reference: row.reference,
            customer_name: row.customer_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: String,
    payload: String,
}

impl LineItemRow {
    fn into_item(self) -> DbResult<(LineItemId, QuoteLineItem)> {
        let item: QuoteLineItem = serde_json::from_str(&self.payload)?;
        Ok((LineItemId(self.id), item))
    }
}

/// Repository for quotes and line items.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        QuoteRepository { pool }
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    /// Creates an empty quote with the next reference number of the day.
    ///
    /// The number is computed inside the INSERT itself, so concurrent calls
    /// serialize on SQLite's write lock instead of racing on a prior read.
    pub async fn create_quote(&self, customer_name: Option<&str>) -> DbResult<Quote> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let prefix = format!("Q-{}-", now.format("%Y%m%d"));

        let reference: String = sqlx::query_scalar(
            r#"
            INSERT INTO quotes (id, reference, customer_name, created_at, updated_at)
            SELECT
                ?1,
                ?2 || printf('%04d', COALESCE(MAX(CAST(substr(reference, length(?2) + 1) AS INTEGER)), 0) + 1),
                ?3,
                ?4,
                ?4
            FROM quotes
            WHERE reference LIKE ?2 || '%'
            RETURNING reference
            "#,
        )
        .bind(&id)
        .bind(&prefix)
        .bind(customer_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        debug!(id = %id, reference = %reference, "Created quote");

        Ok(Quote {
            id,
            reference,
            customer_name: customer_name.map(str::to_string),
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_quote(&self, id: &str) -> DbResult<Option<Quote>> {
        let row: Option<QuoteRow> = sqlx::query_as(
            r#"
            SELECT id, reference, customer_name, created_at, updated_at
            FROM quotes
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Quote::from))
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Appends a committed line item to the end of a quote.
    ///
    /// ## Errors
    /// `DbError::NotFound` when the quote does not exist.
    pub async fn append_line_item(&self, quote_id: &str, item: &QuoteLineItem) -> DbResult<LineItemId> {
        let id = LineItemId::generate();
        let payload = serde_json::to_string(item)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM quotes WHERE id = ?1")
            .bind(quote_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Quote", quote_id));
        }

        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM quote_line_items WHERE quote_id = ?1",
        )
        .bind(quote_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO quote_line_items (
                id, quote_id, position, product_family, model_number,
                quantity, unit_price, line_total, payload, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
            "#,
        )
        .bind(id.as_str())
        .bind(quote_id)
        .bind(position)
        .bind(&item.product_family)
        .bind(&item.model_number)
        .bind(i64::from(item.quantity))
        .bind(item.unit_price.amount().to_string())
        .bind(item.line_total.amount().to_string())
        .bind(payload)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        touch_quote(&mut tx, quote_id, now).await?;
        tx.commit().await?;

        info!(
            quote_id,
            line_item_id = %id,
            model_number = %item.model_number,
            line_total = %item.line_total,
            "Line item appended"
        );
        Ok(id)
    }

    /// Overwrites a stored line item in place (re-edit flow).
    ///
    /// ## Errors
    /// `DbError::NotFound { entity: "LineItem" }` for unknown IDs.
    pub async fn replace_line_item(&self, id: &LineItemId, item: &QuoteLineItem) -> DbResult<()> {
        let payload = serde_json::to_string(item)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let quote_id: Option<String> =
            sqlx::query_scalar("SELECT quote_id FROM quote_line_items WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        let quote_id = quote_id.ok_or_else(|| DbError::not_found("LineItem", id.as_str()))?;

        sqlx::query(
            r#"
            UPDATE quote_line_items SET
                product_family = ?2,
                model_number   = ?3,
                quantity       = ?4,
                unit_price     = ?5,
                line_total     = ?6,
                payload        = ?7,
                updated_at     = ?8
            WHERE id = ?1
            "#,
        )
        .bind(id.as_str())
        .bind(&item.product_family)
        .bind(&item.model_number)
        .bind(i64::from(item.quantity))
        .bind(item.unit_price.amount().to_string())
        .bind(item.line_total.amount().to_string())
        .bind(payload)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        touch_quote(&mut tx, &quote_id, now).await?;
        tx.commit().await?;

        info!(line_item_id = %id, model_number = %item.model_number, "Line item replaced");
        Ok(())
    }

    pub async fn get_line_item(&self, id: &LineItemId) -> DbResult<Option<QuoteLineItem>> {
        let row: Option<LineItemRow> =
            sqlx::query_as("SELECT id, payload FROM quote_line_items WHERE id = ?1")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.into_item().map(|(_, item)| item)).transpose()
    }

    /// Line items of a quote in position order.
    pub async fn list_line_items(&self, quote_id: &str) -> DbResult<Vec<(LineItemId, QuoteLineItem)>> {
        let rows: Vec<LineItemRow> = sqlx::query_as(
            r#"
            SELECT id, payload
            FROM quote_line_items
            WHERE quote_id = ?1
            ORDER BY position
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LineItemRow::into_item).collect()
    }

    /// Sum of every line total on the quote. Exact; round at display.
    pub async fn quote_total(&self, quote_id: &str) -> DbResult<Money> {
        let totals: Vec<String> =
            sqlx::query_scalar("SELECT line_total FROM quote_line_items WHERE quote_id = ?1")
                .bind(quote_id)
                .fetch_all(&self.pool)
                .await?;

        totals
            .iter()
            .map(|t| Money::from_str(t).map_err(|e| DbError::Serialization(e.to_string())))
            .sum()
    }
}

async fn touch_quote(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    quote_id: &str,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query("UPDATE quotes SET updated_at = ?2 WHERE id = ?1")
        .bind(quote_id)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;
    use crate::{Database, DbConfig};
    use quotecraft_core::ConfigurationSession;

    async fn db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.catalogs().upsert(&samples::ls2000()).await.unwrap();
        db
    }

    async fn scenario_item(db: &Database) -> QuoteLineItem {
        let catalog = db.catalogs().load_catalog("LS2000").await.unwrap();
        let mut session = ConfigurationSession::start(catalog);
        session.on_select("Material", "H").unwrap();
        session.on_select("Voltage", "115VAC").unwrap();
        session.on_select("ProbeLength", 14).unwrap();
        session.on_quantity_change(2).unwrap();
        session.commit().unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_quote() {
        let db = db().await;
        let first = db.quotes().create_quote(Some("Acme Chemical")).await.unwrap();
        let second = db.quotes().create_quote(None).await.unwrap();

        assert!(first.reference.starts_with("Q-"));
        assert!(first.reference.ends_with("-0001"));
        assert!(second.reference.ends_with("-0002"));

        let loaded = db.quotes().get_quote(&first.id).await.unwrap().unwrap();
        assert_eq!(loaded.customer_name.as_deref(), Some("Acme Chemical"));
        assert!(db.quotes().get_quote("missing").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_quotes_get_distinct_references() {
        let path = std::env::temp_dir().join(format!("quotecraft-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(4)).await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let quotes = db.quotes();
                tokio::spawn(async move { quotes.create_quote(None).await })
            })
            .collect();

        let mut references = Vec::new();
        for handle in handles {
            references.push(handle.await.unwrap().unwrap().reference);
        }
        references.sort();
        references.dedup();
        assert_eq!(references.len(), 8);
        assert!(references[7].ends_with("-0008"));

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_append_preserves_snapshot() {
        let db = db().await;
        let quote = db.quotes().create_quote(None).await.unwrap();
        let item = scenario_item(&db).await;

        let id = db.quotes().append_line_item(&quote.id, &item).await.unwrap();
        let stored = db.quotes().get_line_item(&id).await.unwrap().unwrap();

        assert_eq!(stored, item);
        assert_eq!(stored.line_total, Money::from_cents(76400));
        assert_eq!(stored.breakdown.len(), 3);
    }

    #[tokio::test]
    async fn test_append_to_missing_quote() {
        let db = db().await;
        let item = scenario_item(&db).await;

        let err = db.quotes().append_line_item("missing", &item).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_order_and_total() {
        let db = db().await;
        let quote = db.quotes().create_quote(None).await.unwrap();
        let first = scenario_item(&db).await;

        let catalog = db.catalogs().load_catalog("LS2000").await.unwrap();
        let mut session = ConfigurationSession::start(catalog);
        session.apply_defaults().unwrap();
        let second = session.commit().unwrap();

        let first_id = db.quotes().append_line_item(&quote.id, &first).await.unwrap();
        let second_id = db.quotes().append_line_item(&quote.id, &second).await.unwrap();

        let items = db.quotes().list_line_items(&quote.id).await.unwrap();
        let ids: Vec<&LineItemId> = items.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![&first_id, &second_id]);

        let total = db.quotes().quote_total(&quote.id).await.unwrap();
        assert_eq!(total, Money::from_cents(76400 + 30000));
    }

    #[tokio::test]
    async fn test_reopen_and_replace() {
        let db = db().await;
        let quote = db.quotes().create_quote(None).await.unwrap();
        let item = scenario_item(&db).await;
        let id = db.quotes().append_line_item(&quote.id, &item).await.unwrap();

        let stored = db.quotes().get_line_item(&id).await.unwrap().unwrap();
        let catalog = db.catalogs().load_catalog("LS2000").await.unwrap();
        let mut session = ConfigurationSession::reopen(catalog, &stored).unwrap();
        session.on_quantity_change(1).unwrap();
        let edited = session.commit().unwrap();

        db.quotes().replace_line_item(&id, &edited).await.unwrap();

        let items = db.quotes().list_line_items(&quote.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].1.quantity, 1);
        assert_eq!(
            db.quotes().quote_total(&quote.id).await.unwrap(),
            Money::from_cents(38200)
        );
    }

    #[tokio::test]
    async fn test_replace_unknown_line_item() {
        let db = db().await;
        let item = scenario_item(&db).await;

        let err = db
            .quotes()
            .replace_line_item(&LineItemId::generate(), &item)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref entity, .. } if entity == "LineItem"));
    }

    #[tokio::test]
    async fn test_empty_quote_total_is_zero() {
        let db = db().await;
        let quote = db.quotes().create_quote(None).await.unwrap();
        assert_eq!(db.quotes().quote_total(&quote.id).await.unwrap(), Money::zero());
    }
}
