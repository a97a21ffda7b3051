//! # Catalog Repository
//!
//! Stores one option catalog per product family as a JSON definition.
//!
//! ## Load Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalogs.definition (TEXT, JSON)                                      │
//! │       │  serde_json::from_str                                          │
//! │       ▼                                                                 │
//! │  CatalogDefinition                                                     │
//! │       │  OptionCatalog::try_from  ← integrity checks                   │
//! │       ▼                                                                 │
//! │  Arc<OptionCatalog>  → ConfigurationSession::start                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A row that no longer passes the integrity checks is reported as
//! `DbError::Catalog(CatalogError::Integrity { .. })`, never returned.

use std::sync::Arc;

use chrono::Utc;
use quotecraft_core::{CatalogDefinition, CatalogError, OptionCatalog};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    family: String,
    definition: String,
}

/// Repository for option catalogs.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a catalog, or replaces the stored one for the same family.
    ///
    /// Sessions already running keep the catalog they were started with.
    pub async fn upsert(&self, catalog: &OptionCatalog) -> DbResult<()> {
        let definition = serde_json::to_string(catalog.definition())?;
        let now = Utc::now();

        debug!(family = %catalog.family(), "Upserting catalog");

        sqlx::query(
            r#"
            INSERT INTO catalogs (family, display_name, base_price, definition, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(family) DO UPDATE SET
                display_name = excluded.display_name,
                base_price   = excluded.base_price,
                definition   = excluded.definition,
                updated_at   = excluded.updated_at
            "#,
        )
        .bind(catalog.family())
        .bind(catalog.definition().display_name.as_deref())
        .bind(catalog.base_price().amount().to_string())
        .bind(definition)
        .bind(now)
        .execute(&self.pool)
        .await?;

        info!(family = %catalog.family(), "Catalog stored");
        Ok(())
    }

    /// Loads and validates the catalog for `family`.
    ///
    /// ## Errors
    /// - `DbError::Catalog(CatalogError::NotFound)` for unknown families
    /// - `DbError::Catalog(CatalogError::Integrity)` for malformed rows
    /// - `DbError::Serialization` when the JSON cannot be parsed
    pub async fn load_catalog(&self, family: &str) -> DbResult<Arc<OptionCatalog>> {
        let row: Option<CatalogRow> =
            sqlx::query_as("SELECT family, definition FROM catalogs WHERE family = ?1")
                .bind(family)
                .fetch_optional(&self.pool)
                .await?;

        let row = row.ok_or_else(|| CatalogError::NotFound(family.to_string()))?;
        let definition: CatalogDefinition = serde_json::from_str(&row.definition)?;
        let catalog = OptionCatalog::try_from(definition)?;

        debug!(
            family = %row.family,
            categories = catalog.categories().len(),
            "Catalog loaded"
        );
        Ok(Arc::new(catalog))
    }

    /// All stored families, alphabetically.
    pub async fn list_families(&self) -> DbResult<Vec<String>> {
        let families: Vec<String> =
            sqlx::query_scalar("SELECT family FROM catalogs ORDER BY family")
                .fetch_all(&self.pool)
                .await?;
        Ok(families)
    }

    /// Deletes a catalog. Returns `false` if none was stored.
    ///
    /// Committed line items keep their snapshots.
    pub async fn delete(&self, family: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM catalogs WHERE family = ?1")
            .bind(family)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(family, "Catalog deleted");
        }
        Ok(deleted)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalogs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::samples;
    use crate::{Database, DbConfig};
    use quotecraft_core::{CatalogError, ConfigurationSession, Money};

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_upsert_and_load() {
        let db = db().await;
        let catalog = samples::ls2000();
        db.catalogs().upsert(&catalog).await.unwrap();

        let loaded = db.catalogs().load_catalog("LS2000").await.unwrap();
        assert_eq!(*loaded, catalog);
        assert_eq!(db.catalogs().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_family() {
        let db = db().await;
        db.catalogs().upsert(&samples::ls2000()).await.unwrap();

        let mut definition = samples::ls2000().definition().clone();
        definition.base_price = Money::from_cents(31500);
        let repriced = definition.build().unwrap();
        db.catalogs().upsert(&repriced).await.unwrap();

        let loaded = db.catalogs().load_catalog("LS2000").await.unwrap();
        assert_eq!(loaded.base_price(), Money::from_cents(31500));
        assert_eq!(db.catalogs().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_family_is_not_found() {
        let db = db().await;
        let err = db.catalogs().load_catalog("LS9000").await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Catalog(CatalogError::NotFound(ref family)) if family == "LS9000"
        ));
    }

    #[tokio::test]
    async fn test_malformed_row_fails_integrity() {
        let db = db().await;
        let bad = r#"{"family":"BAD1","base_price":"10.00","categories":[
            {"name":"Voltage","required":true,
             "kind":{"selection_mode":"single_choice","choices":[]}}]}"#;
        sqlx::query(
            "INSERT INTO catalogs (family, base_price, definition, created_at, updated_at)
             VALUES ('BAD1', '10.00', ?1, '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z')",
        )
        .bind(bad)
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.catalogs().load_catalog("BAD1").await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Catalog(CatalogError::Integrity { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let db = db().await;
        db.catalogs().upsert(&samples::tx500()).await.unwrap();
        db.catalogs().upsert(&samples::ls2000()).await.unwrap();

        assert_eq!(
            db.catalogs().list_families().await.unwrap(),
            vec!["LS2000", "TX500"]
        );

        assert!(db.catalogs().delete("TX500").await.unwrap());
        assert!(!db.catalogs().delete("TX500").await.unwrap());
        assert_eq!(db.catalogs().list_families().await.unwrap(), vec!["LS2000"]);
    }

    #[tokio::test]
    async fn test_loaded_catalog_drives_a_session() {
        let db = db().await;
        db.catalogs().upsert(&samples::ls2000()).await.unwrap();

        let catalog = db.catalogs().load_catalog("LS2000").await.unwrap();
        let mut session = ConfigurationSession::start(catalog);
        session.on_select("Material", "H").unwrap();
        session.on_select("Voltage", "115VAC").unwrap();
        session.on_select("ProbeLength", 14).unwrap();
        session.on_quantity_change(2).unwrap();

        assert_eq!(session.summary().total, Money::from_cents(76400));
    }
}
