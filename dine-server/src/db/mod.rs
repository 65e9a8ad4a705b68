//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB on disk, in-memory for tests) plus
//! schema/index definition.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "dine";
const DATABASE: &str = "dine";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::setup(db).await
    }

    /// Open an in-memory database (tests)
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::setup(db).await
    }

    async fn setup(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database ready (ns={NAMESPACE}, db={DATABASE})");
        Ok(Self { db })
    }
}

/// Idempotent schema + index definitions.
///
/// The unique index on `dining_table.code` keeps the catalog
/// addressable by code; the composite reservation index backs the
/// per-(table, date) claim queries that every allocation runs.
///
/// `table_claim` holds one row per occupied 30-minute bucket of a
/// claim-holding reservation. Its unique index on
/// (table_code, date, slot_min) is the arbiter against double booking:
/// two writers for overlapping windows always collide on at least one
/// bucket row, so the loser's transaction fails.
async fn define_schema(db: &Surreal<Db>) -> surrealdb::Result<()> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_table_code ON TABLE dining_table COLUMNS code UNIQUE;

        DEFINE TABLE IF NOT EXISTS reservation SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_reservation_claim ON TABLE reservation
            COLUMNS assigned_table, date;
        DEFINE INDEX IF NOT EXISTS idx_reservation_date ON TABLE reservation COLUMNS date;
        DEFINE INDEX IF NOT EXISTS idx_reservation_email ON TABLE reservation COLUMNS email;

        DEFINE TABLE IF NOT EXISTS table_claim SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_claim_slot ON TABLE table_claim
            COLUMNS table_code, date, slot_min UNIQUE;

        DEFINE TABLE IF NOT EXISTS menu_item SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_menu_name ON TABLE menu_item COLUMNS name UNIQUE;

        DEFINE TABLE IF NOT EXISTS admin_user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_admin_username ON TABLE admin_user COLUMNS username UNIQUE;

        DEFINE TABLE IF NOT EXISTS chat_log SCHEMALESS;
        "#,
    )
    .await?
    .check()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::DiningTableCreate;
    use crate::db::repository::{DiningTableRepository, RepoError};

    #[tokio::test]
    async fn schema_definition_is_idempotent() {
        let service = DbService::new_in_memory().await.unwrap();
        // A second pass over the same definitions must not fail
        define_schema(&service.db).await.unwrap();
    }

    #[tokio::test]
    async fn unique_table_code_enforced_by_index() {
        let service = DbService::new_in_memory().await.unwrap();
        let repo = DiningTableRepository::new(service.db.clone());

        let create = DiningTableCreate {
            code: "A1".to_string(),
            capacity: 2,
            section: "Main Dining".to_string(),
        };
        repo.create(create.clone()).await.unwrap();
        let err = repo.create(create).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn on_disk_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dine.db");
        let path = path.to_string_lossy();

        {
            let service = DbService::new(&path).await.unwrap();
            let repo = DiningTableRepository::new(service.db.clone());
            repo.create(DiningTableCreate {
                code: "T1".to_string(),
                capacity: 4,
                section: "Terrace".to_string(),
            })
            .await
            .unwrap();
        }

        let service = DbService::new(&path).await.unwrap();
        let repo = DiningTableRepository::new(service.db.clone());
        let table = repo.find_by_code("T1").await.unwrap().unwrap();
        assert_eq!(table.capacity, 4);
    }
}
