//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct DiningTableRepository {
    base: BaseRepository,
}

impl DiningTableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn with_timeout(db: Surreal<Db>, timeout: Duration) -> Self {
        Self {
            base: BaseRepository::with_timeout(db, timeout),
        }
    }

    /// Find all active dining tables, ordered by code
    pub async fn find_all(&self) -> RepoResult<Vec<DiningTable>> {
        self.base
            .guard(async {
                let tables: Vec<DiningTable> = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table WHERE is_active = true ORDER BY code")
                    .await?
                    .take(0)?;
                Ok(tables)
            })
            .await
    }

    /// Find table by its code (e.g. "A3")
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<DiningTable>> {
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM dining_table WHERE code = $code LIMIT 1")
                    .bind(("code", code.to_string()))
                    .await?;
                let tables: Vec<DiningTable> = result.take(0)?;
                Ok(tables.into_iter().next())
            })
            .await
    }

    /// Largest capacity among active tables (0 when the catalog is empty)
    pub async fn max_capacity(&self) -> RepoResult<i32> {
        self.base
            .guard(async {
                let capacities: Vec<i32> = self
                    .base
                    .db()
                    .query("SELECT VALUE capacity FROM dining_table WHERE is_active = true")
                    .await?
                    .take(0)?;
                Ok(capacities.into_iter().max().unwrap_or(0))
            })
            .await
    }

    /// Create a new dining table
    pub async fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        if data.capacity <= 0 {
            return Err(RepoError::Validation(format!(
                "Table capacity must be positive, got {}",
                data.capacity
            )));
        }
        self.base
            .guard(async {
                if self.lookup_code(&data.code).await?.is_some() {
                    return Err(RepoError::Duplicate(format!(
                        "Table '{}' already exists",
                        data.code
                    )));
                }

                let table = DiningTable {
                    id: None,
                    code: data.code,
                    capacity: data.capacity,
                    section: data.section,
                    is_active: true,
                };

                let created: Option<DiningTable> =
                    self.base.db().create(TABLE).content(table).await?;
                created
                    .ok_or_else(|| RepoError::Database("Failed to create dining table".to_string()))
            })
            .await
    }

    /// Update capacity/section/active flag of a table (admin correction)
    pub async fn update(&self, code: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
        if let Some(capacity) = data.capacity
            && capacity <= 0
        {
            return Err(RepoError::Validation(format!(
                "Table capacity must be positive, got {capacity}"
            )));
        }
        self.base
            .guard(async {
                let existing = self
                    .lookup_code(code)
                    .await?
                    .ok_or_else(|| RepoError::NotFound(format!("Table {code} not found")))?;

                let capacity = data.capacity.unwrap_or(existing.capacity);
                let section = data.section.unwrap_or(existing.section);
                let is_active = data.is_active.unwrap_or(existing.is_active);

                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE dining_table SET capacity = $capacity, section = $section, \
                         is_active = $is_active WHERE code = $code RETURN AFTER",
                    )
                    .bind(("code", code.to_string()))
                    .bind(("capacity", capacity))
                    .bind(("section", section))
                    .bind(("is_active", is_active))
                    .await?;
                let tables: Vec<DiningTable> = result.take(0)?;
                tables
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Table {code} not found")))
            })
            .await
    }

    /// Deactivate a table (soft delete; the catalog keeps its history)
    pub async fn deactivate(&self, code: &str) -> RepoResult<bool> {
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE dining_table SET is_active = false WHERE code = $code RETURN AFTER",
                    )
                    .bind(("code", code.to_string()))
                    .await?;
                let tables: Vec<DiningTable> = result.take(0)?;
                Ok(!tables.is_empty())
            })
            .await
    }

    // Raw lookup without the timeout guard (used inside guarded blocks)
    async fn lookup_code(&self, code: &str) -> RepoResult<Option<DiningTable>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM dining_table WHERE code = $code LIMIT 1")
            .bind(("code", code.to_string()))
            .await?;
        let tables: Vec<DiningTable> = result.take(0)?;
        Ok(tables.into_iter().next())
    }
}
