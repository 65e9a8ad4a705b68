//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.
//!
//! Every store call goes through [`BaseRepository::guard`], which applies the
//! configured storage timeout; an expired call surfaces as
//! [`RepoError::Unavailable`] instead of blocking the request task.

// Auth
pub mod admin_user;

// Catalog
pub mod dining_table;
pub mod menu_item;

// Reservations
pub mod reservation;

// Chat
pub mod chat_log;

// Re-exports
pub use admin_user::AdminUserRepository;
pub use chat_log::ChatLogRepository;
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use reservation::{ReservationRepository, StatusCount};

use std::future::Future;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Default storage timeout when none is configured
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A concurrent writer claimed the same resource first (transient)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Store did not answer within the timeout (retryable by the caller)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        classify_db_error(&err.to_string())
    }
}

/// SurrealDB surfaces THROW, index violations and aborted transactions as
/// plain query errors; classify them by message so callers can tell a
/// losing race from a genuine failure.
fn classify_db_error(msg: &str) -> RepoError {
    if msg.contains("claim_conflict") || msg.contains("idx_claim_slot") {
        return RepoError::Conflict("table claim lost to a concurrent writer".to_string());
    }
    // The local engines report a lost commit race between two transactions
    // as a generic transaction failure, not an index violation
    if msg.contains("failed transaction") || msg.contains("write conflict") {
        return RepoError::Conflict(msg.to_string());
    }
    if msg.contains("already contains") || msg.contains("unique") {
        return RepoError::Duplicate(msg.to_string());
    }
    RepoError::Database(msg.to_string())
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference and storage timeout
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
    timeout: Duration,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self::with_timeout(db, DEFAULT_STORAGE_TIMEOUT)
    }

    pub fn with_timeout(db: Surreal<Db>, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Run a store operation under the configured timeout
    pub async fn guard<T, F>(&self, fut: F) -> RepoResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                RepoError::Unavailable(format!(
                    "storage operation exceeded {}ms",
                    self.timeout.as_millis()
                ))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_conflict_and_duplicate() {
        assert!(matches!(
            classify_db_error("An error occurred: claim_conflict"),
            RepoError::Conflict(_)
        ));
        // Claim-index violations are races, not duplicates
        assert!(matches!(
            classify_db_error("Database index `idx_claim_slot` already contains [...]"),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            classify_db_error("The query was not executed due to a failed transaction"),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            classify_db_error("Failed to commit transaction due to a read or write conflict"),
            RepoError::Conflict(_)
        ));
        assert!(matches!(
            classify_db_error("Database index `idx_table_code` already contains 'A1'"),
            RepoError::Duplicate(_)
        ));
        assert!(matches!(
            classify_db_error("some other failure"),
            RepoError::Database(_)
        ));
    }

    #[tokio::test]
    async fn guard_times_out_slow_operations() {
        let db = surrealdb::Surreal::new::<surrealdb::engine::local::Mem>(())
            .await
            .unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        let base = BaseRepository::with_timeout(db, Duration::from_millis(10));

        let result: RepoResult<()> = base
            .guard(async {
                tokio::time::sleep(Duration::from_millis(100)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(RepoError::Unavailable(_))));
    }
}
