//! Chat Log Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ChatLog;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "chat_log";

#[derive(Clone)]
pub struct ChatLogRepository {
    base: BaseRepository,
}

impl ChatLogRepository {
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

    pub async fn insert(&self, log: ChatLog) -> RepoResult<ChatLog> {
        self.base
            .guard(async {
                let created: Option<ChatLog> = self.base.db().create(TABLE).content(log).await?;
                created.ok_or_else(|| RepoError::Database("Failed to log chat".to_string()))
            })
            .await
    }

    pub async fn recent(&self, limit: usize) -> RepoResult<Vec<ChatLog>> {
        self.base
            .guard(async {
                let logs: Vec<ChatLog> = self
                    .base
                    .db()
                    .query("SELECT * FROM chat_log ORDER BY timestamp DESC LIMIT $limit")
                    .bind(("limit", limit))
                    .await?
                    .take(0)?;
                Ok(logs)
            })
            .await
    }
}
