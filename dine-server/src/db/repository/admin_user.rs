//! Admin User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::AdminUser;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "admin_user";

#[derive(Clone)]
pub struct AdminUserRepository {
    base: BaseRepository,
}

impl AdminUserRepository {
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

    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminUser>> {
        let username = username.to_string();
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM admin_user WHERE username = $username LIMIT 1")
                    .bind(("username", username))
                    .await?;
                let users: Vec<AdminUser> = result.take(0)?;
                Ok(users.into_iter().next())
            })
            .await
    }

    pub async fn create(&self, user: AdminUser) -> RepoResult<AdminUser> {
        self.base
            .guard(async {
                let created: Option<AdminUser> =
                    self.base.db().create(TABLE).content(user).await?;
                created
                    .ok_or_else(|| RepoError::Database("Failed to create admin user".to_string()))
            })
            .await
    }
}
