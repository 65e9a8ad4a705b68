//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use chrono::Utc;
use std::time::Duration;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
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

    /// List menu items, optionally restricted to a category
    pub async fn find_all(&self, category: Option<&str>) -> RepoResult<Vec<MenuItem>> {
        let category = category.map(str::to_string);
        self.base
            .guard(async {
                let items: Vec<MenuItem> = match category {
                    Some(category) => {
                        self.base
                            .db()
                            .query(
                                "SELECT * FROM menu_item WHERE category = $category \
                                 ORDER BY name",
                            )
                            .bind(("category", category))
                            .await?
                            .take(0)?
                    }
                    None => {
                        self.base
                            .db()
                            .query("SELECT * FROM menu_item ORDER BY category, name")
                            .await?
                            .take(0)?
                    }
                };
                Ok(items)
            })
            .await
    }

    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<MenuItem>> {
        let name = name.to_string();
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM menu_item WHERE name = $name LIMIT 1")
                    .bind(("name", name))
                    .await?;
                let items: Vec<MenuItem> = result.take(0)?;
                Ok(items.into_iter().next())
            })
            .await
    }

    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        let now = Utc::now();
        let item = MenuItem {
            id: None,
            name: data.name,
            category: data.category,
            price: data.price,
            offer_price: data.offer_price,
            rating: data.rating.unwrap_or(4.0),
            is_veg: data.is_veg.unwrap_or(true),
            quantity: data.quantity.unwrap_or_default(),
            orders_placed: 0,
            created_at: now,
            updated_at: now,
        };
        self.base
            .guard(async {
                let created: Option<MenuItem> =
                    self.base.db().create(TABLE).content(item).await?;
                created.ok_or_else(|| {
                    RepoError::Database("Failed to create menu item".to_string())
                })
            })
            .await
    }

    pub async fn update(&self, name: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let lookup = name.to_string();
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT * FROM menu_item WHERE name = $name LIMIT 1")
                    .bind(("name", lookup.clone()))
                    .await?;
                let items: Vec<MenuItem> = result.take(0)?;
                let existing = items
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Menu item '{lookup}' not found")))?;

                let mut result = self
                    .base
                    .db()
                    .query(
                        "UPDATE menu_item SET name = $new_name, category = $category, \
                         price = $price, offer_price = $offer_price, rating = $rating, \
                         is_veg = $is_veg, quantity = $quantity, updated_at = $now \
                         WHERE name = $name RETURN AFTER",
                    )
                    .bind(("name", lookup.clone()))
                    .bind(("new_name", data.name.unwrap_or(existing.name)))
                    .bind(("category", data.category.unwrap_or(existing.category)))
                    .bind(("price", data.price.unwrap_or(existing.price)))
                    .bind(("offer_price", data.offer_price.or(existing.offer_price)))
                    .bind(("rating", data.rating.unwrap_or(existing.rating)))
                    .bind(("is_veg", data.is_veg.unwrap_or(existing.is_veg)))
                    .bind(("quantity", data.quantity.unwrap_or(existing.quantity)))
                    .bind(("now", Utc::now()))
                    .await?;
                let updated: Vec<MenuItem> = result.take(0)?;
                updated
                    .into_iter()
                    .next()
                    .ok_or_else(|| RepoError::NotFound(format!("Menu item '{lookup}' not found")))
            })
            .await
    }

    /// Hard delete a menu item
    pub async fn delete(&self, name: &str) -> RepoResult<bool> {
        let name = name.to_string();
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("DELETE FROM menu_item WHERE name = $name RETURN BEFORE")
                    .bind(("name", name))
                    .await?;
                let deleted: Vec<MenuItem> = result.take(0)?;
                Ok(!deleted.is_empty())
            })
            .await
    }

    /// Bump the popularity counter for an ordered dish
    pub async fn record_order(&self, name: &str) -> RepoResult<()> {
        let name = name.to_string();
        self.base
            .guard(async {
                self.base
                    .db()
                    .query(
                        "UPDATE menu_item SET orders_placed = orders_placed + 1 \
                         WHERE name = $name",
                    )
                    .bind(("name", name))
                    .await?
                    .check()?;
                Ok(())
            })
            .await
    }

    /// Top items by orders_placed (analytics)
    pub async fn popular(&self, limit: usize) -> RepoResult<Vec<MenuItem>> {
        self.base
            .guard(async {
                let items: Vec<MenuItem> = self
                    .base
                    .db()
                    .query("SELECT * FROM menu_item ORDER BY orders_placed DESC LIMIT $limit")
                    .bind(("limit", limit))
                    .await?
                    .take(0)?;
                Ok(items)
            })
            .await
    }

    /// Total menu item count (analytics)
    pub async fn count_all(&self) -> RepoResult<i64> {
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT count() AS total FROM menu_item GROUP ALL")
                    .await?;
                let rows: Vec<CountRow> = result.take(0)?;
                Ok(rows.first().map(|r| r.total).unwrap_or(0))
            })
            .await
    }
}

/// `count() AS total ... GROUP ALL` projection row
#[derive(serde::Deserialize)]
struct CountRow {
    total: i64,
}
