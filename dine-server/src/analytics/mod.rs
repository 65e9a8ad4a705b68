//! Admin dashboard aggregates over the reservation ledger and menu catalog.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::models::{MenuItem, Reservation};
use crate::db::repository::{
    MenuItemRepository, RepoResult, ReservationRepository, StatusCount,
};

/// How many recent reservations / popular dishes the dashboard shows
const DASHBOARD_LIMIT: usize = 5;

/// Dashboard summary payload
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_reservations: i64,
    pub total_menu_items: i64,
    pub recent_reservations: Vec<Reservation>,
    pub popular_items: Vec<MenuItem>,
    /// Per-status counts for the requested date
    pub status_counts: Vec<StatusCount>,
    pub date: NaiveDate,
}

/// Analytics service
#[derive(Clone)]
pub struct AnalyticsService {
    reservations: ReservationRepository,
    menu: MenuItemRepository,
}

impl AnalyticsService {
    pub fn new(reservations: ReservationRepository, menu: MenuItemRepository) -> Self {
        Self { reservations, menu }
    }

    /// Build the dashboard summary for a date (defaults to today at the API
    /// layer)
    pub async fn dashboard(&self, date: NaiveDate) -> RepoResult<DashboardSummary> {
        let total_reservations = self.reservations.count_all().await?;
        let total_menu_items = self.menu.count_all().await?;
        let recent_reservations = self.reservations.recent(DASHBOARD_LIMIT).await?;
        let popular_items = self.menu.popular(DASHBOARD_LIMIT).await?;
        let status_counts = self.reservations.count_by_status(date).await?;

        Ok(DashboardSummary {
            total_reservations,
            total_menu_items,
            recent_reservations,
            popular_items,
            status_counts,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::MenuItemCreate;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn empty_database_yields_zeroed_summary() {
        let db = DbService::new_in_memory().await.unwrap();
        let service = AnalyticsService::new(
            ReservationRepository::new(db.db.clone()),
            MenuItemRepository::new(db.db.clone()),
        );

        let date = crate::utils::time::today();
        let summary = service.dashboard(date).await.unwrap();
        assert_eq!(summary.total_reservations, 0);
        assert_eq!(summary.total_menu_items, 0);
        assert!(summary.recent_reservations.is_empty());
        assert!(summary.popular_items.is_empty());
        assert!(summary.status_counts.is_empty());
    }

    #[tokio::test]
    async fn popular_items_ranked_by_orders_placed() {
        let db = DbService::new_in_memory().await.unwrap();
        let menu = MenuItemRepository::new(db.db.clone());
        let service =
            AnalyticsService::new(ReservationRepository::new(db.db.clone()), menu.clone());

        for name in ["Butter Chicken", "Biryani", "Paneer Tikka"] {
            menu.create(MenuItemCreate {
                name: name.to_string(),
                category: "Main Course".to_string(),
                price: Decimal::new(29900, 2),
                offer_price: None,
                rating: None,
                is_veg: None,
                quantity: None,
            })
            .await
            .unwrap();
        }
        menu.record_order("Biryani").await.unwrap();
        menu.record_order("Biryani").await.unwrap();
        menu.record_order("Paneer Tikka").await.unwrap();

        let summary = service.dashboard(crate::utils::time::today()).await.unwrap();
        assert_eq!(summary.total_menu_items, 3);
        assert_eq!(summary.popular_items[0].name, "Biryani");
        assert_eq!(summary.popular_items[0].orders_placed, 2);
        assert_eq!(summary.popular_items[1].name, "Paneer Tikka");
    }
}
