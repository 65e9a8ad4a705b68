use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime};

use crate::core::config::{ReservationPolicy, RestaurantInfo};
use crate::db::DbService;
use crate::db::models::DiningTableCreate;
use crate::db::repository::{DiningTableRepository, ReservationRepository};
use crate::notify::LogNotificationSender;
use crate::reservations::{
    AllocationEngine, AllocationRequest, AvailabilityIndex, ReservationLedger,
};

mod test_concurrency;
mod test_ledger;

fn slot(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

fn test_date() -> NaiveDate {
    crate::utils::time::today() + Duration::days(7)
}

fn test_policy() -> ReservationPolicy {
    ReservationPolicy {
        valid_slots: [
            "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "18:00",
            "18:30", "19:00", "19:30", "20:00", "20:30", "21:00", "21:30", "22:00",
        ]
        .iter()
        .map(|s| slot(s))
        .collect(),
        min_party_size: 1,
        max_party_size: 12,
        max_advance_days: 30,
        turnover_minutes: 90,
        section_turnover: Default::default(),
        strict_preferred_table: false,
        allocation_max_retries: 3,
        storage_timeout_ms: 5000,
    }
}

fn test_restaurant() -> RestaurantInfo {
    RestaurantInfo {
        name: "DINE24".into(),
        phone: "+91 98765 43210".into(),
        email: "info@dine24.com".into(),
        opening_time: slot("11:00"),
        closing_time: slot("23:00"),
        kitchen_closing_time: slot("22:30"),
    }
}

struct TestContext {
    tables: DiningTableRepository,
    reservations: ReservationRepository,
    policy: ReservationPolicy,
}

impl TestContext {
    /// In-memory database seeded with `(code, capacity, section)` tables
    async fn new(seed: &[(&str, i32, &str)]) -> Self {
        Self::with_policy(seed, test_policy()).await
    }

    async fn with_policy(seed: &[(&str, i32, &str)], policy: ReservationPolicy) -> Self {
        let db = DbService::new_in_memory().await.unwrap();
        let tables = DiningTableRepository::new(db.db.clone());
        let reservations = ReservationRepository::new(db.db.clone());

        for (code, capacity, section) in seed {
            tables
                .create(DiningTableCreate {
                    code: code.to_string(),
                    capacity: *capacity,
                    section: section.to_string(),
                })
                .await
                .unwrap();
        }

        Self {
            tables,
            reservations,
            policy,
        }
    }

    fn engine(&self) -> AllocationEngine {
        let availability = AvailabilityIndex::new(
            self.tables.clone(),
            self.reservations.clone(),
            self.policy.clone(),
        );
        AllocationEngine::new(
            self.tables.clone(),
            availability,
            self.reservations.clone(),
            self.policy.clone(),
            Arc::new(LogNotificationSender::new(test_restaurant())),
        )
    }

    fn ledger(&self) -> ReservationLedger {
        ReservationLedger::new(self.reservations.clone())
    }
}

fn request(party_size: i32, time_slot: &str) -> AllocationRequest {
    AllocationRequest {
        full_name: "Test Guest".to_string(),
        email: "guest@example.com".to_string(),
        phone: "+91 9876543210".to_string(),
        purpose: None,
        party_size,
        date: test_date(),
        time_slot: slot(time_slot),
        preferred_table: None,
    }
}
