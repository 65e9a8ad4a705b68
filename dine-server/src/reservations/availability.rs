//! Availability Index
//!
//! 读侧投影：根据台账中的占用声明计算空闲桌台。
//! 账本是唯一事实来源；本索引按查询重算，最终仲裁权在
//! [`ReservationRepository::create_claimed`] 的事务内复查。

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::core::config::ReservationPolicy;
use crate::db::models::DiningTable;
use crate::db::repository::{DiningTableRepository, RepoResult, ReservationRepository};
use crate::reservations::slots::OccupancyWindow;

/// Free/busy projection over the reservation ledger
#[derive(Clone)]
pub struct AvailabilityIndex {
    tables: DiningTableRepository,
    reservations: ReservationRepository,
    policy: ReservationPolicy,
}

impl AvailabilityIndex {
    pub fn new(
        tables: DiningTableRepository,
        reservations: ReservationRepository,
        policy: ReservationPolicy,
    ) -> Self {
        Self {
            tables,
            reservations,
            policy,
        }
    }

    /// Tables that seat `party_size` and have no claim overlapping the
    /// occupancy window of `slot` on `date`. Ordered by table code.
    ///
    /// Cancelled/no-show/completed reservations hold no claim and are
    /// excluded at the query level.
    pub async fn find_available(
        &self,
        date: NaiveDate,
        slot: NaiveTime,
        party_size: i32,
    ) -> RepoResult<Vec<DiningTable>> {
        let tables = self.tables.find_all().await?;
        let claims = self.reservations.claims_for_date(date).await?;

        // Group claim windows by table code; one ledger query per request
        let mut claimed: HashMap<&str, Vec<OccupancyWindow>> = HashMap::new();
        for claim in &claims {
            if let Some(code) = claim.assigned_table.as_deref() {
                claimed.entry(code).or_default().push(OccupancyWindow {
                    start_min: claim.slot_start_min,
                    end_min: claim.slot_end_min,
                });
            }
        }

        let available = tables
            .into_iter()
            .filter(|table| table.capacity >= party_size)
            .filter(|table| {
                let turnover = self.policy.turnover_for(&table.section);
                let window = OccupancyWindow::for_slot(slot, turnover);
                claimed
                    .get(table.code.as_str())
                    .map(|windows| !windows.iter().any(|w| w.overlaps(&window)))
                    .unwrap_or(true)
            })
            .collect();

        Ok(available)
    }

    /// Occupancy window a reservation at `slot` would hold on a table in
    /// `section` (per-section turnover override applied)
    pub fn window_for(&self, slot: NaiveTime, section: &str) -> OccupancyWindow {
        OccupancyWindow::for_slot(slot, self.policy.turnover_for(section))
    }
}
