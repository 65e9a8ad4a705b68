//! Allocation Engine
//!
//! 把请求的 (人数, 日期, 时段) 映射到具体桌台并原子落账。
//!
//! 并发约定：可用性检查 + 预订写入在账本事务内合并为单个原子单元；
//! 输掉竞争的请求收到 `Conflict` 后在引擎内部重跑
//! 可用性 + 选择，重试超限后降级为 [`AllocationError::FullyBooked`]，
//! 不向调用方暴露原始冲突。

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::core::config::ReservationPolicy;
use crate::db::models::{DiningTable, Reservation, ReservationStatus};
use crate::db::repository::{DiningTableRepository, RepoError, ReservationRepository};
use crate::notify::{self, NotificationSender};
use crate::reservations::availability::AvailabilityIndex;
use crate::utils::time::format_slot;

/// Allocation request (boundary-validated contact + desired seating)
#[derive(Debug, Clone)]
pub struct AllocationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Optional free-text occasion, stored verbatim
    pub purpose: Option<String>,
    pub party_size: i32,
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub preferred_table: Option<String>,
}

/// Allocation rejection/failure reasons
#[derive(Debug, Error)]
pub enum AllocationError {
    /// Caller-fixable validation failure (400-equivalent)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Requested slot is outside operating hours (not in the valid-slot set)
    #[error("Slot closed: {0}")]
    SlotClosed(String),

    /// No table in the catalog is large enough; re-querying will not help
    #[error("No table large enough for a party of this size")]
    NoCapacity,

    /// Tables exist but all are claimed for this window; retryable with
    /// another slot
    #[error("All suitable tables are booked for this slot")]
    FullyBooked,

    /// Store did not answer in time (retryable 5xx-equivalent)
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for AllocationError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Unavailable(msg) => AllocationError::StorageUnavailable(msg),
            // Conflicts are consumed by the retry loop; one escaping here
            // means retries are exhausted
            RepoError::Conflict(_) => AllocationError::FullyBooked,
            other => AllocationError::Storage(other.to_string()),
        }
    }
}

/// Table allocation engine
#[derive(Clone)]
pub struct AllocationEngine {
    catalog: DiningTableRepository,
    availability: AvailabilityIndex,
    reservations: ReservationRepository,
    policy: ReservationPolicy,
    notifier: Arc<dyn NotificationSender>,
}

impl AllocationEngine {
    pub fn new(
        catalog: DiningTableRepository,
        availability: AvailabilityIndex,
        reservations: ReservationRepository,
        policy: ReservationPolicy,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            catalog,
            availability,
            reservations,
            policy,
            notifier,
        }
    }

    /// Allocate a table and persist the confirmed reservation.
    ///
    /// On success the ledger holds the new claim and a confirmation
    /// notification is dispatched best-effort.
    pub async fn allocate(&self, req: AllocationRequest) -> Result<Reservation, AllocationError> {
        self.validate(&req)?;

        let mut attempts = 0;
        loop {
            let available = self
                .availability
                .find_available(req.date, req.time_slot, req.party_size)
                .await?;

            let table = self.select_table(&req, &available).await?;
            let reservation = self.build_reservation(&req, &table);

            match self.reservations.create_claimed(reservation).await {
                Ok(created) => {
                    tracing::info!(
                        table = %table.code,
                        date = %req.date,
                        slot = %format_slot(req.time_slot),
                        party_size = req.party_size,
                        "Reservation confirmed"
                    );
                    notify::dispatch(self.notifier.clone(), created.clone());
                    return Ok(created);
                }
                Err(RepoError::Conflict(_)) => {
                    attempts += 1;
                    if attempts > self.policy.allocation_max_retries {
                        tracing::warn!(
                            table = %table.code,
                            date = %req.date,
                            attempts,
                            "Allocation retries exhausted, reporting fully booked"
                        );
                        return Err(AllocationError::FullyBooked);
                    }
                    tracing::debug!(
                        table = %table.code,
                        attempt = attempts,
                        "Lost claim race, re-running availability"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }
    }

    fn validate(&self, req: &AllocationRequest) -> Result<(), AllocationError> {
        let policy = &self.policy;
        if req.party_size < policy.min_party_size || req.party_size > policy.max_party_size {
            return Err(AllocationError::InvalidRequest(format!(
                "Party size must be between {} and {}, got {}",
                policy.min_party_size, policy.max_party_size, req.party_size
            )));
        }

        let today = crate::utils::time::today();
        if req.date < today {
            return Err(AllocationError::InvalidRequest(format!(
                "Date {} is in the past",
                req.date
            )));
        }
        let horizon = today + chrono::Duration::days(policy.max_advance_days);
        if req.date > horizon {
            return Err(AllocationError::InvalidRequest(format!(
                "Date {} is more than {} days ahead",
                req.date, policy.max_advance_days
            )));
        }

        if !policy.is_valid_slot(req.time_slot) {
            return Err(AllocationError::SlotClosed(format!(
                "{} is not a bookable slot",
                format_slot(req.time_slot)
            )));
        }

        // Today's slots strictly in the past are gone
        if req.date == today && req.time_slot < crate::utils::time::now_time() {
            return Err(AllocationError::InvalidRequest(format!(
                "Slot {} today has already passed",
                format_slot(req.time_slot)
            )));
        }

        Ok(())
    }

    /// Pick the table for this request from the available set.
    ///
    /// Preferred table wins when it is present; otherwise best-fit, or a
    /// rejection in strict mode.
    async fn select_table(
        &self,
        req: &AllocationRequest,
        available: &[DiningTable],
    ) -> Result<DiningTable, AllocationError> {
        if let Some(pref) = &req.preferred_table {
            if let Some(table) = available.iter().find(|t| &t.code == pref) {
                return Ok(table.clone());
            }
            // Preferred table not usable: unknown codes are a caller error,
            // a busy/undersized table falls back or rejects per policy
            if self.catalog.find_by_code(pref).await?.is_none() {
                return Err(AllocationError::InvalidRequest(format!(
                    "Unknown table: {pref}"
                )));
            }
            if self.policy.strict_preferred_table {
                return Err(AllocationError::FullyBooked);
            }
        }

        match select_best_fit(available) {
            Some(table) => Ok(table.clone()),
            None => {
                // Distinguish a permanently impossible party from a busy night
                let max = self.catalog.max_capacity().await?;
                if max < req.party_size {
                    Err(AllocationError::NoCapacity)
                } else {
                    Err(AllocationError::FullyBooked)
                }
            }
        }
    }

    fn build_reservation(&self, req: &AllocationRequest, table: &DiningTable) -> Reservation {
        let window = self.availability.window_for(req.time_slot, &table.section);
        let now = Utc::now();
        Reservation {
            id: None,
            full_name: req.full_name.clone(),
            email: req.email.clone(),
            phone: req.phone.clone(),
            purpose: req.purpose.clone(),
            party_size: req.party_size,
            date: req.date,
            time_slot: format_slot(req.time_slot),
            slot_start_min: window.start_min,
            slot_end_min: window.end_min,
            assigned_table: Some(table.code.clone()),
            section: Some(table.section.clone()),
            status: ReservationStatus::Confirmed,
            total_amount: Decimal::ZERO,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Best-fit selection: smallest capacity that seats the party, ties broken
/// by table code ascending. The input set is already capacity-filtered.
pub fn select_best_fit(available: &[DiningTable]) -> Option<&DiningTable> {
    available
        .iter()
        .min_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.code.cmp(&b.code)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(code: &str, capacity: i32) -> DiningTable {
        DiningTable {
            id: None,
            code: code.to_string(),
            capacity,
            section: "Main Dining".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn best_fit_prefers_smallest_adequate_capacity() {
        // Capacities {2,4,4,6,8}, already filtered for a party of 3
        let available = vec![
            table("A2", 4),
            table("A3", 4),
            table("A4", 6),
            table("A5", 8),
        ];
        let selected = select_best_fit(&available).unwrap();
        assert_eq!(selected.capacity, 4);
        // Tie between A2 and A3 goes to the smaller code
        assert_eq!(selected.code, "A2");
    }

    #[test]
    fn best_fit_tie_break_ignores_input_order() {
        let available = vec![table("B2", 4), table("A3", 4)];
        assert_eq!(select_best_fit(&available).unwrap().code, "A3");
    }

    #[test]
    fn best_fit_of_empty_set_is_none() {
        assert!(select_best_fit(&[]).is_none());
    }
}
