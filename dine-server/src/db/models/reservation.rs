//! Reservation Model
//!
//! 预订记录：分配引擎创建，状态机流转，永不物理删除

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Reservation status state machine
///
/// `pending -> confirmed -> seated -> completed`, with side exits
/// `pending|confirmed -> cancelled` and `confirmed -> no-show`.
/// Only `confirmed` and `seated` hold an occupancy claim on a table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Seated,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Status names as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Seated => "seated",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
        }
    }

    /// Whether this status occupies the assigned table
    pub fn holds_claim(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Seated)
    }

    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Whether a transition to `target` is allowed (excluding the
    /// idempotent same-state case, which callers treat as a no-op)
    pub fn can_transition_to(&self, target: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Seated)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (Seated, Completed)
        )
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "seated" => Ok(Self::Seated),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no-show" => Ok(Self::NoShow),
            other => Err(format!("Unknown reservation status: {other}")),
        }
    }
}

/// Claim-row granularity in minutes.
///
/// Bookable slots sit on a 30-minute grid, so two overlapping occupancy
/// windows always share at least one 30-minute bucket; one claim row per
/// bucket lets a unique store index arbitrate conflicting writers.
pub const CLAIM_GRANULARITY_MIN: i32 = 30;

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Optional free-text occasion ("Birthday dinner", ...)
    #[serde(default)]
    pub purpose: Option<String>,
    pub party_size: i32,
    pub date: NaiveDate,
    /// Requested slot as "HH:MM"
    pub time_slot: String,
    /// Occupancy window start, minutes since midnight
    pub slot_start_min: i32,
    /// Occupancy window end (exclusive), minutes since midnight
    pub slot_end_min: i32,
    /// Assigned table code; None until allocation succeeds
    pub assigned_table: Option<String>,
    /// Section of the assigned table (turnover policy input)
    pub section: Option<String>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub total_amount: Decimal,
    /// Optimistic concurrency version, bumped on every transition
    #[serde(default)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Half-open window overlap test against another claim window
    pub fn overlaps(&self, start_min: i32, end_min: i32) -> bool {
        self.slot_start_min < end_min && start_min < self.slot_end_min
    }

    /// 30-minute buckets covered by this reservation's occupancy window
    pub fn claim_slots(&self) -> Vec<i32> {
        (self.slot_start_min..self.slot_end_min)
            .step_by(CLAIM_GRANULARITY_MIN as usize)
            .collect()
    }
}

/// Filter for reservation listing (admin)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationFilter {
    pub status: Option<ReservationStatus>,
    pub date: Option<NaiveDate>,
    pub email: Option<String>,
}
