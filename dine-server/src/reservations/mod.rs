//! Reservation Subsystem
//!
//! The reservation flow is split into four cooperating parts:
//!
//! - **slots**: occupancy windows (half-open minute intervals) and overlap
//! - **availability**: free/busy projection over the reservation ledger
//! - **allocation**: table selection + atomic claim insertion
//! - **ledger**: reservation lifecycle and the status state machine
//!
//! # Data Flow
//!
//! ```text
//! AllocationRequest → AllocationEngine → AvailabilityIndex (read)
//!                            ↓
//!               ReservationRepository::create_claimed (atomic write)
//!                            ↓
//!                 Notification dispatch (best-effort)
//! ```
//!
//! Updates after creation (seat, complete, cancel, no-show) go through
//! [`ledger::ReservationLedger`], which enforces the transition matrix and
//! retries stale optimistic writes.

pub mod allocation;
pub mod availability;
pub mod ledger;
pub mod slots;

pub use allocation::{AllocationEngine, AllocationError, AllocationRequest};
pub use availability::AvailabilityIndex;
pub use ledger::{LedgerError, ReservationLedger};
pub use slots::OccupancyWindow;

#[cfg(test)]
mod tests;
