//! Reservation Ledger
//!
//! 预订全生命周期的权威记录。状态机推进使用乐观版本号，
//! 并发修改同一条预订时输家收到 stale 并在此处重读重试。

use thiserror::Error;

use crate::db::models::{Reservation, ReservationFilter, ReservationStatus};
use crate::db::repository::{RepoError, ReservationRepository};

/// Attempts at a version-checked status write before giving up
const STATUS_UPDATE_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    /// Concurrent writers kept invalidating our read; caller should retry
    #[error("Reservation was modified concurrently, please retry")]
    StaleState,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for LedgerError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => LedgerError::NotFound(msg),
            RepoError::Unavailable(msg) => LedgerError::StorageUnavailable(msg),
            other => LedgerError::Storage(other.to_string()),
        }
    }
}

/// Reservation ledger service
#[derive(Clone)]
pub struct ReservationLedger {
    reservations: ReservationRepository,
}

impl ReservationLedger {
    pub fn new(reservations: ReservationRepository) -> Self {
        Self { reservations }
    }

    pub async fn find(&self, id: &str) -> Result<Reservation, LedgerError> {
        self.reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    pub async fn list(&self, filter: ReservationFilter) -> Result<Vec<Reservation>, LedgerError> {
        Ok(self.reservations.list(&filter).await?)
    }

    /// Drive a reservation to `target` through the status state machine.
    ///
    /// Transition to the current status is an idempotent no-op. Each retry
    /// re-reads the record so the state-machine check always runs against
    /// the latest status.
    pub async fn transition(
        &self,
        id: &str,
        target: ReservationStatus,
    ) -> Result<Reservation, LedgerError> {
        for _ in 0..STATUS_UPDATE_RETRIES {
            let current = self.find(id).await?;

            if current.status == target {
                return Ok(current);
            }
            if !current.status.can_transition_to(target) {
                return Err(LedgerError::InvalidTransition {
                    from: current.status,
                    to: target,
                });
            }

            match self
                .reservations
                .update_status(id, target, current.version)
                .await?
            {
                Some(updated) => {
                    tracing::info!(
                        reservation = id,
                        from = %current.status,
                        to = %target,
                        "Reservation status updated"
                    );
                    return Ok(updated);
                }
                // Version mismatch: someone moved the record under us
                None => {
                    tracing::debug!(reservation = id, "Stale status write, re-reading");
                }
            }
        }
        Err(LedgerError::StaleState)
    }
}
