//! 通知模块 - 预订确认通知边界
//!
//! 投递本身（SMTP/短信网关）是外部协作方；本模块只定义边界契约和
//! 默认实现。发送始终是 best-effort：分配成功与通知投递互不影响。

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::core::config::RestaurantInfo;
use crate::db::models::Reservation;

/// Notification delivery errors (logged, never propagated to allocation)
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification rendering failed: {0}")]
    Render(String),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

/// Notification sender boundary
///
/// `send` receives a finalized reservation snapshot; implementations own
/// their retry policy.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, reservation: &Reservation) -> Result<(), NotifyError>;
}

/// Default sender: renders the confirmation and writes it to the log.
///
/// Stands in for the SMTP collaborator in development and tests.
pub struct LogNotificationSender {
    restaurant: RestaurantInfo,
}

impl LogNotificationSender {
    pub fn new(restaurant: RestaurantInfo) -> Self {
        Self { restaurant }
    }

    fn render(&self, reservation: &Reservation) -> String {
        format!(
            "Reservation confirmed at {name}: {guest} — {date} {slot}, table {table}, {party} guests. Contact: {phone}",
            name = self.restaurant.name,
            guest = reservation.full_name,
            date = reservation.date,
            slot = reservation.time_slot,
            table = reservation.assigned_table.as_deref().unwrap_or("TBD"),
            party = reservation.party_size,
            phone = self.restaurant.phone,
        )
    }
}

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, reservation: &Reservation) -> Result<(), NotifyError> {
        let body = self.render(reservation);
        tracing::info!(
            target: "notify",
            email = %reservation.email,
            "{body}"
        );
        Ok(())
    }
}

/// Fire-and-forget dispatch on a spawned task.
///
/// Failures are logged with the reservation id; the caller never observes
/// them.
pub fn dispatch(sender: Arc<dyn NotificationSender>, reservation: Reservation) {
    tokio::spawn(async move {
        if let Err(e) = sender.send(&reservation).await {
            let id = reservation
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default();
            tracing::warn!(
                target: "notify",
                reservation = %id,
                error = %e,
                "Confirmation notification failed"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSender(AtomicUsize);

    #[async_trait]
    impl NotificationSender for CountingSender {
        async fn send(&self, _reservation: &Reservation) -> Result<(), NotifyError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Delivery("smtp down".into()))
        }
    }

    fn sample_reservation() -> Reservation {
        Reservation {
            id: None,
            full_name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "+91 9876543210".into(),
            purpose: None,
            party_size: 4,
            date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            time_slot: "19:30".into(),
            slot_start_min: 1170,
            slot_end_min: 1260,
            assigned_table: Some("A3".into()),
            section: Some("Main Dining".into()),
            status: crate::db::models::ReservationStatus::Confirmed,
            total_amount: Decimal::ZERO,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn test_restaurant() -> RestaurantInfo {
        RestaurantInfo {
            name: "DINE24".into(),
            phone: "+91 98765 43210".into(),
            email: "info@dine24.com".into(),
            opening_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            kitchen_closing_time: NaiveTime::from_hms_opt(22, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_reservation_details() {
        let sender = LogNotificationSender::new(test_restaurant());
        let body = sender.render(&sample_reservation());
        assert!(body.contains("John Doe"));
        assert!(body.contains("19:30"));
        assert!(body.contains("table A3"));
    }

    #[tokio::test]
    async fn dispatch_swallows_delivery_failures() {
        let sender = Arc::new(CountingSender(AtomicUsize::new(0)));
        dispatch(sender.clone(), sample_reservation());
        // Give the spawned task a chance to run
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(sender.0.load(Ordering::SeqCst), 1);
    }
}
