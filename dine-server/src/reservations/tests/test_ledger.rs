use super::*;
use crate::db::models::{ReservationFilter, ReservationStatus};
use crate::reservations::LedgerError;

async fn booked_context() -> (TestContext, String) {
    let ctx = TestContext::new(&[("A2", 4, "Main Dining")]).await;
    let created = ctx.engine().allocate(request(4, "19:00")).await.unwrap();
    let id = created.id.unwrap().to_string();
    (ctx, id)
}

#[tokio::test]
async fn seating_and_completing_follow_the_state_machine() {
    let (ctx, id) = booked_context().await;
    let ledger = ctx.ledger();

    let seated = ledger
        .transition(&id, ReservationStatus::Seated)
        .await
        .unwrap();
    assert_eq!(seated.status, ReservationStatus::Seated);
    assert_eq!(seated.version, 1);

    let completed = ledger
        .transition(&id, ReservationStatus::Completed)
        .await
        .unwrap();
    assert_eq!(completed.status, ReservationStatus::Completed);
    assert_eq!(completed.version, 2);
}

#[tokio::test]
async fn transition_to_current_status_is_a_no_op() {
    let (ctx, id) = booked_context().await;
    let ledger = ctx.ledger();

    let unchanged = ledger
        .transition(&id, ReservationStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(unchanged.status, ReservationStatus::Confirmed);
    // No write happened
    assert_eq!(unchanged.version, 0);
}

#[tokio::test]
async fn completed_reservations_cannot_be_reseated() {
    let (ctx, id) = booked_context().await;
    let ledger = ctx.ledger();

    ledger
        .transition(&id, ReservationStatus::Seated)
        .await
        .unwrap();
    ledger
        .transition(&id, ReservationStatus::Completed)
        .await
        .unwrap();

    let err = ledger
        .transition(&id, ReservationStatus::Seated)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidTransition {
            from: ReservationStatus::Completed,
            to: ReservationStatus::Seated,
        }
    ));
}

#[tokio::test]
async fn cancelled_is_terminal() {
    let (ctx, id) = booked_context().await;
    let ledger = ctx.ledger();

    ledger
        .transition(&id, ReservationStatus::Cancelled)
        .await
        .unwrap();

    let err = ledger
        .transition(&id, ReservationStatus::Confirmed)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition { .. }));
}

#[tokio::test]
async fn no_show_from_confirmed() {
    let (ctx, id) = booked_context().await;
    let ledger = ctx.ledger();

    let marked = ledger
        .transition(&id, ReservationStatus::NoShow)
        .await
        .unwrap();
    assert_eq!(marked.status, ReservationStatus::NoShow);
    assert!(marked.status.is_terminal());
}

#[tokio::test]
async fn seated_guests_cannot_cancel() {
    let (ctx, id) = booked_context().await;
    let ledger = ctx.ledger();

    ledger
        .transition(&id, ReservationStatus::Seated)
        .await
        .unwrap();
    let err = ledger
        .transition(&id, ReservationStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransition { .. }));
}

#[tokio::test]
async fn unknown_reservation_is_not_found() {
    let ctx = TestContext::new(&[("A2", 4, "Main Dining")]).await;
    let ledger = ctx.ledger();

    let err = ledger
        .transition("reservation:nothere", ReservationStatus::Seated)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[tokio::test]
async fn list_filters_by_status_and_email() {
    let ctx = TestContext::new(FLOOR_TWO).await;
    let engine = ctx.engine();
    let ledger = ctx.ledger();

    let first = engine.allocate(request(2, "19:00")).await.unwrap();
    let mut other = request(2, "20:30");
    other.email = "late@example.com".to_string();
    engine.allocate(other).await.unwrap();

    ledger
        .transition(&first.id.unwrap().to_string(), ReservationStatus::Cancelled)
        .await
        .unwrap();

    let cancelled = ledger
        .list(ReservationFilter {
            status: Some(ReservationStatus::Cancelled),
            date: None,
            email: None,
        })
        .await
        .unwrap();
    assert_eq!(cancelled.len(), 1);

    let by_email = ledger
        .list(ReservationFilter {
            status: None,
            date: None,
            email: Some("late@example.com".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].time_slot, "20:30");
}

const FLOOR_TWO: &[(&str, i32, &str)] = &[("A1", 2, "Main Dining"), ("B1", 2, "Window Side")];
