use super::*;
use crate::db::models::ReservationStatus;
use crate::reservations::AllocationError;

/// Many guests race for the single remaining table; the unique claim
/// index must admit exactly one of them. Runs on a multi-threaded
/// runtime so the store sees genuinely parallel transactions, not just
/// interleaved ones.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn race_for_the_last_table_admits_exactly_one() {
    let ctx = TestContext::new(&[("A2", 4, "Main Dining")]).await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = ctx.engine();
        handles.push(tokio::spawn(async move {
            let mut req = request(4, "19:00");
            req.email = format!("guest{i}@example.com");
            engine.allocate(req).await
        }));
    }

    let mut won = 0;
    let mut booked_out = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(created) => {
                assert_eq!(created.assigned_table.as_deref(), Some("A2"));
                won += 1;
            }
            Err(AllocationError::FullyBooked) => booked_out += 1,
            Err(other) => panic!("unexpected allocation error: {other}"),
        }
    }

    assert_eq!(won, 1);
    assert_eq!(booked_out, 15);

    let claims = ctx
        .reservations
        .claims_for_date(test_date())
        .await
        .unwrap();
    assert_eq!(claims.len(), 1, "duplicate claims persisted");
}

/// With several tables free, concurrent requests spread across them
/// without double-assigning any.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_never_share_a_table() {
    let ctx = TestContext::new(&[
        ("A1", 2, "Main Dining"),
        ("A2", 4, "Main Dining"),
        ("A3", 4, "Main Dining"),
        ("B2", 4, "Window Side"),
    ])
    .await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let engine = ctx.engine();
        handles.push(tokio::spawn(async move {
            let mut req = request(2, "19:00");
            req.email = format!("party{i}@example.com");
            engine.allocate(req).await
        }));
    }

    let mut assigned = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(created) => assigned.push(created.assigned_table.unwrap()),
            Err(AllocationError::FullyBooked) => {}
            Err(other) => panic!("unexpected allocation error: {other}"),
        }
    }

    assert_eq!(assigned.len(), 4, "all four tables should fill");
    let mut unique = assigned.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), assigned.len(), "a table was double-booked");
}

/// Same guest count, disjoint windows: no contention, both succeed on the
/// same table.
#[tokio::test]
async fn disjoint_windows_do_not_contend() {
    let ctx = TestContext::new(&[("A2", 4, "Main Dining")]).await;

    let lunch_engine = ctx.engine();
    let dinner_engine = ctx.engine();
    let (lunch, dinner) = tokio::join!(
        lunch_engine.allocate(request(4, "12:00")),
        dinner_engine.allocate(request(4, "18:00")),
    );

    assert_eq!(lunch.unwrap().assigned_table.as_deref(), Some("A2"));
    assert_eq!(dinner.unwrap().assigned_table.as_deref(), Some("A2"));
}

/// Two operators seating the same party at once: one write wins, the other
/// lands on the idempotent path after its stale retry.
#[tokio::test]
async fn concurrent_seating_converges() {
    let ctx = TestContext::new(&[("A2", 4, "Main Dining")]).await;
    let created = ctx.engine().allocate(request(4, "19:00")).await.unwrap();
    let id = created.id.unwrap().to_string();

    let ledger_a = ctx.ledger();
    let ledger_b = ctx.ledger();
    let id_a = id.clone();
    let id_b = id.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { ledger_a.transition(&id_a, ReservationStatus::Seated).await }),
        tokio::spawn(async move { ledger_b.transition(&id_b, ReservationStatus::Seated).await }),
    );

    assert!(a.unwrap().is_ok());
    assert!(b.unwrap().is_ok());

    let current = ctx.ledger().find(&id).await.unwrap();
    assert_eq!(current.status, ReservationStatus::Seated);
    assert_eq!(current.version, 1, "only one write should have landed");
}
