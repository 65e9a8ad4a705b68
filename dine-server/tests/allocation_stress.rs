//! 分配压力测试 - 并发预订风暴
//!
//! 使用完整的 ServerState（内存数据库 + 默认桌台目录），
//! 模拟一晚上的并发预订请求，验证台账从不持有重叠占用。

use chrono::{Duration, NaiveTime};
use dine_server::reservations::AllocationError;
use dine_server::{AllocationRequest, Config, ServerState};
use rand::Rng;

const REQUEST_COUNT: usize = 200;

fn random_request(idx: usize) -> AllocationRequest {
    let mut rng = rand::thread_rng();
    const SLOTS: &[&str] = &[
        "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "18:00", "18:30",
        "19:00", "19:30", "20:00", "20:30", "21:00", "21:30", "22:00",
    ];
    let slot = SLOTS[rng.gen_range(0..SLOTS.len())];

    AllocationRequest {
        full_name: format!("Guest {idx}"),
        email: format!("guest{idx}@example.com"),
        phone: format!("+91 98765 4{idx:04}"),
        purpose: None,
        party_size: rng.gen_range(1..=8),
        date: chrono::Local::now().date_naive() + Duration::days(rng.gen_range(1..=3)),
        time_slot: NaiveTime::parse_from_str(slot, "%H:%M").unwrap(),
        preferred_table: None,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_booking_storm_never_overlaps_claims() {
    let config = Config::from_env();
    let db = dine_server::db::DbService::new_in_memory().await.unwrap();
    let state = ServerState::with_db(config, db.db);
    state.seed().await;

    let mut handles = Vec::with_capacity(REQUEST_COUNT);
    for idx in 0..REQUEST_COUNT {
        let engine = state.engine.clone();
        handles.push(tokio::spawn(
            async move { engine.allocate(random_request(idx)).await },
        ));
    }

    let mut confirmed = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => confirmed += 1,
            Err(AllocationError::FullyBooked | AllocationError::NoCapacity) => rejected += 1,
            Err(other) => panic!("unexpected allocation failure: {other}"),
        }
    }

    println!("confirmed: {confirmed}, rejected: {rejected}");
    assert!(confirmed > 0, "the empty floor should accept bookings");

    // Invariant: no table ever holds two overlapping claims
    for offset in 1..=3 {
        let date = chrono::Local::now().date_naive() + Duration::days(offset);
        let claims = state.reservations.claims_for_date(date).await.unwrap();
        for (i, a) in claims.iter().enumerate() {
            for b in claims.iter().skip(i + 1) {
                if a.assigned_table == b.assigned_table {
                    let disjoint =
                        a.slot_end_min <= b.slot_start_min || b.slot_end_min <= a.slot_start_min;
                    assert!(
                        disjoint,
                        "overlapping claims on {:?} at {date}: [{}, {}) and [{}, {})",
                        a.assigned_table,
                        a.slot_start_min,
                        a.slot_end_min,
                        b.slot_start_min,
                        b.slot_end_min
                    );
                }
            }
        }
    }
}
