//! Reservation Repository
//!
//! The reservation ledger is the single source of truth for occupancy
//! claims. [`ReservationRepository::create_claimed`] is the final arbiter
//! against double booking: alongside the reservation it inserts one
//! `table_claim` row per 30-minute bucket of the occupancy window, all in
//! one SurrealDB transaction. The unique (table_code, date, slot_min)
//! index makes overlapping writers collide on a shared bucket, so the
//! loser aborts with an error the allocation engine treats as retryable.
//! An overlap pre-check inside the same transaction rejects the common
//! sequential case with a cheap `claim_conflict` throw before any write.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Reservation, ReservationFilter, ReservationStatus};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::time::Duration;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "reservation";

/// Per-status reservation count (analytics)
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub total: i64,
}

/// `count() AS total ... GROUP ALL` projection row
#[derive(Deserialize)]
struct CountRow {
    total: i64,
}

#[derive(Clone)]
pub struct ReservationRepository {
    base: BaseRepository,
}

impl ReservationRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub fn with_timeout(db: Surreal<Db>, timeout: Duration) -> Self {
        Self {
            base: BaseRepository::with_timeout(db, timeout),
        }
    }

    /// Atomically insert a claim-holding reservation.
    ///
    /// The reservation row and one `table_claim` row per occupied
    /// 30-minute bucket are written in a single transaction. A concurrent
    /// writer for an overlapping window hits the same bucket, so exactly
    /// one transaction commits; the loser surfaces as
    /// [`RepoError::Conflict`], as does the in-transaction overlap
    /// pre-check (`claim_conflict`).
    pub async fn create_claimed(&self, reservation: Reservation) -> RepoResult<Reservation> {
        let table_code = reservation
            .assigned_table
            .clone()
            .ok_or_else(|| RepoError::Validation("Reservation has no assigned table".to_string()))?;

        let key = uuid::Uuid::new_v4().simple().to_string();
        let mut content = serde_json::to_value(&reservation)
            .map_err(|e| RepoError::Database(format!("Serialization failed: {e}")))?;
        if let Some(obj) = content.as_object_mut() {
            obj.remove("id");
        }

        let date = reservation.date;
        let start_min = reservation.slot_start_min;
        let end_min = reservation.slot_end_min;
        let slots = reservation.claim_slots();

        self.base
            .guard(async {
                let result = self
                    .base
                    .db()
                    .query(
                        r#"
                        BEGIN TRANSACTION;
                        LET $conflicts = (
                            SELECT VALUE id FROM reservation
                            WHERE assigned_table = $table_code
                              AND date = $date
                              AND status IN ['confirmed', 'seated']
                              AND slot_start_min < $end_min
                              AND $start_min < slot_end_min
                        );
                        IF array::len($conflicts) > 0 { THROW 'claim_conflict' };
                        CREATE type::thing('reservation', $key) CONTENT $content;
                        FOR $slot IN $slots {
                            CREATE table_claim CONTENT {
                                table_code: $table_code,
                                date: $date,
                                slot_min: $slot,
                                reservation: type::thing('reservation', $key)
                            };
                        };
                        COMMIT TRANSACTION;
                        "#,
                    )
                    .bind(("table_code", table_code))
                    .bind(("date", date))
                    .bind(("start_min", start_min))
                    .bind(("end_min", end_min))
                    .bind(("slots", slots))
                    .bind(("key", key.clone()))
                    .bind(("content", content))
                    .await?;

                // A THROW inside the transaction shows up here
                result.check()?;

                let created: Option<Reservation> = self
                    .base
                    .db()
                    .select(RecordId::from_table_key(TABLE, key.clone()))
                    .await?;
                created
                    .ok_or_else(|| RepoError::Database("Failed to create reservation".to_string()))
            })
            .await
    }

    /// All claim-holding reservations on a date (availability projection input)
    pub async fn claims_for_date(&self, date: NaiveDate) -> RepoResult<Vec<Reservation>> {
        self.base
            .guard(async {
                let claims: Vec<Reservation> = self
                    .base
                    .db()
                    .query(
                        "SELECT * FROM reservation WHERE date = $date \
                         AND status IN ['confirmed', 'seated']",
                    )
                    .bind(("date", date))
                    .await?
                    .take(0)?;
                Ok(claims)
            })
            .await
    }

    /// Find reservation by id ("reservation:key" or bare key)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Reservation>> {
        let record_id = parse_id(id)?;
        self.base
            .guard(async {
                let reservation: Option<Reservation> = self.base.db().select(record_id).await?;
                Ok(reservation)
            })
            .await
    }

    /// List reservations, optionally filtered by status/date/email,
    /// ordered by (date, slot)
    pub async fn list(&self, filter: &ReservationFilter) -> RepoResult<Vec<Reservation>> {
        let mut sql = String::from("SELECT * FROM reservation");
        let mut clauses: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            clauses.push("status = $status");
        }
        if filter.date.is_some() {
            clauses.push("date = $date");
        }
        if filter.email.is_some() {
            clauses.push("email = $email");
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date, slot_start_min, created_at");

        let status = filter.status;
        let date = filter.date;
        let email = filter.email.clone();

        self.base
            .guard(async {
                let mut query = self.base.db().query(sql);
                if let Some(status) = status {
                    query = query.bind(("status", status));
                }
                if let Some(date) = date {
                    query = query.bind(("date", date));
                }
                if let Some(email) = email {
                    query = query.bind(("email", email));
                }
                let reservations: Vec<Reservation> = query.await?.take(0)?;
                Ok(reservations)
            })
            .await
    }

    /// Optimistic-version status update.
    ///
    /// Returns `None` when the record's version no longer matches
    /// (`expected_version`), i.e. a concurrent transition won; callers
    /// re-read and retry. A transition out of a claim-holding status
    /// deletes the reservation's `table_claim` rows in the same
    /// transaction, freeing the window for new bookings.
    pub async fn update_status(
        &self,
        id: &str,
        target: ReservationStatus,
        expected_version: i64,
    ) -> RepoResult<Option<Reservation>> {
        let record_id = parse_id(id)?;
        let release = !target.holds_claim();
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query(
                        r#"
                        BEGIN TRANSACTION;
                        LET $updated = (
                            UPDATE reservation SET status = $status, version = version + 1,
                                updated_at = $now
                            WHERE id = $id AND version = $version RETURN AFTER
                        );
                        IF $release AND array::len($updated) > 0 {
                            DELETE table_claim WHERE reservation = $id;
                        };
                        RETURN $updated;
                        COMMIT TRANSACTION;
                        "#,
                    )
                    .bind(("status", target))
                    .bind(("now", Utc::now()))
                    .bind(("id", record_id))
                    .bind(("version", expected_version))
                    .bind(("release", release))
                    .await?;
                let last = result.num_statements() - 1;
                let updated: Vec<Reservation> = result.take(last)?;
                Ok(updated.into_iter().next())
            })
            .await
    }

    /// Total reservation count (analytics)
    pub async fn count_all(&self) -> RepoResult<i64> {
        self.base
            .guard(async {
                let mut result = self
                    .base
                    .db()
                    .query("SELECT count() AS total FROM reservation GROUP ALL")
                    .await?;
                let rows: Vec<CountRow> = result.take(0)?;
                Ok(rows.first().map(|r| r.total).unwrap_or(0))
            })
            .await
    }

    /// Most recently created reservations (analytics)
    pub async fn recent(&self, limit: usize) -> RepoResult<Vec<Reservation>> {
        self.base
            .guard(async {
                let reservations: Vec<Reservation> = self
                    .base
                    .db()
                    .query("SELECT * FROM reservation ORDER BY created_at DESC LIMIT $limit")
                    .bind(("limit", limit))
                    .await?
                    .take(0)?;
                Ok(reservations)
            })
            .await
    }

    /// Per-status counts for a date (analytics)
    pub async fn count_by_status(&self, date: NaiveDate) -> RepoResult<Vec<StatusCount>> {
        self.base
            .guard(async {
                let counts: Vec<StatusCount> = self
                    .base
                    .db()
                    .query(
                        "SELECT status, count() AS total FROM reservation \
                         WHERE date = $date GROUP BY status",
                    )
                    .bind(("date", date))
                    .await?
                    .take(0)?;
                Ok(counts)
            })
            .await
    }
}

fn parse_id(id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))
    } else {
        Ok(RecordId::from_table_key(TABLE, id))
    }
}
