// Persistence port for attendance records.
//
// The storage layer is the real concurrency backstop: uniqueness on
// (employee_id, date), a version check on every update, and set-based bulk
// transitions guarded by date and status. There is no in-process locking.

use crate::modules::attendance::core::record::{AttendanceRecord, InvariantViolation};
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::shared::core::primitives::EmployeeId;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("attendance record already exists for {employee_id} on {date}")]
    Duplicate {
        employee_id: String,
        date: NaiveDate,
    },

    #[error("attendance record not found for {employee_id} on {date}")]
    NotFound {
        employee_id: String,
        date: NaiveDate,
    },

    #[error("version mismatch: expected {expected}, actual {actual}")]
    VersionMismatch { expected: i64, actual: i64 },

    #[error("invariant violated on {field}: {0}", field = .0.field())]
    Invariant(#[from] InvariantViolation),

    #[error("backend error: {0}")]
    Backend(String),
}

/// One row touched by a bulk transition, with the status it had before.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub from: AttendanceStatus,
    pub record: AttendanceRecord,
}

/// Audit stamp written by a bulk transition.
#[derive(Debug, Clone)]
pub struct BulkStamp<'a> {
    pub reason: &'a str,
    pub by: &'a str,
    pub at: NaiveDateTime,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError>;

    /// Stores a new record; fails with `Duplicate` when (employee, date) is
    /// taken. Returns the stored record.
    async fn insert(&self, record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError>;

    /// Replaces a record whose stored version equals `record.version`.
    /// Returns the stored record with its bumped version.
    async fn update(&self, record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError>;

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, RepositoryError>;

    async fn list_for_month(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError>;

    /// `clock_in IS NULL AND status NOT IN (leave, holiday, weekend, absent)`
    /// → `absent`.
    async fn mark_absent_where_no_clock_in(
        &self,
        date: NaiveDate,
        stamp: BulkStamp<'_>,
    ) -> Result<Vec<StatusTransition>, RepositoryError>;

    /// `clock_in IS NOT NULL AND clock_out IS NULL AND status NOT IN (leave,
    /// holiday, weekend, pending_correction) AND employee_id NOT IN
    /// (deferred)` → `pending_correction`.
    async fn mark_pending_correction_where_clock_out_missing(
        &self,
        date: NaiveDate,
        stamp: BulkStamp<'_>,
        deferred: &[EmployeeId],
    ) -> Result<Vec<StatusTransition>, RepositoryError>;

    /// Job-lock row serializing reconciliation runs for one date.
    async fn try_lock_reconciliation(&self, date: NaiveDate) -> Result<bool, RepositoryError>;

    async fn unlock_reconciliation(&self, date: NaiveDate) -> Result<(), RepositoryError>;
}
