// In memory attendance repository.
//
// Purpose
// - Exercise handlers and the reconciliation job without a database.
//
// Responsibilities
// - Enforce uniqueness on (employee_id, date) and optimistic versioning.
// - Validate record invariants before anything is stored.
// - Hold the per-date reconciliation lock rows.

use crate::modules::attendance::adapters::outbound::records::{
    AttendanceRepository, BulkStamp, RepositoryError, StatusTransition,
};
use crate::modules::attendance::core::record::AttendanceRecord;
use crate::modules::attendance::core::status::AttendanceStatus;
use crate::shared::core::primitives::EmployeeId;
use chrono::{Datelike, NaiveDate};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

type RecordKey = (String, NaiveDate);

#[derive(Default)]
pub struct InMemoryAttendanceRecords {
    rows: RwLock<HashMap<RecordKey, AttendanceRecord>>,
    reconciliation_locks: RwLock<HashSet<NaiveDate>>,
    delay_insert_ms: AtomicU64,
    is_offline: bool,
}

impl InMemoryAttendanceRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Widens the window between a handler's read and its insert so racing
    /// writers can be tested.
    pub fn set_delay_insert_ms(&self, ms: u64) {
        self.delay_insert_ms.store(ms, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.is_offline {
            return Err(RepositoryError::Backend("Attendance repository offline".into()));
        }
        Ok(())
    }

    async fn bulk_transition<F>(
        &self,
        date: NaiveDate,
        to: AttendanceStatus,
        stamp: BulkStamp<'_>,
        matches: F,
    ) -> Result<Vec<StatusTransition>, RepositoryError>
    where
        F: Fn(&AttendanceRecord) -> bool,
    {
        self.ensure_online()?;
        let mut guard = self.rows.write().await;
        let mut transitions = Vec::new();
        for record in guard.values_mut().filter(|r| r.date == date) {
            if !matches(record) {
                continue;
            }
            let mut next = record.clone();
            let from = next.status;
            next.status = to;
            next.status_reason = Some(stamp.reason.to_string());
            next.half_day_type = None;
            next.touch(stamp.by, stamp.at);
            next.check_invariants()?;
            next.version += 1;
            *record = next.clone();
            transitions.push(StatusTransition { from, record: next });
        }
        transitions.sort_by(|a, b| a.record.employee_id.cmp(&b.record.employee_id));
        Ok(transitions)
    }
}

fn is_protected(status: AttendanceStatus) -> bool {
    status.is_exogenous()
}

#[async_trait::async_trait]
impl AttendanceRepository for InMemoryAttendanceRecords {
    async fn find(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, RepositoryError> {
        self.ensure_online()?;
        Ok(self
            .rows
            .read()
            .await
            .get(&(employee_id.to_string(), date))
            .cloned())
    }

    async fn insert(&self, record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError> {
        self.ensure_online()?;
        record.check_invariants()?;
        let delay = self.delay_insert_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        let mut guard = self.rows.write().await;
        let key = record.key();
        if guard.contains_key(&key) {
            return Err(RepositoryError::Duplicate {
                employee_id: key.0,
                date: key.1,
            });
        }
        let mut stored = record;
        stored.version = 1;
        guard.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update(&self, record: AttendanceRecord) -> Result<AttendanceRecord, RepositoryError> {
        self.ensure_online()?;
        record.check_invariants()?;
        let mut guard = self.rows.write().await;
        let key = record.key();
        let Some(existing) = guard.get_mut(&key) else {
            return Err(RepositoryError::NotFound {
                employee_id: key.0,
                date: key.1,
            });
        };
        if existing.id != record.id {
            return Err(RepositoryError::Duplicate {
                employee_id: key.0,
                date: key.1,
            });
        }
        if existing.version != record.version {
            return Err(RepositoryError::VersionMismatch {
                expected: record.version,
                actual: existing.version,
            });
        }
        let mut stored = record;
        stored.version += 1;
        *existing = stored.clone();
        Ok(stored)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        self.ensure_online()?;
        let mut items: Vec<AttendanceRecord> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        Ok(items)
    }

    async fn list_for_month(
        &self,
        employee_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<AttendanceRecord>, RepositoryError> {
        self.ensure_online()?;
        let mut items: Vec<AttendanceRecord> = self
            .rows
            .read()
            .await
            .values()
            .filter(|r| {
                r.employee_id == employee_id && r.date.year() == year && r.date.month() == month
            })
            .cloned()
            .collect();
        items.sort_by_key(|r| r.date);
        Ok(items)
    }

    async fn mark_absent_where_no_clock_in(
        &self,
        date: NaiveDate,
        stamp: BulkStamp<'_>,
    ) -> Result<Vec<StatusTransition>, RepositoryError> {
        self.bulk_transition(date, AttendanceStatus::Absent, stamp, |r| {
            r.clock_in.is_none() && !is_protected(r.status) && r.status != AttendanceStatus::Absent
        })
        .await
    }

    async fn mark_pending_correction_where_clock_out_missing(
        &self,
        date: NaiveDate,
        stamp: BulkStamp<'_>,
        deferred: &[EmployeeId],
    ) -> Result<Vec<StatusTransition>, RepositoryError> {
        self.bulk_transition(date, AttendanceStatus::PendingCorrection, stamp, |r| {
            r.clock_in.is_some()
                && r.clock_out.is_none()
                && !is_protected(r.status)
                && r.status != AttendanceStatus::PendingCorrection
                && !deferred.contains(&r.employee_id)
        })
        .await
    }

    async fn try_lock_reconciliation(&self, date: NaiveDate) -> Result<bool, RepositoryError> {
        self.ensure_online()?;
        Ok(self.reconciliation_locks.write().await.insert(date))
    }

    async fn unlock_reconciliation(&self, date: NaiveDate) -> Result<(), RepositoryError> {
        self.reconciliation_locks.write().await.remove(&date);
        Ok(())
    }
}
