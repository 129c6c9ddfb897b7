use crate::modules::attendance::core::finalize::finalize_record;
use crate::modules::attendance::core::intents::AttendanceIntent;
use crate::modules::attendance::core::record::{AttendanceRecord, InvariantViolation};
use crate::modules::attendance::core::shift_policy::{FallbackThresholds, ShiftPolicy};
use crate::modules::attendance::core::status::{AttendanceStatus, CorrectionStatus};
use crate::modules::attendance::use_cases::resolve_correction::command::{
    DecideCorrection, RequestCorrection, Resolution,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("Attendance for {date} is marked as {status}")]
    Protected {
        date: chrono::NaiveDate,
        status: AttendanceStatus,
    },

    #[error("A correction is already pending for this day")]
    AlreadyRequested,

    #[error("No correction is pending for this day")]
    NothingPending,

    #[error("A correction reason is required")]
    MissingReason,

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

#[derive(Debug)]
pub enum Decision {
    Accepted {
        record: AttendanceRecord,
        intents: Vec<AttendanceIntent>,
    },
    Rejected {
        reason: DecideError,
    },
}

pub fn decide_request(record: &AttendanceRecord, command: &RequestCorrection) -> Decision {
    if record.status.is_exogenous() {
        return rejected(DecideError::Protected {
            date: record.date,
            status: record.status,
        });
    }
    if record.correction_status == Some(CorrectionStatus::Pending) {
        return rejected(DecideError::AlreadyRequested);
    }
    let reason = command.reason.trim();
    if reason.is_empty() {
        return rejected(DecideError::MissingReason);
    }

    let mut next = record.clone();
    next.correction_requested = true;
    next.correction_reason = Some(reason.to_string());
    next.correction_status = Some(CorrectionStatus::Pending);
    next.touch(&command.actor.user_id, command.at);
    Decision::Accepted {
        record: next,
        intents: Vec::new(),
    }
}

pub fn decide_correction(
    record: &AttendanceRecord,
    command: &DecideCorrection,
    policy: Option<&ShiftPolicy>,
    fallback: &FallbackThresholds,
) -> Decision {
    let is_pending = record.correction_status == Some(CorrectionStatus::Pending)
        || record.status == AttendanceStatus::PendingCorrection;
    if !is_pending {
        return rejected(DecideError::NothingPending);
    }

    let from = record.status;
    let by = command.actor.user_id.as_str();
    let mut next = record.clone();
    next.correction_requested = false;

    let remark = match &command.resolution {
        Resolution::Approve {
            clock_in,
            clock_out,
        } => {
            if clock_in.is_some() {
                next.clock_in = *clock_in;
            }
            if clock_out.is_some() {
                next.clock_out = *clock_out;
            }
            next.correction_status = Some(CorrectionStatus::Approved);
            next.corrected_by = Some(by.to_string());
            next.corrected_at = Some(command.at);
            if next.clock_in.is_none() {
                next.status = AttendanceStatus::Absent;
                next.half_day_type = None;
                next.status_reason = Some("Correction approved without a clock-in".into());
            } else if next.status == AttendanceStatus::Absent {
                next.half_day_type = None;
                if next.is_clocked_out() {
                    next.status = AttendanceStatus::Completed;
                    next.status_reason = None;
                } else {
                    next.status = AttendanceStatus::PendingCorrection;
                    next.status_reason =
                        Some("Clock-in corrected; the clock-out is still missing".into());
                }
            }
            "Correction approved"
        }
        Resolution::Reject => {
            next.correction_status = Some(CorrectionStatus::Rejected);
            "Correction rejected"
        }
    };

    if let Err(violation) = next.check_invariants() {
        return rejected(violation.into());
    }
    let closes_the_day = matches!(
        next.status,
        AttendanceStatus::PendingCorrection | AttendanceStatus::Completed
    ) || matches!(command.resolution, Resolution::Approve { .. });
    if closes_the_day && next.is_clocked_in() {
        if let Err(e) = finalize_record(&mut next, policy, fallback) {
            tracing::info!(
                employee_id = %next.employee_id,
                date = %next.date,
                error = %e,
                "corrected record stays under review"
            );
        }
    }

    next.touch(by, command.at);
    let text = match command.remarks.as_deref().map(str::trim) {
        Some(extra) if !extra.is_empty() => format!("{remark}: {extra}"),
        _ => remark.to_string(),
    };
    next.add_remark(by, command.at, text);

    let intents = AttendanceIntent::for_transition(&next, Some(from))
        .into_iter()
        .collect();
    Decision::Accepted {
        record: next,
        intents,
    }
}

fn rejected(reason: DecideError) -> Decision {
    Decision::Rejected { reason }
}
