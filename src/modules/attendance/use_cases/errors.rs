use crate::modules::attendance::adapters::outbound::records::RepositoryError;
use crate::modules::attendance::core::record::InvariantViolation;
use crate::shared::infrastructure::intent_outbox::OutboxError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Guard or decision refusal; the record was left untouched.
    #[error("{0}")]
    Denied(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Invariant violation, reported against the conflicting field.
    #[error("invalid {field}: {message}")]
    Invalid { field: String, message: String },

    #[error("reconciliation for {0} is already running")]
    ReconciliationInProgress(NaiveDate),

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Outbox(#[from] OutboxError),

    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

impl From<InvariantViolation> for ApplicationError {
    fn from(violation: InvariantViolation) -> Self {
        Self::Invalid {
            field: violation.field().to_string(),
            message: violation.to_string(),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Invariant(violation) => violation.into(),
            RepositoryError::NotFound { employee_id, date } => {
                Self::NotFound(format!("attendance for {employee_id} on {date}"))
            }
            other => Self::Repository(other),
        }
    }
}

impl From<anyhow::Error> for ApplicationError {
    fn from(error: anyhow::Error) -> Self {
        Self::Collaborator(error.to_string())
    }
}

#[cfg(test)]
mod application_error_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_name_the_conflicting_field_for_invariant_violations() {
        let error: ApplicationError =
            RepositoryError::Invariant(InvariantViolation::AbsentWithClockIn).into();
        match error {
            ApplicationError::Invalid { field, message } => {
                assert_eq!(field, "status");
                assert!(message.contains("cannot be absent"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn it_should_keep_other_repository_errors() {
        let error: ApplicationError = RepositoryError::Backend("down".into()).into();
        assert!(matches!(error, ApplicationError::Repository(_)));
        assert_eq!(error.to_string(), "backend error: down");
    }
}
