use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;

use crate::modules::attendance::adapters::outbound::records::RepositoryError;
use crate::modules::attendance::core::capability::{Actor, Capability};
use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::modules::attendance::use_cases::monthly_summary::inbound::http as summary_http;
use crate::modules::attendance::use_cases::override_record::inbound::http as override_http;
use crate::modules::attendance::use_cases::reconcile_day::inbound::http as reconcile_http;
use crate::modules::attendance::use_cases::resolve_correction::inbound::http as correction_http;
use crate::modules::attendance::use_cases::track_attendance::inbound::http as track_http;
use crate::shell::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const CAPABILITY_HEADER: &str = "x-capability";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/attendance/clock-in", post(track_http::clock_in))
        .route("/attendance/clock-out", post(track_http::clock_out))
        .route("/attendance/break-start", post(track_http::start_break))
        .route("/attendance/break-end", post(track_http::end_break))
        .route("/attendance/corrections", post(correction_http::request))
        .route("/attendance/corrections/decide", post(correction_http::decide))
        .route("/attendance/override", post(override_http::override_record))
        .route("/attendance/flag", post(override_http::flag))
        .route("/attendance/reconcile", post(reconcile_http::trigger))
        .route(
            "/attendance/records/{employee_id}/{date}",
            get(summary_http::record),
        )
        .route(
            "/attendance/summary/{employee_id}/{year}/{month}",
            get(summary_http::monthly_summary),
        )
        .with_state(state)
}

/// Caller identity as resolved upstream. A missing capability header means
/// self-service.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApplicationError> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApplicationError::Forbidden(format!("missing {USER_ID_HEADER} header")))?;
    let capability = match headers.get(CAPABILITY_HEADER) {
        Some(raw) => raw
            .to_str()
            .map_err(|e| ApplicationError::Forbidden(e.to_string()))?
            .parse::<Capability>()
            .map_err(ApplicationError::Forbidden)?,
        None => Capability::SelfService,
    };
    Ok(Actor {
        user_id: user_id.to_string(),
        capability,
    })
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match &self {
            ApplicationError::Denied(reason) => {
                (StatusCode::CONFLICT, json!({ "reason": reason }))
            }
            ApplicationError::Forbidden(_) => (StatusCode::FORBIDDEN, json!({ "error": message })),
            ApplicationError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApplicationError::Invalid { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": field }),
            ),
            ApplicationError::ReconciliationInProgress(_)
            | ApplicationError::Repository(
                RepositoryError::Duplicate { .. } | RepositoryError::VersionMismatch { .. },
            ) => (StatusCode::CONFLICT, json!({ "error": message })),
            ApplicationError::Repository(_)
            | ApplicationError::Outbox(_)
            | ApplicationError::Collaborator(_) => {
                tracing::error!(error = %message, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": message }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
