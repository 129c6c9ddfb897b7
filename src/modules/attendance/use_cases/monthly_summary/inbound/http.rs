use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::NaiveDate;

use crate::modules::attendance::use_cases::errors::ApplicationError;
use crate::shell::http::actor_from_headers;
use crate::shell::state::AppState;

pub async fn record(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((employee_id, date)): Path<(String, NaiveDate)>,
) -> impl IntoResponse {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    match state.queries.record(&actor, &employee_id, date).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => {
            ApplicationError::NotFound(format!("attendance for {employee_id} on {date}"))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

pub async fn monthly_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((employee_id, year, month)): Path<(String, i32, u32)>,
) -> impl IntoResponse {
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    match state
        .queries
        .monthly_summary(&actor, &employee_id, year, month)
        .await
    {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => e.into_response(),
    }
}
