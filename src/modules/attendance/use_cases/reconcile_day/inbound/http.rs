use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::modules::attendance::use_cases::reconcile_day::command::TriggerReconciliation;
use crate::shell::http::actor_from_headers;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct TriggerReconciliationBody {
    pub date: NaiveDate,
}

pub async fn trigger(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TriggerReconciliationBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    let command = TriggerReconciliation {
        date: body.date,
        actor,
    };
    match state.reconciliation.trigger(command).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => e.into_response(),
    }
}
