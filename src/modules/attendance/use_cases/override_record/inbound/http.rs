use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::modules::attendance::use_cases::override_record::command::{
    FlagRecord, OverrideRecord, RecordPatch,
};
use crate::shell::http::actor_from_headers;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct OverrideRecordBody {
    pub employee_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub patch: RecordPatch,
    #[serde(default)]
    pub refinalize: bool,
}

#[derive(Deserialize)]
pub struct FlagRecordBody {
    pub employee_id: String,
    pub date: NaiveDate,
    pub reason: String,
}

pub async fn override_record(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<OverrideRecordBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    let command = OverrideRecord {
        employee_id: body.employee_id,
        date: body.date,
        patch: body.patch,
        refinalize: body.refinalize,
        at: state.clock.now(),
        actor,
    };
    match state.override_handler.override_record(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn flag(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<FlagRecordBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    let command = FlagRecord {
        employee_id: body.employee_id,
        date: body.date,
        reason: body.reason,
        at: state.clock.now(),
        actor,
    };
    match state.override_handler.flag(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}
