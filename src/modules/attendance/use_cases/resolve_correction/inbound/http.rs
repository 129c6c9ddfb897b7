use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::modules::attendance::use_cases::resolve_correction::command::{
    DecideCorrection, RequestCorrection, Resolution,
};
use crate::shell::http::actor_from_headers;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct RequestCorrectionBody {
    pub employee_id: String,
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct DecideCorrectionBody {
    pub employee_id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub resolution: Resolution,
    #[serde(default)]
    pub remarks: Option<String>,
}

pub async fn request(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RequestCorrectionBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    let command = RequestCorrection {
        employee_id: body.employee_id,
        date: body.date,
        reason: body.reason,
        at: state.clock.now(),
        actor,
    };
    match state.correction_handler.request(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn decide(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<DecideCorrectionBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };
    let command = DecideCorrection {
        employee_id: body.employee_id,
        date: body.date,
        resolution: body.resolution,
        remarks: body.remarks,
        at: state.clock.now(),
        actor,
    };
    match state.correction_handler.decide(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}
