use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::modules::attendance::core::status::WorkMode;
use crate::modules::attendance::use_cases::track_attendance::command::{
    AttendanceAction, TrackAttendance,
};
use crate::shell::http::actor_from_headers;
use crate::shell::state::AppState;

#[derive(Deserialize)]
pub struct TrackAttendanceBody {
    pub employee_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub device_info: Option<String>,
}

pub async fn clock_in(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TrackAttendanceBody>, JsonRejection>,
) -> impl IntoResponse {
    track(state, headers, AttendanceAction::ClockIn, body).await
}

pub async fn clock_out(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TrackAttendanceBody>, JsonRejection>,
) -> impl IntoResponse {
    track(state, headers, AttendanceAction::ClockOut, body).await
}

pub async fn start_break(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TrackAttendanceBody>, JsonRejection>,
) -> impl IntoResponse {
    track(state, headers, AttendanceAction::StartBreak, body).await
}

pub async fn end_break(
    state: State<AppState>,
    headers: HeaderMap,
    body: Result<Json<TrackAttendanceBody>, JsonRejection>,
) -> impl IntoResponse {
    track(state, headers, AttendanceAction::EndBreak, body).await
}

async fn track(
    State(state): State<AppState>,
    headers: HeaderMap,
    action: AttendanceAction,
    body: Result<Json<TrackAttendanceBody>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let actor = match actor_from_headers(&headers) {
        Ok(actor) => actor,
        Err(e) => return e.into_response(),
    };

    let command = TrackAttendance {
        employee_id: body.employee_id,
        action,
        at: state.clock.now(),
        date: body.date,
        work_mode: body.work_mode,
        location: body.location,
        device_info: body.device_info,
        actor,
    };

    match state.track_handler.handle(command).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}
