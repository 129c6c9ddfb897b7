use crate::modules::attendance::core::shift_policy::FallbackThresholds;
use crate::shared::core::primitives::FixedClock;
use crate::shell::http::{CAPABILITY_HEADER, USER_ID_HEADER};
use crate::shell::state::{AppState, InMemoryBackends};
use axum::body::Body;
use axum::http::Request;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// In-memory application state whose clock is pinned to `now`.
pub fn app_state_at(now: NaiveDateTime) -> (AppState, InMemoryBackends) {
    let backends = InMemoryBackends::new();
    let state = AppState::in_memory(
        &backends,
        Arc::new(FixedClock::at(now)),
        FallbackThresholds::default(),
        "attendance",
    );
    (state, backends)
}

pub fn json_request(
    method: &str,
    uri: &str,
    user_id: &str,
    capability: Option<&str>,
    body: impl Into<String>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header(USER_ID_HEADER, user_id);
    if let Some(capability) = capability {
        builder = builder.header(CAPABILITY_HEADER, capability);
    }
    builder.body(Body::from(body.into())).unwrap()
}
