use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::modules::artist_watch::use_cases::control_schedule::inbound::http as schedule_http;
use crate::modules::artist_watch::use_cases::errors::CycleError;
use crate::modules::artist_watch::use_cases::manage_seeds::inbound::http as seeds_http;
use crate::modules::artist_watch::use_cases::reconcile_watch_set::inbound::http as reconcile_http;
use crate::modules::artist_watch::use_cases::run_poll_cycle::inbound::http as poll_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/start", post(schedule_http::start))
        .route("/stop", post(schedule_http::stop))
        .route("/status", get(schedule_http::status))
        .route("/seeds", get(seeds_http::list))
        .route("/seeds/{id}", post(seeds_http::watch).delete(seeds_http::unwatch))
        .route("/poll", post(poll_http::handle))
        .route("/reconcile", post(reconcile_http::handle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}

/// Upstream trouble is a bad gateway; store trouble means we are unavailable.
pub fn cycle_error_response(error: CycleError) -> Response {
    let status = match &error {
        CycleError::Upstream(_) => StatusCode::BAD_GATEWAY,
        CycleError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    error_response(status, error)
}
