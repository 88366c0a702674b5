use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::shell::http::error_response;
use crate::shell::state::AppState;

#[derive(Serialize)]
pub struct ScheduleStatus {
    pub running: bool,
    /// Store size while running; zero when stopped.
    pub watched: usize,
}

pub async fn start(State(state): State<AppState>) -> impl IntoResponse {
    state.scheduler.start().await;
    StatusCode::ACCEPTED
}

pub async fn stop(State(state): State<AppState>) -> impl IntoResponse {
    state.scheduler.stop().await;
    StatusCode::OK
}

pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    if !state.scheduler.is_running().await {
        return Json(ScheduleStatus {
            running: false,
            watched: 0,
        })
        .into_response();
    }
    match state.store.count().await {
        Ok(watched) => Json(ScheduleStatus {
            running: true,
            watched,
        })
        .into_response(),
        Err(error) => error_response(StatusCode::SERVICE_UNAVAILABLE, error),
    }
}
