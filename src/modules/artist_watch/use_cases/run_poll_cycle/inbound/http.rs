use axum::{Json, extract::State, response::IntoResponse};

use crate::shell::http::cycle_error_response;
use crate::shell::state::AppState;

pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    match state.poll_handler.run().await {
        Ok(report) => Json(report).into_response(),
        Err(error) => cycle_error_response(error),
    }
}
