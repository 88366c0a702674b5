use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::modules::artist_watch::core::creator::CreatorId;
use crate::modules::artist_watch::use_cases::manage_seeds::handler::SeedError;
use crate::shell::http::{cycle_error_response, error_response};
use crate::shell::state::AppState;

fn seed_error_response(error: SeedError) -> Response {
    match error {
        SeedError::AlreadyWatched(_) => error_response(StatusCode::CONFLICT, error),
        SeedError::NotWatched(_) => error_response(StatusCode::NOT_FOUND, error),
        SeedError::Store(_) => error_response(StatusCode::SERVICE_UNAVAILABLE, error),
        SeedError::Cycle(cycle) => cycle_error_response(cycle),
    }
}

/// Creator ids start at 1.
fn creator_id(raw: u64) -> Result<CreatorId, Response> {
    if raw == 0 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "creator id must be positive",
        ));
    }
    Ok(CreatorId(raw))
}

pub async fn list(State(state): State<AppState>) -> impl IntoResponse {
    match state.seeds_handler.list().await {
        Ok(seeds) => Json(seeds).into_response(),
        Err(error) => seed_error_response(error),
    }
}

pub async fn watch(State(state): State<AppState>, Path(id): Path<u64>) -> impl IntoResponse {
    let id = match creator_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.seeds_handler.watch(id).await {
        Ok(report) => (StatusCode::CREATED, Json(report)).into_response(),
        Err(error) => seed_error_response(error),
    }
}

pub async fn unwatch(State(state): State<AppState>, Path(id): Path<u64>) -> impl IntoResponse {
    let id = match creator_id(id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match state.seeds_handler.unwatch(id).await {
        Ok(report) => Json(report).into_response(),
        Err(error) => seed_error_response(error),
    }
}
