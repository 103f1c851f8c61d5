//! Handlers for the `/api/programs` endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::error::ProgramsApiError;
use super::metrics;
use super::state::{GuardedProgramStore, ServerState};
use crate::program_store::{validate_new_program, validate_program_patch, Program};

pub const PROGRAMS_PATH: &str = "/api/programs";
pub const PROGRAM_PATH: &str = "/api/programs/{id}";

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsertIdResponse {
    pub insert_id: i64,
}

/// Only strictly positive integers are program ids.
fn parse_program_id(raw: &str) -> Result<i64, ProgramsApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ProgramsApiError::InvalidId),
    }
}

async fn browse(
    State(store): State<GuardedProgramStore>,
) -> Result<Json<Vec<Program>>, ProgramsApiError> {
    Ok(Json(store.read_all()?))
}

async fn read(
    State(store): State<GuardedProgramStore>,
    Path(id): Path<String>,
) -> Result<Json<Program>, ProgramsApiError> {
    let id = parse_program_id(&id)?;
    match store.read_one(id)? {
        Some(program) => Ok(Json(program)),
        None => Err(ProgramsApiError::NotFound),
    }
}

async fn add(
    State(store): State<GuardedProgramStore>,
    Json(body): Json<Value>,
) -> Result<Response, ProgramsApiError> {
    let program = validate_new_program(&body).map_err(ProgramsApiError::Validation)?;
    let insert_id = store.create(&program)?;
    metrics::record_program_created();
    debug!("Added program {}", insert_id);
    Ok((StatusCode::CREATED, Json(InsertIdResponse { insert_id })).into_response())
}

async fn edit(
    State(store): State<GuardedProgramStore>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<StatusCode, ProgramsApiError> {
    let id = parse_program_id(&id)?;
    let patch = validate_program_patch(&body).map_err(ProgramsApiError::Validation)?;
    if store.update(id, &patch)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ProgramsApiError::NotFound)
    }
}

async fn delete(
    State(store): State<GuardedProgramStore>,
    Path(id): Path<String>,
) -> Result<StatusCode, ProgramsApiError> {
    let id = parse_program_id(&id)?;
    if store.delete(id)? {
        metrics::record_program_deleted();
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ProgramsApiError::NotFound)
    }
}

pub fn make_programs_routes(state: ServerState) -> Router {
    Router::new()
        .route(PROGRAMS_PATH, get(browse).post(add))
        .route(PROGRAM_PATH, get(read).put(edit).delete(delete))
        .with_state(state)
}
