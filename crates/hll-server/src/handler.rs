use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

use hll_ledger::{require_message, ChainReport, LogError, LogReader, LogService, LogWriter};
use hll_types::LogEntry;

use crate::error::{ServerError, ServerResult};

/// Shared handler state: the one log every request appends to.
#[derive(Clone)]
pub struct AppState {
    pub log: Arc<dyn LogService>,
}

impl AppState {
    pub fn new(log: Arc<dyn LogService>) -> Self {
        Self { log }
    }
}

/// Run a blocking log operation off the async workers.
///
/// Mining is CPU-bound and store access is synchronous I/O.
async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, LogError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

/// `POST /logs/entry` with `{"message": "..."}`.
pub async fn append_handler(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<LogEntry>)> {
    let message = match body {
        Ok(Json(value)) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned),
        Err(rejection) => {
            return Err(LogError::InvalidMessage(rejection.body_text()).into());
        }
    };
    let message = require_message(message.as_deref())?.to_owned();

    let log = Arc::clone(&state.log);
    let entry = blocking(move || log.append(&message)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `GET /logs`: the fully validated chain.
pub async fn read_all_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<LogEntry>>> {
    let log = Arc::clone(&state.log);
    let entries = blocking(move || log.read_all()).await?;
    Ok(Json(entries))
}

/// `GET /logs/verify`
pub async fn verify_handler(State(state): State<AppState>) -> ServerResult<Json<ChainReport>> {
    let log = Arc::clone(&state.log);
    let report = blocking(move || log.verify()).await?;
    Ok(Json(report))
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "hll-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
