use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use hll_ledger::LogError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Log(#[from] LogError),

    #[error("store error: {0}")]
    Store(#[from] hll_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Log(LogError::InvalidMessage(_)) => StatusCode::BAD_REQUEST,
            Self::Log(LogError::Outpaced) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Log(e) => e.kind(),
            Self::Store(_) => "StoreFailure",
            Self::Config(_) => "ConfigError",
            Self::Io(_) | Self::Internal(_) => "InternalError",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = json!({
            "error": self.kind(),
            "messages": [{ "message": self.to_string() }],
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hll_ledger::Corruption;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ServerError::from(LogError::InvalidMessage("empty".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ServerError::from(LogError::Outpaced).status(), StatusCode::CONFLICT);
        assert_eq!(
            ServerError::from(LogError::from(Corruption::Shrunk)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn kind_passes_through_log_errors() {
        assert_eq!(ServerError::from(LogError::Outpaced).kind(), "Outpaced");
        assert_eq!(ServerError::Config("x".into()).kind(), "ConfigError");
    }
}
