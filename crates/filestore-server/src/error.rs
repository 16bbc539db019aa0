use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use filestore_contract::ContractError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("state error: {0}")]
    State(#[from] filestore_state::StateError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status reported to clients for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Contract(err) => match err {
                ContractError::Validation { .. }
                | ContractError::InvalidArguments { .. }
                | ContractError::UnknownFunction(_) => StatusCode::BAD_REQUEST,
                ContractError::NotFound { .. } => StatusCode::NOT_FOUND,
                ContractError::Serialization(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ContractError::StoreAccess(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::State(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, %status, "request failed");
        }
        let body = Json(json!({ "success": false, "message": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
