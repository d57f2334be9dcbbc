use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Every failure a request can end in. Converted to `{"message": ...}` at the boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, expired or tampered bearer token.
    #[error("unauthorized")]
    Unauthorized,
    /// Client-correctable input problem; the message is shown to the caller.
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
    #[error("upstream analyzer error: {0:#}")]
    Upstream(anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Unauthorized".into(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(_) => "Internal server error".into(),
            AppError::Upstream(_) => "Failed to analyze reviews. Please try again.".into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(reason = %rejection.body_text(), "rejected request body");
        let message = match &rejection {
            JsonRejection::JsonDataError(e) => missing_field(&e.body_text())
                .map(|field| format!("{field} is required"))
                .unwrap_or_else(|| "Invalid request body".into()),
            JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".into(),
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body".into(),
            _ => "Invalid request body".into(),
        };
        AppError::Validation(message)
    }
}

/// Field name out of serde's "missing field `name`" message.
fn missing_field(text: &str) -> Option<&str> {
    text.split("missing field `").nth(1)?.split('`').next()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Storage(e) => error!(error = %format!("{e:#}"), "storage failure"),
            AppError::Upstream(e) => error!(error = %format!("{e:#}"), "analyzer failure"),
            _ => {}
        }
        let body = MessageBody {
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
