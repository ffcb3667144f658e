//! 核心错误处理模块
//!
//! 内部错误按来源区分，便于日志排查；对外统一折叠为 500 + `{"error": ...}`。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// 内部错误类型
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("upstream responded with status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("invalid record: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// 路由层错误：对外消息 + 内部原因
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: Error,
}

impl ApiError {
    pub fn new(message: &'static str, source: Error) -> Self {
        Self { message, source }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    pub fn source(&self) -> &Error {
        &self.source
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(cause = %self.source, "{}", self.message);

        let body = ErrorResponse {
            error: self.message.to_string(),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// 给 `Result` 附加对外错误消息
pub trait Context<T> {
    fn context(self, message: &'static str) -> std::result::Result<T, ApiError>;
}

impl<T, E> Context<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, message: &'static str) -> std::result::Result<T, ApiError> {
        self.map_err(|e| ApiError::new(message, e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn api_error_is_500_with_message() {
        let response = ApiError::new(
            "Failed to add user.",
            Error::InvalidInput("missing name".to_string()),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Failed to add user." }));
    }

    #[test]
    fn context_keeps_internal_cause() {
        let result: std::result::Result<(), Error> = Err(Error::Config("PORT".into()));
        let err = result.context("Failed to fetch users.").unwrap_err();
        assert_eq!(err.message(), "Failed to fetch users.");
        assert!(matches!(err.source(), Error::Config(_)));
    }
}
