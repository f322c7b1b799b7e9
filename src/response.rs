use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::dictionary::DictionaryError;
use crate::services::quiz::QuizError;
use crate::services::stats::StatsError;
use crate::services::users::UserError;
use crate::services::vocabulary::VocabularyError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn json_ok<T: Serialize>(data: T) -> Response {
    Json(SuccessResponse {
        success: true,
        data,
    })
    .into_response()
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn word_not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "WORD_NOT_FOUND", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn insufficient_vocabulary() -> Self {
        Self::operational(
            StatusCode::UNPROCESSABLE_ENTITY,
            "INSUFFICIENT_VOCABULARY",
            "add more words before starting a quiz",
        )
    }

    pub fn upstream_unavailable() -> Self {
        Self::operational(
            StatusCode::SERVICE_UNAVAILABLE,
            "UPSTREAM_UNAVAILABLE",
            "dictionary service is unavailable, try again later",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
            is_operational: false,
        }
    }

    fn operational(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            is_operational: true,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Non-operational detail stays in the logs.
        let message = if self.is_operational {
            self.message
        } else {
            tracing::error!(code = self.code, detail = %self.message, "internal error");
            "internal server error".to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code.to_string(),
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => Self::not_found("user not found"),
            UserError::Sql(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<VocabularyError> for AppError {
    fn from(err: VocabularyError) -> Self {
        match err {
            VocabularyError::NotFound => Self::word_not_found("word not found in vocabulary"),
            VocabularyError::Sql(e) => Self::internal(e.to_string()),
            VocabularyError::Examples(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Sql(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::InsufficientVocabulary => Self::insufficient_vocabulary(),
            QuizError::Vocabulary(e) => e.into(),
        }
    }
}

impl From<DictionaryError> for AppError {
    fn from(err: DictionaryError) -> Self {
        tracing::warn!(error = %err, "dictionary request failed");
        Self::upstream_unavailable()
    }
}
