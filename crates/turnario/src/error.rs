use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Week arithmetic left the range chrono can represent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeekError {
    #[error("week offset {0} is outside the supported calendar range")]
    OutOfRange(i64),
}

/// Invalid value in the environment configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} (expected one of: {expected})")]
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown person: {0}")]
    UnknownPerson(String),

    #[error("No note editor is open")]
    EditorClosed,

    #[error(transparent)]
    Week(#[from] WeekError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::UnknownPerson { .. } => StatusCode::NOT_FOUND,
            AppError::EditorClosed => StatusCode::CONFLICT,
            AppError::Week { .. } => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}
