use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use chrono::ParseError as CHRONO_PARSE_ERROR;
use serde_json::Error as JSON_ERROR;
use std::{
    env::VarError, io::Error as IO_ERROR, num::ParseIntError,
    str::Utf8Error as UTF8_ERROR,
};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::subscriber::SetGlobalDefaultError as TRACING_GLOBAL_DEFAULT_ERROR;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Io(#[from] IO_ERROR),

    #[error("{0}")]
    INT(#[from] ParseIntError),

    #[error("{0}")]
    VAR(#[from] VarError),

    #[error("{0}")]
    TokioJoinError(#[from] JoinError),

    #[error("{0}")]
    JsonError(#[from] JSON_ERROR),

    #[error("Invalid input file: {0}")]
    InputFormat(String),

    #[error("Input is not valid UTF-8: {0}")]
    Utf8(#[from] UTF8_ERROR),

    #[error("Invalid date: {0}")]
    DecodeDateTimeError(#[from] CHRONO_PARSE_ERROR),

    #[error("Report not found: {0}, upload the file again")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Missing params: {0}")]
    MissingParams(String),

    #[error("Invalid option {option}")]
    InvalidOption { option: String },

    #[error("Tracing error: {0}")]
    SetGlobalDefaultError(#[from] TRACING_GLOBAL_DEFAULT_ERROR),
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request - client sent invalid input
            Error::InputFormat(_)
            | Error::Utf8(_)
            | Error::DecodeDateTimeError(_)
            | Error::MissingParams(_)
            | Error::InvalidOption { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found - token expired, evicted or never issued
            Error::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error - everything else
            Error::Io(_)
            | Error::INT(_)
            | Error::VAR(_)
            | Error::TokioJoinError(_)
            | Error::JsonError(_)
            | Error::ConfigurationError(_)
            | Error::SetGlobalDefaultError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!("{}", self);
            String::from("Report generation failed, please try again")
        } else {
            self.to_string()
        };

        let body = serde_json::json!({
            "error": status.canonical_reason().unwrap_or("Unknown"),
            "message": message,
            "status": status.as_u16(),
        });
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        let err = Error::InputFormat(String::from("missing header"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = Error::MissingParams(String::from("No file part"));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unknown_report_maps_to_not_found() {
        let err = Error::NotFound(String::from("abc"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("upload the file again"));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = Error::ConfigurationError(String::from("secret detail"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
