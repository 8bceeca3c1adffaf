//! Application-wide error types.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use charity_boxes::ErrorKind;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] charity_boxes::Error),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Domain(e) => match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::InvalidState => StatusCode::CONFLICT,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Path(rejection) => rejection.status(),
            Self::Query(rejection) => rejection.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            warn!("Request rejected: {self}");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Turn a database failure inside a repository call into the core's storage
/// error.
pub fn storage(e: sqlx::Error) -> charity_boxes::Error {
    charity_boxes::Error::Storage(e.to_string())
}
