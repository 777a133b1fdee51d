//! Mise server error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mise_api::response as res;

pub type MiseResult<T> = Result<T, MiseError>;
pub type EyreResult<T> = Result<T, eyre::Report>;

#[derive(Debug)]
pub enum MiseError {
    BadRequest(String),
    Unauthorized(&'static str),
    Forbidden(&'static str),
    NotFound(&'static str),
    Internal(eyre::Report),
}

impl<E> From<E> for MiseError
where
    E: Into<eyre::Report>,
{
    fn from(value: E) -> Self {
        Self::Internal(value.into())
    }
}

impl IntoResponse for MiseError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            MiseError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            MiseError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message.to_string()),
            MiseError::Forbidden(message) => (StatusCode::FORBIDDEN, message.to_string()),
            MiseError::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            MiseError::Internal(report) => {
                tracing::error!("Request failed: {report:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("{report:#}"))
            }
        };
        (status, Json(res::Error { message })).into_response()
    }
}
