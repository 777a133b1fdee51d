//! The web app's error type.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum WebError {
    /// Sign-in was rejected. The message is shown to the user as-is.
    #[error("{0}")]
    InvalidCredentials(String),
    /// The server does not recognize the session.
    #[error("Not signed in")]
    Unauthorized,
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),
    /// Anything else, usually a failed response with a message body.
    #[error("{0}")]
    Other(String),
}

impl WebError {
    pub fn new(message: impl ToString) -> Self {
        Self::Other(message.to_string())
    }

    pub fn network(e: impl ToString) -> Self {
        Self::Network(e.to_string())
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self::Other(e.to_string())
    }

    pub fn from_js(js: JsValue) -> Self {
        Self::Other(format!("{js:?}"))
    }
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Other(format!("{value:#?}"))
    }
}
