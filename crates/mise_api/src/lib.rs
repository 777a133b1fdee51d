//! Types for communication between the server and the web app.

pub mod request;
pub mod response;

pub const SESSION_COOKIE_NAME: &str = "mise_session";
