//! Frequently used imports for handlers.

pub use crate::{
    authentication::Authentication,
    error::{EyreResult, MiseError, MiseResult},
    queries, schema,
    utils::diesel::{eq, query},
    MiseState,
};
pub use axum::{
    extract::{Path, State},
    Json,
};
pub use diesel::prelude::*;
pub use eyre::WrapErr;
pub use mise_api::{request as req, response as res};
pub use tracing::instrument;
