//! Query error types.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that can occur while resolving operational data.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("state store error: {0}")]
    State(#[from] hearth_state::StateError),

    #[error("stream scan task failed: {0}")]
    Task(String),
}

pub type QueryResult<T> = Result<T, QueryError>;
