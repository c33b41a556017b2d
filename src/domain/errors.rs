// Domain-level errors for store operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record for participant {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
