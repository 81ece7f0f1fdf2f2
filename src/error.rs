/// Error types for the group protocol layer.
/// Per-participant failures are not errors: they travel as status codes in the results.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupError {
    #[error("Missing node: response has no <{0}> child")]
    MissingNode(String),

    #[error("Missing attribute: <{tag}> has no '{attr}'")]
    MissingAttribute { tag: String, attr: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Message store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GroupError {
    /// True for responses that break the protocol contract (missing root or key attribute)
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            GroupError::MissingNode(_) | GroupError::MissingAttribute { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GroupError>;
