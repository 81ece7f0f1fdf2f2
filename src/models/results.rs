/// Per-item outcomes of batch mutations.
/// A failed item is still a result: its status carries the server's error code.

use crate::node::BinaryNode;
use serde::{Deserialize, Serialize};

/// Status reported for an item whose node has no `error` attribute
pub const STATUS_OK: &str = "200";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantResult {
    pub status: String,
    pub jid: String,
    /// The participant node as returned by the server
    pub content: BinaryNode,
}

impl ParticipantResult {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParticipant {
    pub status: String,
    pub jid: String,
}

impl RequestParticipant {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}
