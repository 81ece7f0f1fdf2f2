/// Socket round trip consumed by the group layer.
/// Timeouts, retries and connection state belong to the implementation, not to callers.

use crate::error::Result;
use crate::node::BinaryNode;
use async_trait::async_trait;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an `iq` request and wait for its response
    async fn query(&self, request: BinaryNode) -> Result<BinaryNode>;

    /// Tell the server the given dirty domain has been synced
    async fn clean_dirty_bits(&self, kind: &str) -> Result<()>;
}
