/// Message store consumed by the group layer.

use crate::error::Result;
use crate::models::{UpsertKind, WebMessageInfo};
use async_trait::async_trait;

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Record a message in the timeline, emitting whatever the store emits for new messages
    async fn upsert_message(&self, message: WebMessageInfo, kind: UpsertKind) -> Result<()>;
}
