/// Domain events published after a mutation's data is final.

use super::{GroupMetadata, MessageUpdate};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum GroupEvent {
    /// Full metadata of every group after a participating fetch
    #[serde(rename = "groups.update")]
    GroupsUpdate(Vec<GroupMetadata>),
    /// Edits to messages already in the timeline
    #[serde(rename = "messages.update")]
    MessagesUpdate(Vec<MessageUpdate>),
}

impl GroupEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GroupEvent::GroupsUpdate(_) => "groups.update",
            GroupEvent::MessagesUpdate(_) => "messages.update",
        }
    }
}
