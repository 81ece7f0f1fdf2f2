/// Message-timeline records touched by invite acceptance.
/// Only the fields this layer reads or writes are modelled.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a message in a chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKey {
    pub remote_jid: String,
    pub id: Option<String>,
    pub from_me: Option<bool>,
    pub participant: Option<String>,
}

impl MessageKey {
    /// Key for a chat only, without a message id
    pub fn for_chat(remote_jid: impl Into<String>) -> Self {
        MessageKey {
            remote_jid: remote_jid.into(),
            ..Default::default()
        }
    }
}

impl From<&str> for MessageKey {
    fn from(remote_jid: &str) -> Self {
        MessageKey::for_chat(remote_jid)
    }
}

impl From<String> for MessageKey {
    fn from(remote_jid: String) -> Self {
        MessageKey::for_chat(remote_jid)
    }
}

/// Invite card received in a chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInviteMessage {
    pub group_jid: String,
    pub invite_code: String,
    /// Epoch seconds; `0` once the invite has been used
    pub invite_expiration: i64,
    pub group_name: Option<String>,
    pub caption: Option<String>,
}

impl GroupInviteMessage {
    /// Copy of this invite with the code and expiration cleared
    pub fn expired(&self) -> Self {
        GroupInviteMessage {
            invite_code: String::new(),
            invite_expiration: 0,
            ..self.clone()
        }
    }

    pub fn is_expired(&self) -> bool {
        self.invite_code.is_empty() && self.invite_expiration == 0
    }
}

/// Kinds of synthesized system messages this layer records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStubType {
    GroupParticipantAdd,
}

/// How a message enters the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertKind {
    /// New message the user should be told about
    Notify,
    /// Historical message appended silently
    Append,
}

/// A message record as handed to the message store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebMessageInfo {
    pub key: MessageKey,
    pub message_stub_type: Option<MessageStubType>,
    pub message_stub_parameters: Vec<String>,
    pub participant: Option<String>,
    /// Epoch seconds
    pub message_timestamp: i64,
}

/// Partial update of an existing message, published as an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUpdate {
    pub key: MessageKey,
    pub group_invite_message: GroupInviteMessage,
}

/// Fresh message id in the client's `3EB0…` format
pub fn generate_message_id() -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("3EB0{}", &hex[..18])
}

pub fn unix_timestamp_seconds() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_generation() {
        let id1 = generate_message_id();
        let id2 = generate_message_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 22);
        assert!(id1.starts_with("3EB0"));
        assert!(id1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_from_chat() {
        let key: MessageKey = "123@s.whatsapp.net".into();
        assert_eq!(key.remote_jid, "123@s.whatsapp.net");
        assert!(key.id.is_none());
    }

    #[test]
    fn test_expired_invite() {
        let invite = GroupInviteMessage {
            group_jid: "1@g.us".to_string(),
            invite_code: "abc".to_string(),
            invite_expiration: 1_700_000_000,
            group_name: Some("family".to_string()),
            caption: None,
        };
        let expired = invite.expired();
        assert!(expired.is_expired());
        assert!(!invite.is_expired());
        assert_eq!(expired.group_name.as_deref(), Some("family"));
    }

    #[test]
    fn test_stub_type_serialization() {
        let json = serde_json::to_string(&MessageStubType::GroupParticipantAdd).unwrap();
        assert_eq!(json, "\"GROUP_PARTICIPANT_ADD\"");
    }
}
