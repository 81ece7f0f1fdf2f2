//! Request stanzas for every group operation.
//!
//! All functions are pure. Anything random (the create `key`, a new
//! description `id`) is generated by the caller and passed in.

use crate::jid::GROUPS_BROADCAST;
use crate::models::{ApprovalAction, GroupSetting, JoinApprovalMode, MemberAddMode, ParticipantAction};
use crate::node::BinaryNode;

/// Namespace of every group query
pub const GROUPS_XMLNS: &str = "w:g2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Get,
    Set,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Get => "get",
            QueryType::Set => "set",
        }
    }
}

/// New or removed group description
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionUpdate {
    Set { id: String, body: String },
    Delete,
}

impl DescriptionUpdate {
    /// An absent or empty text deletes the description
    pub fn from_text(text: Option<&str>, new_id: impl FnOnce() -> String) -> Self {
        match text {
            Some(body) if !body.is_empty() => DescriptionUpdate::Set {
                id: new_id(),
                body: body.to_string(),
            },
            _ => DescriptionUpdate::Delete,
        }
    }
}

/// Wrap content in an `iq` envelope addressed to `jid`
pub fn group_query(jid: &str, query_type: QueryType, content: Vec<BinaryNode>) -> BinaryNode {
    BinaryNode::new("iq")
        .with_attr("type", query_type.as_str())
        .with_attr("xmlns", GROUPS_XMLNS)
        .with_attr("to", jid)
        .with_children(content)
}

fn participant_nodes<S: AsRef<str>>(participants: &[S]) -> Vec<BinaryNode> {
    participants
        .iter()
        .map(|jid| BinaryNode::new("participant").with_attr("jid", jid.as_ref()))
        .collect()
}

pub fn metadata_query(jid: &str) -> BinaryNode {
    group_query(
        jid,
        QueryType::Get,
        vec![BinaryNode::new("query").with_attr("request", "interactive")],
    )
}

pub fn fetch_all_participating() -> BinaryNode {
    group_query(
        GROUPS_BROADCAST,
        QueryType::Get,
        vec![BinaryNode::new("participating").with_children(vec![
            BinaryNode::new("participants"),
            BinaryNode::new("description"),
        ])],
    )
}

pub fn create<S: AsRef<str>>(subject: &str, participants: &[S], key: &str) -> BinaryNode {
    group_query(
        GROUPS_BROADCAST,
        QueryType::Set,
        vec![BinaryNode::new("create")
            .with_attr("subject", subject)
            .with_attr("key", key)
            .with_children(participant_nodes(participants))],
    )
}

pub fn leave(id: &str) -> BinaryNode {
    group_query(
        GROUPS_BROADCAST,
        QueryType::Set,
        vec![BinaryNode::new("leave").with_children(vec![BinaryNode::new("group").with_attr("id", id)])],
    )
}

pub fn update_subject(jid: &str, subject: &str) -> BinaryNode {
    group_query(
        jid,
        QueryType::Set,
        vec![BinaryNode::new("subject").with_bytes(subject.as_bytes().to_vec())],
    )
}

pub fn request_participants_list(jid: &str) -> BinaryNode {
    group_query(jid, QueryType::Get, vec![BinaryNode::new("membership_approval_requests")])
}

pub fn request_participants_update<S: AsRef<str>>(
    jid: &str,
    participants: &[S],
    action: ApprovalAction,
) -> BinaryNode {
    group_query(
        jid,
        QueryType::Set,
        vec![BinaryNode::new("membership_requests_action").with_children(vec![
            BinaryNode::new(action.tag()).with_children(participant_nodes(participants)),
        ])],
    )
}

pub fn participants_update<S: AsRef<str>>(
    jid: &str,
    participants: &[S],
    action: ParticipantAction,
) -> BinaryNode {
    group_query(
        jid,
        QueryType::Set,
        vec![BinaryNode::new(action.tag()).with_children(participant_nodes(participants))],
    )
}

/// `prev` is the id of the description being replaced, if any
pub fn update_description(jid: &str, update: &DescriptionUpdate, prev: Option<&str>) -> BinaryNode {
    let mut node = BinaryNode::new("description");
    match update {
        DescriptionUpdate::Set { id, body } => {
            node = node.with_attr("id", id.as_str()).with_children(vec![
                BinaryNode::new("body").with_bytes(body.as_bytes().to_vec()),
            ]);
        }
        DescriptionUpdate::Delete => {
            node = node.with_attr("delete", "true");
        }
    }
    if let Some(prev) = prev {
        node = node.with_attr("prev", prev);
    }

    group_query(jid, QueryType::Set, vec![node])
}

pub fn invite_code(jid: &str) -> BinaryNode {
    group_query(jid, QueryType::Get, vec![BinaryNode::new("invite")])
}

pub fn revoke_invite(jid: &str) -> BinaryNode {
    group_query(jid, QueryType::Set, vec![BinaryNode::new("invite")])
}

pub fn accept_invite(code: &str) -> BinaryNode {
    group_query(
        GROUPS_BROADCAST,
        QueryType::Set,
        vec![BinaryNode::new("invite").with_attr("code", code)],
    )
}

pub fn revoke_invite_v4(group_jid: &str, invited_jid: &str) -> BinaryNode {
    group_query(
        group_jid,
        QueryType::Set,
        vec![BinaryNode::new("revoke").with_children(participant_nodes(&[invited_jid]))],
    )
}

/// `admin` is the jid of whoever sent the invite
pub fn accept_invite_v4(group_jid: &str, code: &str, expiration: i64, admin: &str) -> BinaryNode {
    group_query(
        group_jid,
        QueryType::Set,
        vec![BinaryNode::new("accept")
            .with_attr("code", code)
            .with_attr("expiration", expiration.to_string())
            .with_attr("admin", admin)],
    )
}

pub fn get_invite_info(code: &str) -> BinaryNode {
    group_query(
        GROUPS_BROADCAST,
        QueryType::Get,
        vec![BinaryNode::new("invite").with_attr("code", code)],
    )
}

/// An expiration of `0` turns disappearing messages off
pub fn toggle_ephemeral(jid: &str, expiration: u32) -> BinaryNode {
    let content = if expiration > 0 {
        BinaryNode::new("ephemeral").with_attr("expiration", expiration.to_string())
    } else {
        BinaryNode::new("not_ephemeral")
    };
    group_query(jid, QueryType::Set, vec![content])
}

pub fn setting_update(jid: &str, setting: GroupSetting) -> BinaryNode {
    group_query(jid, QueryType::Set, vec![BinaryNode::new(setting.tag())])
}

pub fn member_add_mode(jid: &str, mode: MemberAddMode) -> BinaryNode {
    group_query(
        jid,
        QueryType::Set,
        vec![BinaryNode::new("member_add_mode").with_text(mode.as_str())],
    )
}

pub fn join_approval_mode(jid: &str, mode: JoinApprovalMode) -> BinaryNode {
    group_query(
        jid,
        QueryType::Set,
        vec![BinaryNode::new("membership_approval_mode").with_children(vec![
            BinaryNode::new("group_join").with_attr("state", mode.as_str()),
        ])],
    )
}
