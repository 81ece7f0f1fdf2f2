//! Response tree to [`GroupMetadata`].
//!
//! Every optional block maps to `None`/`false` when absent; the only hard
//! requirement is a `<group>` child carrying an `id`.

use crate::error::{GroupError, Result};
use crate::jid::{group_jid, jid_normalized_user};
use crate::models::{AddressingMode, AdminRole, GroupMetadata, GroupParticipant, MemberAddMode};
use crate::node::BinaryNode;

/// Lenient integer parse: absent or malformed values are `None`
fn numeric_attr<T: std::str::FromStr>(node: &BinaryNode, name: &str) -> Option<T> {
    node.attr(name).and_then(|v| v.trim().parse().ok())
}

fn string_attr(node: &BinaryNode, name: &str) -> Option<String> {
    node.attr(name).map(str::to_string)
}

/// Description text and provenance, all `None` without a description block
#[derive(Default)]
struct Description {
    body: Option<String>,
    id: Option<String>,
    owner: Option<String>,
    owner_phone_number: Option<String>,
    time: Option<i64>,
}

impl Description {
    fn from_group(group: &BinaryNode) -> Self {
        match group.child("description") {
            Some(desc) => Description {
                body: desc.child_string("body"),
                id: string_attr(desc, "id"),
                owner: string_attr(desc, "participant"),
                owner_phone_number: string_attr(desc, "participant_pn"),
                time: numeric_attr(desc, "t"),
            },
            None => Description::default(),
        }
    }
}

fn extract_participant(node: &BinaryNode) -> GroupParticipant {
    let id = node.attr("jid").unwrap_or_default().to_string();
    let phone_number = node
        .attr("phone_number")
        .filter(|pn| !pn.is_empty())
        .or(node.attr("jid"))
        .map(str::to_string);

    GroupParticipant {
        id,
        phone_number,
        admin: node.attr("type").and_then(AdminRole::parse),
    }
}

/// Build metadata from the `<group>` child of `result`
pub fn extract_group_metadata(result: &BinaryNode) -> Result<GroupMetadata> {
    let group = result
        .child("group")
        .ok_or_else(|| GroupError::MissingNode("group".to_string()))?;
    extract_group_node(group)
}

/// Build metadata from a `<group>` node itself
pub fn extract_group_node(group: &BinaryNode) -> Result<GroupMetadata> {
    let raw_id = group.attr("id").ok_or_else(|| GroupError::MissingAttribute {
        tag: group.tag.clone(),
        attr: "id".to_string(),
    })?;

    let description = Description::from_group(group);
    let participants: Vec<GroupParticipant> =
        group.children_by_tag("participant").map(extract_participant).collect();

    // zero and garbage both fall back to the real count
    let size = numeric_attr::<usize>(group, "size")
        .filter(|size| *size > 0)
        .unwrap_or(participants.len());

    let ephemeral_duration = group
        .child("ephemeral")
        .and_then(|e| numeric_attr::<u32>(e, "expiration"));

    let member_add_mode = group
        .child_string("member_add_mode")
        .and_then(|mode| MemberAddMode::parse(&mode))
        == Some(MemberAddMode::AllMemberAdd);

    Ok(GroupMetadata {
        id: group_jid(raw_id),
        addressing_mode: group.attr("addressing_mode").and_then(AddressingMode::parse),
        subject: string_attr(group, "subject"),
        subject_owner: string_attr(group, "s_o"),
        subject_owner_phone_number: string_attr(group, "s_o_pn"),
        subject_time: numeric_attr(group, "s_t"),
        size,
        creation: numeric_attr(group, "creation"),
        // a creator that is not a jid leaves the owner unset
        owner: group.attr("creator").and_then(jid_normalized_user),
        desc: description.body,
        desc_id: description.id,
        desc_owner: description.owner,
        desc_owner_phone_number: description.owner_phone_number,
        desc_time: description.time,
        linked_parent: group
            .child("linked_parent")
            .and_then(|p| p.attr("jid"))
            .filter(|jid| !jid.is_empty())
            .map(str::to_string),
        restrict: group.child("locked").is_some(),
        announce: group.child("announcement").is_some(),
        is_community: group.child("parent").is_some(),
        is_community_announce: group.child("default_sub_group").is_some(),
        join_approval_mode: group.child("membership_approval_mode").is_some(),
        member_add_mode,
        ephemeral_duration,
        participants,
    })
}
