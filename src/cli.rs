//! CLI interface for the stanza tool
//!
//! Maps parsed operations onto the request builder and renders nodes and
//! metadata for display.

use crate::config::{Operation, OutputFormat};
use crate::error::Result;
use crate::models::{generate_message_id, GroupMetadata};
use crate::node::BinaryNode;
use crate::protocol::{builder, extract_group_metadata, extract_group_node, DescriptionUpdate};
use std::path::Path;

/// Build the request stanza for an operation
pub fn build_request(operation: &Operation) -> BinaryNode {
    match operation {
        Operation::Metadata { jid } => builder::metadata_query(jid),
        Operation::FetchAll => builder::fetch_all_participating(),
        Operation::Create { subject, participants, key } => {
            let key = key.clone().unwrap_or_else(generate_message_id);
            builder::create(subject, participants, &key)
        }
        Operation::Leave { id } => builder::leave(id),
        Operation::Subject { jid, subject } => builder::update_subject(jid, subject),
        Operation::Participants { jid, action, participants } => {
            builder::participants_update(jid, participants, *action)
        }
        Operation::RequestsList { jid } => builder::request_participants_list(jid),
        Operation::Requests { jid, action, participants } => {
            builder::request_participants_update(jid, participants, *action)
        }
        Operation::Description { jid, text, prev, id } => {
            let update = DescriptionUpdate::from_text(text.as_deref(), || {
                id.clone().unwrap_or_else(generate_message_id)
            });
            builder::update_description(jid, &update, prev.as_deref())
        }
        Operation::InviteCode { jid } => builder::invite_code(jid),
        Operation::RevokeInvite { jid } => builder::revoke_invite(jid),
        Operation::AcceptInvite { code } => builder::accept_invite(code),
        Operation::RevokeInviteV4 { group, invited } => builder::revoke_invite_v4(group, invited),
        Operation::AcceptInviteV4 { group, code, expiration, admin } => {
            builder::accept_invite_v4(group, code, *expiration, admin)
        }
        Operation::InviteInfo { code } => builder::get_invite_info(code),
        Operation::Ephemeral { jid, expiration } => builder::toggle_ephemeral(jid, *expiration),
        Operation::Setting { jid, setting } => builder::setting_update(jid, *setting),
        Operation::MemberAddMode { jid, mode } => builder::member_add_mode(jid, *mode),
        Operation::JoinApproval { jid, mode } => builder::join_approval_mode(jid, *mode),
    }
}

/// Parse a JSON response tree; a bare `<group>` node is accepted too
pub fn extract_from_json(json: &str) -> Result<GroupMetadata> {
    let node: BinaryNode = serde_json::from_str(json)?;
    if node.tag == "group" {
        extract_group_node(&node)
    } else {
        extract_group_metadata(&node)
    }
}

pub fn extract_file(path: &Path) -> Result<GroupMetadata> {
    let json = std::fs::read_to_string(path)?;
    extract_from_json(&json)
}

pub fn render_node(node: &BinaryNode, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(node)?),
        OutputFormat::Xml => Ok(node.to_string()),
    }
}

/// Metadata is always printed as JSON
pub fn render_metadata(metadata: &GroupMetadata) -> Result<String> {
    Ok(serde_json::to_string_pretty(metadata)?)
}
