/// Group metadata model.
/// A snapshot of one group's state, built once from a response tree and never mutated.

use serde::{Deserialize, Serialize};

/// Identifier scheme a group addresses its participants with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    Pn,
    Lid,
}

impl AddressingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressingMode::Pn => "pn",
            AddressingMode::Lid => "lid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pn" => Some(AddressingMode::Pn),
            "lid" => Some(AddressingMode::Lid),
            _ => None,
        }
    }
}

/// Admin level carried by a participant's `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    Admin,
    SuperAdmin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::Admin => "admin",
            AdminRole::SuperAdmin => "superadmin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(AdminRole::Admin),
            "superadmin" => Some(AdminRole::SuperAdmin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupParticipant {
    pub id: String,
    /// `phone_number` attribute when present, otherwise the participant jid
    pub phone_number: Option<String>,
    /// `None` for regular members
    pub admin: Option<AdminRole>,
}

impl GroupParticipant {
    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetadata {
    pub id: String,
    pub addressing_mode: Option<AddressingMode>,
    pub subject: Option<String>,
    pub subject_owner: Option<String>,
    pub subject_owner_phone_number: Option<String>,
    /// Epoch seconds
    pub subject_time: Option<i64>,
    pub size: usize,
    /// Epoch seconds
    pub creation: Option<i64>,
    pub owner: Option<String>,
    pub desc: Option<String>,
    pub desc_id: Option<String>,
    pub desc_owner: Option<String>,
    pub desc_owner_phone_number: Option<String>,
    pub desc_time: Option<i64>,
    pub linked_parent: Option<String>,
    pub restrict: bool,
    pub announce: bool,
    pub is_community: bool,
    pub is_community_announce: bool,
    pub join_approval_mode: bool,
    /// True when every member may add participants
    pub member_add_mode: bool,
    /// Disappearing-messages timer in seconds
    pub ephemeral_duration: Option<u32>,
    pub participants: Vec<GroupParticipant>,
}

impl GroupMetadata {
    pub fn participant(&self, jid: &str) -> Option<&GroupParticipant> {
        self.participants.iter().find(|p| p.id == jid)
    }

    pub fn admins(&self) -> impl Iterator<Item = &GroupParticipant> {
        self.participants.iter().filter(|p| p.is_admin())
    }
}
