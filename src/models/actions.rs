//! Closed vocabularies for the `set` operations.
//!
//! Each variant maps to exactly one wire tag or text value, so callers never
//! pass raw tag strings around.

use serde::{Deserialize, Serialize};

/// Batch membership change; the tag names both the request and the response container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantAction {
    Add,
    Remove,
    Promote,
    Demote,
}

impl ParticipantAction {
    pub const ALL: [ParticipantAction; 4] = [
        ParticipantAction::Add,
        ParticipantAction::Remove,
        ParticipantAction::Promote,
        ParticipantAction::Demote,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ParticipantAction::Add => "add",
            ParticipantAction::Remove => "remove",
            ParticipantAction::Promote => "promote",
            ParticipantAction::Demote => "demote",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.tag() == s)
    }
}

/// Decision on pending join requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn tag(&self) -> &'static str {
        match self {
            ApprovalAction::Approve => "approve",
            ApprovalAction::Reject => "reject",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(ApprovalAction::Approve),
            "reject" => Some(ApprovalAction::Reject),
            _ => None,
        }
    }
}

/// Who may send messages (announcement) and who may edit group info (locked)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupSetting {
    Announcement,
    NotAnnouncement,
    Locked,
    Unlocked,
}

impl GroupSetting {
    pub fn tag(&self) -> &'static str {
        match self {
            GroupSetting::Announcement => "announcement",
            GroupSetting::NotAnnouncement => "not_announcement",
            GroupSetting::Locked => "locked",
            GroupSetting::Unlocked => "unlocked",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "announcement" => Some(GroupSetting::Announcement),
            "not_announcement" => Some(GroupSetting::NotAnnouncement),
            "locked" => Some(GroupSetting::Locked),
            "unlocked" => Some(GroupSetting::Unlocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberAddMode {
    AdminAdd,
    AllMemberAdd,
}

impl MemberAddMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberAddMode::AdminAdd => "admin_add",
            MemberAddMode::AllMemberAdd => "all_member_add",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin_add" => Some(MemberAddMode::AdminAdd),
            "all_member_add" => Some(MemberAddMode::AllMemberAdd),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinApprovalMode {
    On,
    Off,
}

impl JoinApprovalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinApprovalMode::On => "on",
            JoinApprovalMode::Off => "off",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "on" => Some(JoinApprovalMode::On),
            "off" => Some(JoinApprovalMode::Off),
            _ => None,
        }
    }
}
