/// Command-line configuration for the stanza tool.
/// Handles argument parsing and the operation subcommands.
use crate::models::{ApprovalAction, GroupSetting, JoinApprovalMode, MemberAddMode, ParticipantAction};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "g2-groups")]
#[command(about = "Build and inspect group protocol stanzas", long_about = None)]
pub struct Config {
    /// How request nodes are printed (default: xml)
    #[arg(long, value_enum, default_value = "xml")]
    pub format: OutputFormat,

    /// Enable verbose logging (DEBUG level)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Parse command-line arguments into Config
    pub fn from_args() -> Self {
        Config::parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Xml,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the request stanza for an operation
    Build {
        #[command(subcommand)]
        operation: Operation,
    },
    /// Read a response tree (JSON) and print the group metadata it describes
    Extract {
        /// File holding the response node, or a bare <group> node
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Operation {
    Metadata {
        jid: String,
    },
    FetchAll,
    Create {
        subject: String,
        participants: Vec<String>,
        /// Operation key (default: freshly generated)
        #[arg(long)]
        key: Option<String>,
    },
    Leave {
        id: String,
    },
    Subject {
        jid: String,
        subject: String,
    },
    Participants {
        jid: String,
        #[arg(value_parser = parse_participant_action)]
        action: ParticipantAction,
        #[arg(required = true)]
        participants: Vec<String>,
    },
    RequestsList {
        jid: String,
    },
    Requests {
        jid: String,
        #[arg(value_parser = parse_approval_action)]
        action: ApprovalAction,
        #[arg(required = true)]
        participants: Vec<String>,
    },
    Description {
        jid: String,
        /// New text; omit to delete the description
        text: Option<String>,
        /// Id of the description being replaced
        #[arg(long)]
        prev: Option<String>,
        /// Id of the new description (default: freshly generated)
        #[arg(long)]
        id: Option<String>,
    },
    InviteCode {
        jid: String,
    },
    RevokeInvite {
        jid: String,
    },
    AcceptInvite {
        code: String,
    },
    RevokeInviteV4 {
        group: String,
        invited: String,
    },
    AcceptInviteV4 {
        group: String,
        code: String,
        expiration: i64,
        admin: String,
    },
    InviteInfo {
        code: String,
    },
    Ephemeral {
        jid: String,
        /// Seconds; 0 disables disappearing messages
        expiration: u32,
    },
    Setting {
        jid: String,
        #[arg(value_parser = parse_setting)]
        setting: GroupSetting,
    },
    MemberAddMode {
        jid: String,
        #[arg(value_parser = parse_member_add_mode)]
        mode: MemberAddMode,
    },
    JoinApproval {
        jid: String,
        #[arg(value_parser = parse_join_approval_mode)]
        mode: JoinApprovalMode,
    },
}

fn parse_participant_action(s: &str) -> Result<ParticipantAction, String> {
    ParticipantAction::parse(s).ok_or_else(|| format!("expected add|remove|promote|demote, got '{}'", s))
}

fn parse_approval_action(s: &str) -> Result<ApprovalAction, String> {
    ApprovalAction::parse(s).ok_or_else(|| format!("expected approve|reject, got '{}'", s))
}

fn parse_setting(s: &str) -> Result<GroupSetting, String> {
    GroupSetting::parse(s).ok_or_else(|| {
        format!("expected announcement|not_announcement|locked|unlocked, got '{}'", s)
    })
}

fn parse_member_add_mode(s: &str) -> Result<MemberAddMode, String> {
    MemberAddMode::parse(s).ok_or_else(|| format!("expected admin_add|all_member_add, got '{}'", s))
}

fn parse_join_approval_mode(s: &str) -> Result<JoinApprovalMode, String> {
    JoinApprovalMode::parse(s).ok_or_else(|| format!("expected on|off, got '{}'", s))
}
