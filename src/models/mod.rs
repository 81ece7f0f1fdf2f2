/// Data models for the group protocol layer.
/// Defines group metadata, operation vocabularies, batch results, and timeline records.

pub mod actions;
pub mod events;
pub mod group;
pub mod message;
pub mod results;

pub use actions::{ApprovalAction, GroupSetting, JoinApprovalMode, MemberAddMode, ParticipantAction};
pub use events::GroupEvent;
pub use group::{AddressingMode, AdminRole, GroupMetadata, GroupParticipant};
pub use message::{
    generate_message_id, unix_timestamp_seconds, GroupInviteMessage, MessageKey, MessageStubType,
    MessageUpdate, UpsertKind, WebMessageInfo,
};
pub use results::{ParticipantResult, RequestParticipant, STATUS_OK};
