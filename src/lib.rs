/// Group management protocol layer
/// Turns group operations into `w:g2` request stanzas and responses into typed records

pub mod cli;
pub mod config;
pub mod error;
pub mod jid;
pub mod models;
pub mod node;
pub mod protocol;
pub mod services;

pub use error::{GroupError, Result};
pub use models::{GroupMetadata, GroupParticipant, ParticipantResult, RequestParticipant};
pub use node::{BinaryNode, NodeContent};
pub use services::{DirtySyncController, GroupService};
