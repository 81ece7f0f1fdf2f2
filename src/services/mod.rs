/// Service layer for group operations.
/// Orchestrates request building, the transport round trip, and response mapping.

pub mod dirty_sync;
pub mod events;
pub mod group_service;
pub mod invite_queue;
pub mod store;
pub mod transport;

pub use dirty_sync::{DirtySyncController, SyncState, DIRTY_GROUPS};
pub use events::{ChannelEventSink, EventSink};
pub use group_service::GroupService;
pub use invite_queue::InviteAcceptQueue;
pub use store::MessageStore;
pub use transport::Transport;
