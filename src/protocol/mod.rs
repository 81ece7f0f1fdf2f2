//! Wire mapping for group operations
//!
//! - `builder`: request stanzas
//! - `extract`: response tree to group metadata
//! - `batch`: per-participant results of batch mutations

pub mod batch;
pub mod builder;
pub mod extract;

pub use batch::{map_participant_results, map_request_results, BatchAction};
pub use builder::{DescriptionUpdate, QueryType, GROUPS_XMLNS};
pub use extract::{extract_group_metadata, extract_group_node};
