/// Dirty-state resynchronization for groups.
///
/// The server flags a domain as dirty when state changed out of band. For
/// the `groups` domain the controller refetches every participating group
/// (which publishes `groups.update`) and only then clears the dirty bit, so a
/// failed refetch leaves the bit set for a later notification to retry.

use crate::error::Result;
use crate::node::BinaryNode;
use crate::services::GroupService;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Dirty domain handled here
pub const DIRTY_GROUPS: &str = "groups";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Clean,
    Resyncing,
}

pub struct DirtySyncController {
    groups: Arc<GroupService>,
    in_flight: AtomicUsize,
}

/// Decrements the in-flight count even if the resync future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DirtySyncController {
    pub fn new(groups: Arc<GroupService>) -> Self {
        DirtySyncController {
            groups,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SyncState::Resyncing
        } else {
            SyncState::Clean
        }
    }

    /// Handle an inbound `ib` notification.
    ///
    /// Returns `Ok(true)` when a groups resync ran, `Ok(false)` when the
    /// notification was not about groups.
    pub async fn handle_notification(&self, node: &BinaryNode) -> Result<bool> {
        let Some(dirty) = node.child("dirty") else {
            return Ok(false);
        };
        let kind = dirty.attr("type").unwrap_or_default();
        if kind != DIRTY_GROUPS {
            debug!("Ignoring dirty notification for '{}'", kind);
            return Ok(false);
        }

        let _guard = InFlight::enter(&self.in_flight);
        self.resync().await?;
        Ok(true)
    }

    async fn resync(&self) -> Result<()> {
        let groups = match self.groups.group_fetch_all_participating().await {
            Ok(groups) => groups,
            Err(e) => {
                warn!("Group resync failed, dirty bit kept: {}", e);
                return Err(e);
            }
        };

        self.groups.clean_dirty_bits(DIRTY_GROUPS).await?;
        info!("Resynced {} groups after dirty notification", groups.len());
        Ok(())
    }
}
