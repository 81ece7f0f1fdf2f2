/// Event sink for domain events.
/// Publishing is synchronous and happens after the data it describes is final.

use crate::models::GroupEvent;
use tokio::sync::mpsc;

pub trait EventSink: Send + Sync {
    fn publish(&self, event: GroupEvent);
}

/// Forwards events to an unbounded channel
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<GroupEvent>,
}

impl ChannelEventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<GroupEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelEventSink { tx }, rx)
    }
}

impl EventSink for ChannelEventSink {
    fn publish(&self, event: GroupEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            log::warn!("Dropping {} event: no receiver", name);
        }
    }
}
