/// Serialized execution for invite acceptance.
/// Jobs run one at a time, in the order their callers reached the queue.
///
/// The queue is a fair async mutex held for the whole job: waiters are woken
/// in arrival order, the job runs on the caller's own task, and a job that
/// panics or is dropped releases its turn.

use crate::error::Result;
use std::future::Future;
use tokio::sync::Mutex;

pub struct InviteAcceptQueue {
    turn: Mutex<()>,
}

impl InviteAcceptQueue {
    pub fn new() -> Self {
        InviteAcceptQueue { turn: Mutex::new(()) }
    }

    /// Wait behind every job queued earlier, then run `job` to completion
    pub async fn run<F, T>(&self, job: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _turn = self.turn.lock().await;
        job.await
    }
}

impl Default for InviteAcceptQueue {
    fn default() -> Self {
        Self::new()
    }
}
