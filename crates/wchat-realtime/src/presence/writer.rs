//! Background persistence of the stored online flag.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use wchat_core::traits::PresenceStore;
use wchat_core::types::UserId;

#[derive(Debug)]
struct PresenceWrite {
    user_id: UserId,
    online: bool,
}

/// Queues online-flag writes for a single background task.
///
/// Enqueueing never blocks, so the router can issue writes from inside its
/// critical section. The task applies writes one at a time in enqueue
/// order, so a quick offline→online flap cannot leave the stored flag
/// stale. Failures are logged and otherwise ignored: the in-memory registry
/// is the authority for presence broadcasts.
///
/// The task ends once every clone is dropped and the queue is empty.
#[derive(Debug, Clone)]
pub struct PresenceWriter {
    tx: mpsc::UnboundedSender<PresenceWrite>,
}

impl PresenceWriter {
    /// Spawns the writer task on the current runtime.
    pub fn spawn(store: Arc<dyn PresenceStore>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, rx));
        (Self { tx }, task)
    }

    /// Queue a write of `user_id`'s online flag.
    pub fn enqueue(&self, user_id: UserId, online: bool) {
        if self.tx.send(PresenceWrite { user_id, online }).is_err() {
            warn!("Presence writer has stopped; online flag not persisted");
        }
    }
}

async fn run(store: Arc<dyn PresenceStore>, mut rx: mpsc::UnboundedReceiver<PresenceWrite>) {
    while let Some(write) = rx.recv().await {
        match store.set_online(&write.user_id, write.online).await {
            Ok(()) => debug!(
                user_id = %write.user_id,
                online = write.online,
                "Online flag persisted"
            ),
            Err(e) => warn!(
                user_id = %write.user_id,
                online = write.online,
                error = %e,
                "Failed to persist online flag"
            ),
        }
    }
    debug!("Presence writer stopped");
}
