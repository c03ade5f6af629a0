//! Per-channel inactivity watcher.
//!
//! Every message re-arms its channel's timer; a channel that stays quiet for
//! the full timeout gets its cleanup action run exactly once, then returns
//! to idle. Each armed timer carries a generation number, and an expiring
//! timer only runs the cleanup if it removes its slot with that generation
//! still current. A timer superseded between its wakeup and that check loses
//! the removal and does nothing, so a cleanup can never fire after the reset
//! that cancelled it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use scc::hash_map::Entry;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Action to run against a channel once it has gone quiet.
pub trait IdleAction: Send + Sync + 'static {
    fn run(&self, channel_id: u64) -> impl Future<Output = anyhow::Result<()>> + Send;
}

struct PendingCleanup {
    generation: u64,
    abort: AbortHandle,
}

struct Inner<A> {
    channels: scc::HashMap<u64, PendingCleanup>,
    timeout: Duration,
    action: A,
}

/// Debouncer over all channels the bot sees.
pub struct IdleWatcher<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for IdleWatcher<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: IdleAction> IdleWatcher<A> {
    pub fn new(timeout: Duration, action: A) -> Self {
        Self {
            inner: Arc::new(Inner {
                channels: scc::HashMap::new(),
                timeout,
                action,
            }),
        }
    }

    /// Re-arm the timer for a channel, superseding any pending one.
    pub async fn reset(&self, channel_id: u64) {
        match self.inner.channels.entry_async(channel_id).await {
            Entry::Occupied(mut entry) => {
                let slot = entry.get_mut();
                slot.abort.abort();
                slot.generation += 1;
                slot.abort = arm(&self.inner, channel_id, slot.generation);
            }
            Entry::Vacant(entry) => {
                let abort = arm(&self.inner, channel_id, 0);
                entry.insert_entry(PendingCleanup {
                    generation: 0,
                    abort,
                });
            }
        }
    }

    /// Number of channels with a pending timer.
    pub fn pending(&self) -> usize {
        self.inner.channels.len()
    }
}

fn arm<A: IdleAction>(inner: &Arc<Inner<A>>, channel_id: u64, generation: u64) -> AbortHandle {
    // The quiet period runs from the message, not from the spawned task's
    // first poll.
    let sleep = tokio::time::sleep(inner.timeout);
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        sleep.await;
        inner.expire(channel_id, generation).await;
    })
    .abort_handle()
}

impl<A: IdleAction> Inner<A> {
    async fn expire(&self, channel_id: u64, generation: u64) {
        let owned = self
            .channels
            .remove_if_async(&channel_id, |slot| slot.generation == generation)
            .await
            .is_some();
        if !owned {
            // A newer message re-armed this channel while we were waking up.
            return;
        }
        debug!(channel_id, "channel idle, running cleanup");
        if let Err(err) = self.action.run(channel_id).await {
            warn!(channel_id, error = %err, "inactivity cleanup failed");
        }
    }
}
