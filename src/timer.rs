//! Keyed, cancellable panel timers

use std::collections::HashMap;
use std::future::poll_fn;
use std::time::Duration;
use tokio_util::time::{DelayQueue, delay_queue::Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Re-extract once a new document has had time to render
    Settle,
    /// Trailing debounce after window resizes
    ResizeDebounce,
    /// Keep the loading flag up briefly after a manual refresh
    LoadingHold,
}

/// At most one pending timer per [`TimerKind`]
#[derive(Debug, Default)]
pub struct Timers {
    queue: DelayQueue<TimerKind>,
    keys: HashMap<TimerKind, Key>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `kind`, restarting it from zero if it is already pending
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) {
        match self.keys.get(&kind) {
            Some(key) => {
                log::trace!("Restarting {:?} timer ({:?})", kind, delay);
                self.queue.reset(key, delay);
            }
            None => {
                log::trace!("Starting {:?} timer ({:?})", kind, delay);
                let key = self.queue.insert(kind, delay);
                self.keys.insert(kind, key);
            }
        }
    }

    /// Returns whether a pending timer was cancelled
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        match self.keys.remove(&kind) {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.keys.contains_key(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.keys.clear();
    }

    /// Wait for the next timer to fire. Never resolves while nothing is pending.
    pub async fn next_expired(&mut self) -> TimerKind {
        if self.keys.is_empty() {
            return std::future::pending().await;
        }

        let expired = poll_fn(|cx| self.queue.poll_expired(cx)).await;
        match expired {
            Some(expired) => {
                let kind = expired.into_inner();
                self.keys.remove(&kind);
                kind
            }
            None => std::future::pending().await,
        }
    }
}
