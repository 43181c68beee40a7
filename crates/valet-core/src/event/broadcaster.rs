//! Fan-out of push events to live subscribers, with a process-wide hold
//! buffer for events published while nobody is connected.
//!
//! Events travel pre-serialized (the JSON line that goes on the wire),
//! so dedup is byte comparison and subscribers need no further encoding.
//! The buffer keeps at most one Summary, always the most recent and
//! always ordered last; a flush to the first reconnecting subscriber
//! drains the buffer for everyone.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use valet_types::event::PushEvent;

/// A live subscriber's receiving end.
///
/// Dropping the subscription alone does not remove the registry entry;
/// call [`EventBroadcaster::unsubscribe`] with `id` when the stream ends.
pub struct Subscription {
    pub id: u64,
    pub receiver: mpsc::UnboundedReceiver<String>,
}

struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<String>,
}

struct HeldEvent {
    is_summary: bool,
    payload: String,
}

#[derive(Default)]
struct Inner {
    subscribers: Vec<Subscriber>,
    hold: Vec<HeldEvent>,
}

/// Process-wide event broadcaster.
///
/// Live subscribers receive events in registration order. With no
/// subscriber connected, events land in the hold buffer instead.
#[derive(Default)]
pub struct EventBroadcaster {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and return its receiving end.
    pub fn subscribe(&self) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().expect("broadcaster lock poisoned");
        inner.subscribers.push(Subscriber { id, tx });
        debug!(subscriber = id, "event subscriber registered");
        Subscription { id, receiver }
    }

    /// Remove a subscriber. Idempotent; unknown ids are ignored.
    pub fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.lock().expect("broadcaster lock poisoned");
        inner.subscribers.retain(|s| s.id != id);
    }

    /// Deliver an event to every live subscriber, or hold it if none is
    /// connected.
    pub fn publish(&self, event: &PushEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "unserializable push event dropped");
                return;
            }
        };

        let mut inner = self.inner.lock().expect("broadcaster lock poisoned");
        if inner.subscribers.is_empty() {
            Self::hold(&mut inner.hold, event.is_summary(), payload);
            return;
        }
        for subscriber in &inner.subscribers {
            // A closed channel means the subscriber is gone but not yet
            // unsubscribed; the registry entry is cleaned up on unsubscribe.
            let _ = subscriber.tx.send(payload.clone());
        }
    }

    /// Replay the hold buffer to one subscriber, then clear it.
    ///
    /// The clear is global: whichever subscriber reconnects first drains
    /// the buffer for everyone.
    pub fn flush(&self, subscription: &Subscription) {
        let mut inner = self.inner.lock().expect("broadcaster lock poisoned");
        if inner.hold.is_empty() {
            return;
        }
        let held = std::mem::take(&mut inner.hold);
        let Some(subscriber) = inner.subscribers.iter().find(|s| s.id == subscription.id) else {
            return;
        };
        debug!(count = held.len(), "replaying held events");
        for event in held {
            let _ = subscriber.tx.send(event.payload);
        }
    }

    /// Hold-buffer update rules:
    /// - a new Summary replaces any held Summary;
    /// - a non-Summary drops byte-identical duplicates and keeps the
    ///   held Summary ordered last.
    fn hold(hold: &mut Vec<HeldEvent>, is_summary: bool, payload: String) {
        if is_summary {
            hold.retain(|e| !e.is_summary);
            hold.push(HeldEvent { is_summary, payload });
            return;
        }

        let summary = hold
            .iter()
            .position(|e| e.is_summary)
            .map(|i| hold.remove(i));
        hold.retain(|e| e.payload != payload);
        hold.push(HeldEvent { is_summary, payload });
        if let Some(summary) = summary {
            hold.push(summary);
        }
    }

    #[cfg(test)]
    fn held_payloads(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap()
            .hold
            .iter()
            .map(|e| e.payload.clone())
            .collect()
    }
}
