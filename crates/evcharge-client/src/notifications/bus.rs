//! Multi-subscriber fan-out for push notifications.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc, watch};
use tracing::{debug, warn};
use uuid::Uuid;

use evcharge_core::models::Notification;

/// Per-subscriber queue depth. A subscriber that falls this far behind
/// misses events rather than stalling the hub.
const SUBSCRIBER_CAPACITY: usize = 64;

pub type SubscriptionId = Uuid;

/// A live subscription. Dropping the receiver is an implicit unsubscribe.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub receiver: mpsc::Receiver<Notification>,
}

/// Explicitly owned event bus, created once per application context.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    subscribers: Arc<RwLock<HashMap<SubscriptionId, mpsc::Sender<Notification>>>>,
    unread: Arc<watch::Sender<usize>>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationBus {
    pub fn new() -> Self {
        let (unread, _) = watch::channel(0);
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            unread: Arc::new(unread),
        }
    }

    pub async fn subscribe(&self) -> Subscription {
        let (tx, receiver) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let id = Uuid::new_v4();
        self.subscribers.write().await.insert(id, tx);
        debug!(%id, "Notification subscriber added");
        Subscription { id, receiver }
    }

    /// Returns `true` if the subscriber existed.
    pub async fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.write().await.remove(&id).is_some()
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Deliver `notification` to every subscriber and bump the unread count.
    ///
    /// Subscribers whose receiver is gone are pruned. Returns the number of
    /// subscribers that accepted the event.
    pub async fn publish(&self, notification: Notification) -> usize {
        if !notification.is_read {
            self.unread.send_modify(|n| *n += 1);
        }

        let mut delivered = 0;
        let mut closed = Vec::new();
        {
            let subscribers = self.subscribers.read().await;
            for (id, tx) in subscribers.iter() {
                match tx.try_send(notification.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(%id, "Notification subscriber is lagging, event dropped");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in closed {
                subscribers.remove(&id);
            }
        }
        delivered
    }

    // =========================================================================
    // Unread count
    // =========================================================================

    pub fn unread_count(&self) -> usize {
        *self.unread.borrow()
    }

    /// Observe the unread count; the receiver sees every change.
    pub fn watch_unread(&self) -> watch::Receiver<usize> {
        self.unread.subscribe()
    }

    /// Replace the count, e.g. after fetching the notification list.
    pub fn set_unread(&self, count: usize) {
        self.unread.send_replace(count);
    }

    pub fn mark_one_read(&self) {
        self.unread.send_modify(|n| *n = n.saturating_sub(1));
    }
}
