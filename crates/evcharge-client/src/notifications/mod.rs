//! Realtime notifications.
//!
//! The [`NotificationHub`] owns the persistent push connection; every event
//! it receives is handed to the [`NotificationBus`], which fans out to any
//! number of subscribers and tracks the unread count.

mod bus;
mod hub;
mod sse;

pub use bus::{NotificationBus, Subscription, SubscriptionId};
pub use hub::{HubError, HubState, NotificationHub};
pub use sse::{SseDecoder, SseEvent};
