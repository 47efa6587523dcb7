//! Collaborator interfaces to the surrounding chat platform.
//!
//! The dispatcher neither owns a connection nor a message loop; it plugs
//! into whatever delivers messages ([`EventManager`]) and whatever sends
//! them back ([`ReplyClient`]). Both are object-safe async traits so a
//! platform adapter can live entirely outside this crate.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CallbackError;

/// One inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Identity of the sender, platform-defined.
    pub author: String,
    /// Raw message text.
    pub content: String,
}

impl Message {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }
}

/// Async callback invoked for each inbound message.
pub type MessageCallback =
    Arc<dyn Fn(Message) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Handle identifying one subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Source of inbound messages.
#[async_trait]
pub trait EventManager: Send + Sync {
    /// Registers `callback` for every subsequent message-created event.
    async fn subscribe(&self, callback: MessageCallback) -> SubscriptionId;

    /// Removes a subscription. Returns `false` when the id is unknown.
    async fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Outbound message channel, used by command callbacks to reply.
#[async_trait]
pub trait ReplyClient: Send + Sync {
    /// Sends `content` to `recipient` on the underlying platform.
    async fn send_message(&self, recipient: &str, content: &str) -> Result<(), CallbackError>;
}
