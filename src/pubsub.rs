//! Bridges a [`MessageListener`] onto the client's binary pub/sub callbacks.
//!
//! Delivery itself belongs to the client; the adapter only forwards.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::native::BinaryPubSub;

/// A message received on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    channel: Vec<u8>,
    body: Vec<u8>,
}

impl Message {
    pub fn new(channel: impl Into<Vec<u8>>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            channel: channel.into(),
            body: body.into(),
        }
    }

    pub fn channel(&self) -> &[u8] {
        &self.channel
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.body))
    }
}

/// Receives published messages.
pub trait MessageListener: Send + Sync {
    /// `pattern` is set when the message matched a pattern subscription.
    fn on_message(&self, message: &Message, pattern: Option<&[u8]>);
}

/// [`BinaryPubSub`] implementation forwarding to a [`MessageListener`].
#[derive(Clone)]
pub struct PubSubAdapter {
    listener: Arc<dyn MessageListener>,
}

impl PubSubAdapter {
    pub fn new(listener: Arc<dyn MessageListener>) -> Self {
        Self { listener }
    }
}

impl fmt::Debug for PubSubAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PubSubAdapter").finish_non_exhaustive()
    }
}

impl BinaryPubSub for PubSubAdapter {
    fn on_message(&self, channel: &[u8], message: &[u8]) {
        self.listener
            .on_message(&Message::new(channel, message), None);
    }

    fn on_pmessage(&self, pattern: &[u8], channel: &[u8], message: &[u8]) {
        self.listener
            .on_message(&Message::new(channel, message), Some(pattern));
    }

    fn on_subscribe(&self, channel: &[u8], subscribed_channels: i64) {
        trace!(channel = %String::from_utf8_lossy(channel), subscribed_channels, "Subscribed");
    }

    fn on_unsubscribe(&self, channel: &[u8], subscribed_channels: i64) {
        trace!(channel = %String::from_utf8_lossy(channel), subscribed_channels, "Unsubscribed");
    }

    fn on_psubscribe(&self, pattern: &[u8], subscribed_channels: i64) {
        trace!(pattern = %String::from_utf8_lossy(pattern), subscribed_channels, "Pattern subscribed");
    }

    fn on_punsubscribe(&self, pattern: &[u8], subscribed_channels: i64) {
        trace!(pattern = %String::from_utf8_lossy(pattern), subscribed_channels, "Pattern unsubscribed");
    }
}

/// Wrap a listener for registration with the client.
pub fn adapt_pubsub(listener: Arc<dyn MessageListener>) -> PubSubAdapter {
    PubSubAdapter::new(listener)
}
