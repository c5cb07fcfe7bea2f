//! Live handle for one (topic, subscription) pair.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::authority::{NamespaceAuthority, SubscriptionClient};
use crate::error::Result;
use crate::types::SubscriptionInfo;

struct SubscriptionState<A: NamespaceAuthority> {
    topic: String,
    name: String,
    filter: String,
    closed: AtomicBool,
    client: A::Receiver,
}

/// Live handle bound to one (topic, subscription) pair.
///
/// Handles are cheap shared references: clones returned by repeated lookups
/// all observe the same state, so a close performed through one is visible
/// through every other. Once closed, a handle issues no further remote
/// operations; the transition is terminal.
pub struct Subscription<A: NamespaceAuthority> {
    state: Arc<SubscriptionState<A>>,
}

impl<A: NamespaceAuthority> Clone for Subscription<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: NamespaceAuthority> Subscription<A> {
    pub(crate) fn new(topic: &str, name: &str, filter: &str, client: A::Receiver) -> Self {
        Self {
            state: Arc::new(SubscriptionState {
                topic: topic.to_string(),
                name: name.to_string(),
                filter: filter.to_string(),
                closed: AtomicBool::new(false),
                client,
            }),
        }
    }

    /// Topic this subscription belongs to.
    pub fn topic(&self) -> &str {
        &self.state.topic
    }

    /// Subscription name, unique within its topic.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Filter the subscription was registered with.
    pub fn filter(&self) -> &str {
        &self.state.filter
    }

    /// Whether the handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::Acquire)
    }

    /// Borrow the underlying receive handle.
    pub fn client(&self) -> &A::Receiver {
        &self.state.client
    }

    /// Snapshot of the handle's registry state.
    pub fn info(&self) -> SubscriptionInfo {
        SubscriptionInfo {
            topic: self.state.topic.clone(),
            name: self.state.name.clone(),
            filter: self.state.filter.clone(),
            closed: self.is_closed(),
        }
    }

    /// Close the remote link.
    ///
    /// Idempotent: only the first successful call reaches the authority;
    /// later calls return `Ok(())` without remote work. The handle is marked
    /// closed only after the remote close succeeds, so a failure leaves it
    /// open for retry by the caller.
    pub fn close(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.state.client.close()?;
        self.state.closed.store(true, Ordering::Release);
        debug!(topic = %self.state.topic, subscription = %self.state.name, "closed subscription");
        Ok(())
    }

    /// Asynchronous form of [`close`](Self::close).
    pub async fn close_async(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        self.state.client.close_async().await?;
        self.state.closed.store(true, Ordering::Release);
        debug!(topic = %self.state.topic, subscription = %self.state.name, "closed subscription");
        Ok(())
    }
}

impl<A: NamespaceAuthority> fmt::Debug for Subscription<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.state.topic)
            .field("name", &self.state.name)
            .field("filter", &self.state.filter)
            .field("closed", &self.is_closed())
            .finish()
    }
}
