//! In-process namespace authority.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::client::{AuthorityResult, NamespaceAuthority, SubscriptionClient};
use crate::error::AuthorityError;

/// Namespace table: topic name to subscription name to filter.
#[derive(Default)]
struct Namespace {
    topics: HashMap<String, HashMap<String, String>>,
}

/// In-memory implementation of [`NamespaceAuthority`].
///
/// Backs the namespace with a shared table instead of a remote service.
/// Clones share the same table, so one instance can stand in for the remote
/// side while another drives a registry. The asynchronous forms complete
/// immediately; there is nothing to suspend on.
pub struct MemoryAuthority {
    namespace: String,
    state: Arc<RwLock<Namespace>>,
}

impl Clone for MemoryAuthority {
    fn clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl MemoryAuthority {
    /// Label of the namespace this client is bound to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Filter a subscription was created with, if it exists.
    pub fn subscription_filter(&self, topic: &str, subscription: &str) -> Option<String> {
        self.state
            .read()
            .topics
            .get(topic)
            .and_then(|subs| subs.get(subscription))
            .cloned()
    }

    /// Number of topics currently present in the namespace.
    pub fn topic_count(&self) -> usize {
        self.state.read().topics.len()
    }
}

#[async_trait]
impl NamespaceAuthority for MemoryAuthority {
    type Sender = MemorySender;
    type Receiver = MemoryReceiver;

    /// Accepts any non-empty descriptor; a `memory://` prefix is stripped to
    /// form the namespace label.
    fn connect(descriptor: &str) -> AuthorityResult<Self> {
        let namespace = descriptor.strip_prefix("memory://").unwrap_or(descriptor);
        if namespace.is_empty() {
            return Err(AuthorityError::Connection(
                "empty connection descriptor".to_string(),
            ));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            state: Arc::new(RwLock::new(Namespace::default())),
        })
    }

    fn topic_exists(&self, topic: &str) -> AuthorityResult<bool> {
        Ok(self.state.read().topics.contains_key(topic))
    }

    async fn topic_exists_async(&self, topic: &str) -> AuthorityResult<bool> {
        self.topic_exists(topic)
    }

    fn create_topic(&self, topic: &str) -> AuthorityResult<()> {
        self.state
            .write()
            .topics
            .entry(topic.to_string())
            .or_default();
        Ok(())
    }

    async fn create_topic_async(&self, topic: &str) -> AuthorityResult<()> {
        self.create_topic(topic)
    }

    fn delete_topic(&self, topic: &str) -> AuthorityResult<()> {
        self.state.write().topics.remove(topic);
        Ok(())
    }

    async fn delete_topic_async(&self, topic: &str) -> AuthorityResult<()> {
        self.delete_topic(topic)
    }

    fn subscription_exists(&self, topic: &str, subscription: &str) -> AuthorityResult<bool> {
        Ok(self
            .state
            .read()
            .topics
            .get(topic)
            .is_some_and(|subs| subs.contains_key(subscription)))
    }

    async fn subscription_exists_async(
        &self,
        topic: &str,
        subscription: &str,
    ) -> AuthorityResult<bool> {
        self.subscription_exists(topic, subscription)
    }

    fn create_subscription(
        &self,
        topic: &str,
        subscription: &str,
        filter: &str,
    ) -> AuthorityResult<()> {
        let mut state = self.state.write();
        let subs = state
            .topics
            .get_mut(topic)
            .ok_or_else(|| AuthorityError::EntityNotFound(topic.to_string()))?;
        subs.entry(subscription.to_string())
            .or_insert_with(|| filter.to_string());
        Ok(())
    }

    async fn create_subscription_async(
        &self,
        topic: &str,
        subscription: &str,
        filter: &str,
    ) -> AuthorityResult<()> {
        self.create_subscription(topic, subscription, filter)
    }

    fn delete_subscription(&self, topic: &str, subscription: &str) -> AuthorityResult<()> {
        if let Some(subs) = self.state.write().topics.get_mut(topic) {
            subs.remove(subscription);
        }
        Ok(())
    }

    async fn delete_subscription_async(
        &self,
        topic: &str,
        subscription: &str,
    ) -> AuthorityResult<()> {
        self.delete_subscription(topic, subscription)
    }

    fn open_sender(&self, topic: &str) -> AuthorityResult<Self::Sender> {
        Ok(MemorySender {
            topic: topic.to_string(),
        })
    }

    fn open_receiver(&self, topic: &str, subscription: &str) -> AuthorityResult<Self::Receiver> {
        Ok(MemoryReceiver {
            topic: topic.to_string(),
            subscription: subscription.to_string(),
            closes: AtomicUsize::new(0),
        })
    }
}

/// Send handle addressing one in-memory topic.
#[derive(Clone, Debug)]
pub struct MemorySender {
    topic: String,
}

impl MemorySender {
    /// Topic this handle addresses.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

/// Receive handle bound to one in-memory (topic, subscription) pair.
///
/// Counts close calls so tests can observe that a close reached the
/// authority exactly once.
#[derive(Debug)]
pub struct MemoryReceiver {
    topic: String,
    subscription: String,
    closes: AtomicUsize,
}

impl MemoryReceiver {
    /// Topic this handle belongs to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Subscription this handle is bound to.
    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    /// Number of close calls that reached this handle.
    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::Acquire)
    }
}

#[async_trait]
impl SubscriptionClient for MemoryReceiver {
    fn close(&self) -> AuthorityResult<()> {
        self.closes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn close_async(&self) -> AuthorityResult<()> {
        self.close()
    }
}
