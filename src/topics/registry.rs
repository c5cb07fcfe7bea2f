//! Multi-topic registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::authority::NamespaceAuthority;
use crate::error::{RegistryError, Result};
use crate::topics::Topic;
use crate::types::{validate_name, TopicInfo};

/// Lifecycle registry for the topics of one messaging namespace.
///
/// Owns the keyed collection of [`Topic`] entries and mediates all topic
/// lifecycle operations; subscription operations go through the entry
/// returned by [`topic`](Self::topic). Entries are admitted only after the
/// authority confirmed the remote topic exists, and only explicit create and
/// delete calls change the collection; closing deactivates handles without
/// removing anything.
///
/// The topic map is guarded by a per-registry lock held only across local
/// mutation, so concurrent creates for one name serialize at the insertion
/// point: exactly one wins, the rest observe [`RegistryError::TopicExists`].
/// Remote calls are never made under the lock.
///
/// The registry is rebuilt each run; dropping it performs no remote work.
/// Call [`close_topics`](Self::close_topics) for an orderly shutdown.
pub struct TopicRegistry<A: NamespaceAuthority> {
    authority: Arc<A>,
    topics: RwLock<HashMap<String, Topic<A>>>,
}

impl<A: NamespaceAuthority> TopicRegistry<A> {
    /// Derive an authority client from a connection descriptor and wrap it.
    pub fn connect(descriptor: &str) -> Result<Self> {
        Ok(Self::with_authority(A::connect(descriptor)?))
    }

    /// Build a registry over an already constructed authority client.
    pub fn with_authority(authority: A) -> Self {
        Self {
            authority: Arc::new(authority),
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Borrow the underlying authority client.
    pub fn authority(&self) -> &A {
        &self.authority
    }

    // --- Lookup ---

    /// Look up a cached topic entry. No remote call is made.
    pub fn topic(&self, name: &str) -> Result<Topic<A>> {
        self.topics
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::TopicNotFound(name.to_string()))
    }

    /// Whether an entry is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.topics.read().contains_key(name)
    }

    /// Names of the registered topics, in no particular order.
    pub fn topic_names(&self) -> Vec<String> {
        self.topics.read().keys().cloned().collect()
    }

    /// Number of registered topics.
    pub fn topic_count(&self) -> usize {
        self.topics.read().len()
    }

    /// Snapshot of every registered topic and its subscriptions.
    pub fn info(&self) -> Vec<TopicInfo> {
        self.entries().iter().map(Topic::info).collect()
    }

    // --- Creation ---

    /// Create a topic and register an entry for it.
    ///
    /// Ensures the remote topic exists (creating it if absent), then binds a
    /// fresh send handle and inserts the entry under `name`. Insertion is
    /// unconditional after the remote step, so a second create for the same
    /// name fails with [`RegistryError::TopicExists`] even when the remote
    /// topic already existed.
    pub fn create_topic(&self, name: &str) -> Result<Topic<A>> {
        validate_name(name)?;

        if !self.authority.topic_exists(name)? {
            self.authority.create_topic(name)?;
        }

        let entry = Topic::open(name, Arc::clone(&self.authority))?;
        self.register(entry)
    }

    /// Asynchronous form of [`create_topic`](Self::create_topic). Suspends
    /// only at the authority calls; registration itself does not yield.
    pub async fn create_topic_async(&self, name: &str) -> Result<Topic<A>> {
        validate_name(name)?;

        if !self.authority.topic_exists_async(name).await? {
            self.authority.create_topic_async(name).await?;
        }

        let entry = Topic::open(name, Arc::clone(&self.authority))?;
        self.register(entry)
    }

    fn register(&self, entry: Topic<A>) -> Result<Topic<A>> {
        let mut topics = self.topics.write();
        if topics.contains_key(entry.name()) {
            return Err(RegistryError::TopicExists(entry.name().to_string()));
        }
        topics.insert(entry.name().to_string(), entry.clone());
        drop(topics);

        debug!(topic = %entry.name(), "registered topic");
        Ok(entry)
    }

    // --- Deletion ---

    /// Reconcile a topic with the remote namespace.
    ///
    /// Acts only when the authority no longer reports the topic: issues the
    /// remote delete and drops the local entry, returning whether an entry
    /// was removed. Returns `false`, touching nothing, while the remote
    /// topic still exists.
    pub fn delete_topic(&self, name: &str) -> Result<bool> {
        if !self.authority.topic_exists(name)? {
            self.authority.delete_topic(name)?;
            return Ok(self.unregister(name));
        }
        Ok(false)
    }

    /// Asynchronous form of [`delete_topic`](Self::delete_topic).
    pub async fn delete_topic_async(&self, name: &str) -> Result<bool> {
        if !self.authority.topic_exists_async(name).await? {
            self.authority.delete_topic_async(name).await?;
            return Ok(self.unregister(name));
        }
        Ok(false)
    }

    fn unregister(&self, name: &str) -> bool {
        let removed = self.topics.write().remove(name).is_some();
        if removed {
            debug!(topic = %name, "removed topic");
        }
        removed
    }

    // --- Close ---

    /// Close all subscription handles of the named topic.
    ///
    /// The entry stays registered. Fails with
    /// [`RegistryError::TopicNotFound`] for an unknown name.
    pub fn close_topic(&self, name: &str) -> Result<()> {
        self.topic(name)?.close_subscriptions()
    }

    /// Asynchronous form of [`close_topic`](Self::close_topic).
    pub async fn close_topic_async(&self, name: &str) -> Result<()> {
        self.topic(name)?.close_subscriptions_async().await
    }

    /// Close the subscription handles of every registered topic.
    ///
    /// Entries stay registered; already-closed handles are skipped; the
    /// first remote failure aborts the sweep and propagates.
    pub fn close_topics(&self) -> Result<()> {
        for entry in self.entries() {
            entry.close_subscriptions()?;
        }
        Ok(())
    }

    /// Asynchronous form of [`close_topics`](Self::close_topics).
    pub async fn close_topics_async(&self) -> Result<()> {
        for entry in self.entries() {
            entry.close_subscriptions_async().await?;
        }
        Ok(())
    }

    /// Clone the entries out so no lock is held across remote closes.
    fn entries(&self) -> Vec<Topic<A>> {
        self.topics.read().values().cloned().collect()
    }
}
