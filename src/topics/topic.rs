//! Topic registry entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::authority::NamespaceAuthority;
use crate::error::{RegistryError, Result};
use crate::subscriptions::Subscription;
use crate::types::{validate_name, SubscriptionInfo, TopicInfo, MATCH_ALL};

struct TopicState<A: NamespaceAuthority> {
    name: String,
    authority: Arc<A>,
    sender: A::Sender,
    subscriptions: RwLock<HashMap<String, Subscription<A>>>,
}

/// Registry entry for one topic.
///
/// Owns a send handle for the topic plus the keyed collection of
/// subscription handles, and mediates all subscription lifecycle operations
/// for that topic. Entries are cheap shared references: clones returned by
/// repeated registry lookups all view the same collection.
///
/// The subscription map is guarded by a per-entry lock held only across
/// local mutation, never across a call into the authority. A subscription
/// name is admitted to the map only after the authority confirmed the remote
/// resource exists (created here or pre-existing).
pub struct Topic<A: NamespaceAuthority> {
    state: Arc<TopicState<A>>,
}

impl<A: NamespaceAuthority> Clone for Topic<A> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: NamespaceAuthority> fmt::Debug for Topic<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.state.name)
            .field("subscriptions", &self.subscription_names())
            .finish()
    }
}

impl<A: NamespaceAuthority> Topic<A> {
    /// Bind a new entry to `name`, opening a fresh send handle.
    pub(crate) fn open(name: &str, authority: Arc<A>) -> Result<Self> {
        let sender = authority.open_sender(name)?;
        Ok(Self {
            state: Arc::new(TopicState {
                name: name.to_string(),
                authority,
                sender,
                subscriptions: RwLock::new(HashMap::new()),
            }),
        })
    }

    /// Topic name, immutable for the entry's lifetime.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Borrow the send handle bound at entry construction.
    pub fn sender(&self) -> &A::Sender {
        &self.state.sender
    }

    // --- Lookup ---

    /// Look up a cached subscription handle. No remote call is made.
    pub fn subscription(&self, name: &str) -> Result<Subscription<A>> {
        self.state
            .subscriptions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| self.not_found(name))
    }

    /// Names of the registered subscriptions, in no particular order.
    pub fn subscription_names(&self) -> Vec<String> {
        self.state.subscriptions.read().keys().cloned().collect()
    }

    /// Number of registered subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.state.subscriptions.read().len()
    }

    /// Snapshot of the entry and its subscriptions.
    pub fn info(&self) -> TopicInfo {
        let subscriptions: Vec<SubscriptionInfo> = self
            .state
            .subscriptions
            .read()
            .values()
            .map(Subscription::info)
            .collect();
        TopicInfo {
            name: self.state.name.clone(),
            subscriptions,
        }
    }

    // --- Creation ---

    /// Create a subscription with the match-all filter.
    pub fn create_subscription(&self, name: &str) -> Result<Subscription<A>> {
        self.create_subscription_with_filter(name, MATCH_ALL)
    }

    /// Asynchronous form of [`create_subscription`](Self::create_subscription).
    pub async fn create_subscription_async(&self, name: &str) -> Result<Subscription<A>> {
        self.create_subscription_with_filter_async(name, MATCH_ALL)
            .await
    }

    /// Create a subscription with an explicit filter.
    ///
    /// Ensures the remote subscription exists (creating it with `filter` if
    /// absent), opens a receive handle, and registers it under `name`. The
    /// handle is registered unconditionally after the remote step, so a
    /// second create for the same name fails with
    /// [`RegistryError::SubscriptionExists`] even when the remote resource
    /// already existed.
    pub fn create_subscription_with_filter(
        &self,
        name: &str,
        filter: &str,
    ) -> Result<Subscription<A>> {
        validate_name(name)?;
        let state = &self.state;

        if !state.authority.subscription_exists(&state.name, name)? {
            state.authority.create_subscription(&state.name, name, filter)?;
        }

        let client = state.authority.open_receiver(&state.name, name)?;
        self.register(Subscription::new(&state.name, name, filter, client))
    }

    /// Asynchronous form of
    /// [`create_subscription_with_filter`](Self::create_subscription_with_filter).
    /// Suspends only at the authority calls; registration itself does not
    /// yield.
    pub async fn create_subscription_with_filter_async(
        &self,
        name: &str,
        filter: &str,
    ) -> Result<Subscription<A>> {
        validate_name(name)?;
        let state = &self.state;

        if !state
            .authority
            .subscription_exists_async(&state.name, name)
            .await?
        {
            state
                .authority
                .create_subscription_async(&state.name, name, filter)
                .await?;
        }

        let client = state.authority.open_receiver(&state.name, name)?;
        self.register(Subscription::new(&state.name, name, filter, client))
    }

    fn register(&self, handle: Subscription<A>) -> Result<Subscription<A>> {
        let mut subscriptions = self.state.subscriptions.write();
        if subscriptions.contains_key(handle.name()) {
            return Err(RegistryError::SubscriptionExists {
                topic: self.state.name.clone(),
                subscription: handle.name().to_string(),
            });
        }
        subscriptions.insert(handle.name().to_string(), handle.clone());
        drop(subscriptions);

        debug!(topic = %self.state.name, subscription = %handle.name(), "registered subscription");
        Ok(handle)
    }

    // --- Deletion ---

    /// Reconcile a subscription with the remote namespace.
    ///
    /// Acts only when the authority no longer reports the subscription:
    /// issues the remote delete and drops the local handle, returning whether
    /// a handle was removed. Returns `false`, touching nothing, while the
    /// remote subscription still exists.
    pub fn delete_subscription(&self, name: &str) -> Result<bool> {
        let state = &self.state;
        if !state.authority.subscription_exists(&state.name, name)? {
            state.authority.delete_subscription(&state.name, name)?;
            return Ok(self.unregister(name));
        }
        Ok(false)
    }

    /// Asynchronous form of [`delete_subscription`](Self::delete_subscription).
    pub async fn delete_subscription_async(&self, name: &str) -> Result<bool> {
        let state = &self.state;
        if !state
            .authority
            .subscription_exists_async(&state.name, name)
            .await?
        {
            state
                .authority
                .delete_subscription_async(&state.name, name)
                .await?;
            return Ok(self.unregister(name));
        }
        Ok(false)
    }

    fn unregister(&self, name: &str) -> bool {
        let removed = self.state.subscriptions.write().remove(name).is_some();
        if removed {
            debug!(topic = %self.state.name, subscription = %name, "removed subscription");
        }
        removed
    }

    // --- Close ---

    /// Close one subscription handle by name.
    ///
    /// Fails with [`RegistryError::SubscriptionNotFound`] for an unknown
    /// name. Closing an already-closed handle is a no-op.
    pub fn close_subscription(&self, name: &str) -> Result<()> {
        self.subscription(name)?.close()
    }

    /// Asynchronous form of [`close_subscription`](Self::close_subscription).
    pub async fn close_subscription_async(&self, name: &str) -> Result<()> {
        self.subscription(name)?.close_async().await
    }

    /// Close every registered subscription handle, in no particular order.
    ///
    /// Already-closed handles are skipped. Entries stay registered; the first
    /// remote failure aborts the sweep and propagates.
    pub fn close_subscriptions(&self) -> Result<()> {
        for handle in self.handles() {
            handle.close()?;
        }
        Ok(())
    }

    /// Asynchronous form of [`close_subscriptions`](Self::close_subscriptions).
    pub async fn close_subscriptions_async(&self) -> Result<()> {
        for handle in self.handles() {
            handle.close_async().await?;
        }
        Ok(())
    }

    /// Clone the handles out so no lock is held across a remote close.
    fn handles(&self) -> Vec<Subscription<A>> {
        self.state.subscriptions.read().values().cloned().collect()
    }

    fn not_found(&self, name: &str) -> RegistryError {
        RegistryError::SubscriptionNotFound {
            topic: self.state.name.clone(),
            subscription: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::MemoryAuthority;

    fn test_topic() -> (MemoryAuthority, Topic<MemoryAuthority>) {
        let authority = MemoryAuthority::connect("test").unwrap();
        authority.create_topic("orders").unwrap();
        let topic = Topic::open("orders", Arc::new(authority.clone())).unwrap();
        (authority, topic)
    }

    #[test]
    fn test_create_then_lookup() {
        let (_, topic) = test_topic();

        topic.create_subscription("billing").unwrap();
        let handle = topic.subscription("billing").unwrap();
        assert_eq!(handle.name(), "billing");
        assert_eq!(handle.filter(), MATCH_ALL);
        assert_eq!(topic.subscription_count(), 1);
    }

    #[test]
    fn test_create_registers_remotely_when_absent() {
        let (authority, topic) = test_topic();

        topic
            .create_subscription_with_filter("billing", "priority > 5")
            .unwrap();
        assert_eq!(
            authority.subscription_filter("orders", "billing").as_deref(),
            Some("priority > 5")
        );
    }

    #[test]
    fn test_create_skips_remote_create_when_present() {
        let (authority, topic) = test_topic();
        authority
            .create_subscription("orders", "billing", "region = 'eu'")
            .unwrap();

        // Pre-existing remote subscription keeps its filter
        topic
            .create_subscription_with_filter("billing", "priority > 5")
            .unwrap();
        assert_eq!(
            authority.subscription_filter("orders", "billing").as_deref(),
            Some("region = 'eu'")
        );
    }

    #[test]
    fn test_duplicate_create_fails() {
        let (_, topic) = test_topic();

        topic.create_subscription("billing").unwrap();
        let result = topic.create_subscription("billing");
        assert!(matches!(
            result,
            Err(RegistryError::SubscriptionExists { .. })
        ));
    }

    #[test]
    fn test_lookup_unknown_fails() {
        let (_, topic) = test_topic();
        assert!(matches!(
            topic.subscription("billing"),
            Err(RegistryError::SubscriptionNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_is_a_noop_while_remote_exists() {
        let (_, topic) = test_topic();
        topic.create_subscription("billing").unwrap();

        assert!(!topic.delete_subscription("billing").unwrap());
        assert_eq!(topic.subscription_count(), 1);
    }

    #[test]
    fn test_delete_removes_once_remote_is_gone() {
        let (authority, topic) = test_topic();
        topic.create_subscription("billing").unwrap();

        // Remote side drops the subscription out-of-band
        authority.delete_subscription("orders", "billing").unwrap();

        assert!(topic.delete_subscription("billing").unwrap());
        assert_eq!(topic.subscription_count(), 0);

        // Nothing left to remove on a second call
        assert!(!topic.delete_subscription("billing").unwrap());
    }

    #[test]
    fn test_close_subscription_unknown_name_fails() {
        let (_, topic) = test_topic();
        assert!(matches!(
            topic.close_subscription("billing"),
            Err(RegistryError::SubscriptionNotFound { .. })
        ));
    }

    #[test]
    fn test_close_subscriptions_skips_closed_handles() {
        let (_, topic) = test_topic();
        topic.create_subscription("billing").unwrap();
        topic.create_subscription("audit").unwrap();

        topic.close_subscription("billing").unwrap();
        topic.close_subscriptions().unwrap();

        for name in ["billing", "audit"] {
            let handle = topic.subscription(name).unwrap();
            assert!(handle.is_closed());
            assert_eq!(handle.client().close_calls(), 1);
        }

        // Closing does not remove entries
        assert_eq!(topic.subscription_count(), 2);
    }

    #[test]
    fn test_empty_name_rejected_before_remote_work() {
        let (authority, topic) = test_topic();

        assert!(matches!(
            topic.create_subscription(""),
            Err(RegistryError::InvalidName(_))
        ));
        assert_eq!(authority.subscription_filter("orders", ""), None);
    }

    #[test]
    fn test_info_snapshot() {
        let (_, topic) = test_topic();
        topic
            .create_subscription_with_filter("billing", "priority > 5")
            .unwrap();

        let info = topic.info();
        assert_eq!(info.name, "orders");
        assert_eq!(info.subscriptions.len(), 1);
        assert_eq!(info.subscriptions[0].filter, "priority > 5");
    }
}
