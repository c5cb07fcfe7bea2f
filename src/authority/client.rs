//! Abstract client for the remote messaging namespace.

use async_trait::async_trait;

use crate::error::AuthorityError;

/// Result type for authority operations.
pub type AuthorityResult<T> = std::result::Result<T, AuthorityError>;

/// Receive-side handle bound to one (topic, subscription) pair.
///
/// Closing is idempotent at the remote layer; implementations must tolerate
/// repeated close calls.
#[async_trait]
pub trait SubscriptionClient: Send + Sync + 'static {
    /// Tear down the remote link.
    fn close(&self) -> AuthorityResult<()>;

    /// Asynchronous form of [`close`](Self::close).
    async fn close_async(&self) -> AuthorityResult<()>;
}

/// Client for the remote messaging namespace.
///
/// Exposes existence checks and create/delete for topics and subscriptions,
/// plus construction of send/receive handles. Every remote mutation has a
/// synchronous and an asynchronous form with identical semantics; the two
/// differ only in whether the caller suspends. Handle construction is
/// synchronous.
///
/// Remote create and delete are idempotent: creating a resource that already
/// exists and deleting one that is absent both succeed.
#[async_trait]
pub trait NamespaceAuthority: Send + Sync + Sized + 'static {
    /// Send-capable handle addressing one topic.
    type Sender: Send + Sync + 'static;

    /// Receive-side handle bound to one (topic, subscription) pair.
    type Receiver: SubscriptionClient;

    /// Derive a client from an opaque connection descriptor.
    fn connect(descriptor: &str) -> AuthorityResult<Self>;

    // --- Topic scope ---

    /// Check whether a topic exists in the namespace.
    fn topic_exists(&self, topic: &str) -> AuthorityResult<bool>;

    /// Asynchronous form of [`topic_exists`](Self::topic_exists).
    async fn topic_exists_async(&self, topic: &str) -> AuthorityResult<bool>;

    /// Create a topic in the namespace.
    fn create_topic(&self, topic: &str) -> AuthorityResult<()>;

    /// Asynchronous form of [`create_topic`](Self::create_topic).
    async fn create_topic_async(&self, topic: &str) -> AuthorityResult<()>;

    /// Delete a topic from the namespace.
    fn delete_topic(&self, topic: &str) -> AuthorityResult<()>;

    /// Asynchronous form of [`delete_topic`](Self::delete_topic).
    async fn delete_topic_async(&self, topic: &str) -> AuthorityResult<()>;

    // --- Subscription scope ---

    /// Check whether a subscription exists under a topic.
    fn subscription_exists(&self, topic: &str, subscription: &str) -> AuthorityResult<bool>;

    /// Asynchronous form of [`subscription_exists`](Self::subscription_exists).
    async fn subscription_exists_async(
        &self,
        topic: &str,
        subscription: &str,
    ) -> AuthorityResult<bool>;

    /// Create a subscription under a topic with an opaque filter predicate.
    fn create_subscription(
        &self,
        topic: &str,
        subscription: &str,
        filter: &str,
    ) -> AuthorityResult<()>;

    /// Asynchronous form of [`create_subscription`](Self::create_subscription).
    async fn create_subscription_async(
        &self,
        topic: &str,
        subscription: &str,
        filter: &str,
    ) -> AuthorityResult<()>;

    /// Delete a subscription from a topic.
    fn delete_subscription(&self, topic: &str, subscription: &str) -> AuthorityResult<()>;

    /// Asynchronous form of [`delete_subscription`](Self::delete_subscription).
    async fn delete_subscription_async(
        &self,
        topic: &str,
        subscription: &str,
    ) -> AuthorityResult<()>;

    // --- Handles ---

    /// Open a send handle for a topic.
    fn open_sender(&self, topic: &str) -> AuthorityResult<Self::Sender>;

    /// Open a receive handle for one (topic, subscription) pair.
    fn open_receiver(&self, topic: &str, subscription: &str) -> AuthorityResult<Self::Receiver>;
}
