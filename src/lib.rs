//! # Multitopic
//!
//! A lifecycle registry for pub/sub topics and subscriptions layered on a
//! remote messaging namespace.
//!
//! ## Core Concepts
//!
//! - **Registry**: keyed collection of topic entries, one per namespace
//! - **Topic entry**: send handle plus the topic's subscription handles
//! - **Subscription handle**: live receive-side client with terminal close
//! - **Authority**: abstract client for the remote namespace; every remote
//!   operation has matching sync and async forms
//!
//! Entries exist only through explicit create calls and are dropped only
//! through explicit delete calls; closing deactivates handles without
//! removing anything, so a registry can be shut down and inspected without
//! losing track of what it managed.
//!
//! ## Example
//!
//! ```ignore
//! use multitopic::{MemoryAuthority, TopicRegistry};
//!
//! let registry: TopicRegistry<MemoryAuthority> =
//!     TopicRegistry::connect("memory://billing-ns")?;
//!
//! let orders = registry.create_topic("orders")?;
//! orders.create_subscription_with_filter("billing", "priority > 5")?;
//!
//! let handle = registry.topic("orders")?.subscription("billing")?;
//! handle.close()?;
//!
//! registry.close_topics()?;
//! ```

pub mod authority;
pub mod error;
pub mod subscriptions;
pub mod topics;
pub mod types;

// Re-exports
pub use authority::{
    AuthorityResult, MemoryAuthority, MemoryReceiver, MemorySender, NamespaceAuthority,
    SubscriptionClient,
};
pub use error::{AuthorityError, RegistryError, Result};
pub use subscriptions::Subscription;
pub use topics::{Topic, TopicRegistry};
pub use types::{SubscriptionInfo, TopicInfo, MATCH_ALL};
