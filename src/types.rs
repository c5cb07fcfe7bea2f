//! Core types for the topic registry.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// Filter expression matching every message.
///
/// Applied when a subscription is created without an explicit filter. The
/// registry treats filters as opaque tokens; this literal is only special in
/// that it is the default.
pub const MATCH_ALL: &str = "1=1";

/// Point-in-time view of one subscription's registry state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    /// Topic the subscription belongs to.
    pub topic: String,
    /// Subscription name, unique within its topic.
    pub name: String,
    /// Filter the subscription was registered with.
    pub filter: String,
    /// Whether the handle has been closed.
    pub closed: bool,
}

/// Point-in-time view of one topic's registry state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    /// Topic name, unique within the registry.
    pub name: String,
    /// Snapshots of the registered subscriptions, in no particular order.
    pub subscriptions: Vec<SubscriptionInfo>,
}

/// Validate a topic or subscription name before any remote call is issued.
///
/// Names identify resources within the namespace and must be non-empty.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(())
}
