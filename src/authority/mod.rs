//! Namespace authority clients.
//!
//! The registry talks to the remote messaging namespace exclusively through
//! the [`NamespaceAuthority`] trait. [`MemoryAuthority`] is a complete
//! in-process implementation used for tests and local development.

mod client;
mod memory;

pub use client::{AuthorityResult, NamespaceAuthority, SubscriptionClient};
pub use memory::{MemoryAuthority, MemoryReceiver, MemorySender};
