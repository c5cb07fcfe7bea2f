//! Subscription handles.

mod handle;

pub use handle::Subscription;
