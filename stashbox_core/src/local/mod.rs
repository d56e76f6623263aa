//! Scoped local caching.
//!
//! A [`LocalOverlay`] sits in front of a store and, while a scope is open,
//! remembers what it has read, written and deleted so that repeated lookups in
//! the same unit of work skip the backend. See [`scope`] for how scopes are
//! opened and closed.

mod local_cache;
mod overlay;
pub mod scope;

pub use local_cache::LocalCache;
pub use overlay::LocalOverlay;
pub use scope::{ScopeGuard, ScopeId};
