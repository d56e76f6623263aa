//! Pluggable key/value caching with scoped local overlays.
//!
//! - [`Store`] is the contract every backend implements.
//! - [`NullStore`] keeps nothing, [`MemoryStore`] keeps everything in process.
//! - [`Namespaced`] partitions one backend into disjoint key spaces.
//! - [`LocalOverlay`](local::LocalOverlay) memoizes reads, writes and deletes for
//!   the duration of a scope (see [`local::scope`]).
//! - [`Cache`] ties these together into the handle applications use.

mod blob;
pub use blob::Blob;

mod cache;
pub use cache::Cache;

pub mod config;
pub use config::{StoreConfig, StoreType};

mod entry;
pub use entry::Entry;

pub mod local;

mod namespace;
pub use namespace::{NAMESPACE_SEPARATOR, Namespaced};

pub mod store;
pub use store::{Backend, MemoryStore, NullStore, Store, WriteOptions};

pub mod value;
pub use value::CacheValue;

#[cfg(test)]
mod test_utils;
