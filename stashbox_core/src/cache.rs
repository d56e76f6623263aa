//! The [`Cache`] handle that applications hold on to.
//!
//! A handle stacks the pieces of this crate in a fixed order:
//!
//! ```text
//! caller key ──▶ Namespaced ──▶ LocalOverlay ──▶ Backend (null / memory / custom)
//! ```
//!
//! Keys are namespaced first, so the local overlay always works with fully
//! qualified keys. Handles derived with [`Cache::with_namespace`] therefore
//! share one overlay safely.
//!
//! # Examples
//!
//! ```rust
//! use stashbox_core::{Blob, Cache, Store, WriteOptions};
//!
//! let cache = Cache::null();
//! cache.with_local_cache(|| {
//! 	assert!(cache.write("name", &Blob::from("value"), &WriteOptions::default()).unwrap());
//! 	assert!(cache.read("name").unwrap().is_present());
//! });
//! assert!(cache.read("name").unwrap().is_absent());
//! ```

use crate::{
	Blob, Entry, Store, WriteOptions,
	config::StoreConfig,
	local::{LocalOverlay, ScopeGuard},
	namespace::Namespaced,
	store::{Backend, assert_total},
	value::{CacheValue, decode, encode},
};
use anyhow::Result;
use regex::Regex;
use stashbox_derive::context;
use std::{collections::HashMap, sync::Arc};

#[derive(Clone, Debug)]
pub struct Cache {
	store: Namespaced<LocalOverlay<Backend>>,
}

impl Cache {
	#[must_use]
	pub fn new(config: &StoreConfig) -> Self {
		Self::from_backend(Backend::new(config), config.namespace.clone())
	}

	/// Builds a handle over a caller-supplied store.
	#[must_use]
	pub fn from_store(store: impl Store + 'static) -> Self {
		Self::from_backend(Backend::custom(store), None)
	}

	#[must_use]
	pub fn null() -> Self {
		Self::from_backend(Backend::Null(crate::NullStore::new()), None)
	}

	#[must_use]
	pub fn memory() -> Self {
		Self::from_backend(Backend::Memory(crate::MemoryStore::new()), None)
	}

	fn from_backend(backend: Backend, namespace: Option<String>) -> Self {
		Self {
			store: Namespaced::new(LocalOverlay::new(Arc::new(backend)), namespace),
		}
	}

	/// Returns a handle on the same backend and local scope, under `namespace`.
	#[must_use]
	pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
		Self {
			store: Namespaced::new(self.store.inner().clone(), Some(namespace.into())),
		}
	}

	pub fn namespace(&self) -> Option<&str> {
		self.store.namespace()
	}

	pub fn backend(&self) -> &Backend {
		self.store.inner().backend()
	}

	/// Opens a local scope on the current thread. It closes when the guard drops.
	pub fn local_scope(&self) -> ScopeGuard {
		self.store.inner().enter_scope()
	}

	/// Runs `f` inside a local scope.
	///
	/// Calls nested inside an already open scope reuse it; the local cache is
	/// discarded when the outermost scope ends, even if `f` panics.
	pub fn with_local_cache<R>(&self, f: impl FnOnce() -> R) -> R {
		let _scope = self.local_scope();
		f()
	}

	pub fn has_local_cache(&self) -> bool {
		self.store.inner().is_active()
	}

	/// Returns the cached value for `key`, computing and writing it on a miss.
	#[context("Failed to fetch {key:?}")]
	pub fn fetch(&self, key: &str, options: &WriteOptions, compute: impl FnOnce() -> Result<Blob>) -> Result<Blob> {
		if let Entry::Present(value) = self.store.read(key)? {
			return Ok(value);
		}
		let value = compute()?;
		self.store.write(key, &value, options)?;
		Ok(value)
	}

	/// Writes a structured value. Structured values are never raw, so they cannot be incremented.
	#[context("Failed to write value for {key:?}")]
	pub fn write_value<V: CacheValue>(&self, key: &str, value: &V, options: &WriteOptions) -> Result<bool> {
		let options = WriteOptions {
			raw: false,
			..*options
		};
		self.store.write(key, &encode(value)?, &options)
	}

	#[context("Failed to read value for {key:?}")]
	pub fn read_value<V: CacheValue>(&self, key: &str) -> Result<Option<V>> {
		match self.store.read(key)? {
			Entry::Present(blob) => Ok(Some(decode(&blob)?)),
			Entry::Absent => Ok(None),
		}
	}
}

impl Store for Cache {
	#[context("Failed to write {key:?}")]
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool> {
		self.store.write(key, value, options)
	}

	#[context("Failed to read {key:?}")]
	fn read(&self, key: &str) -> Result<Entry> {
		self.store.read(key)
	}

	#[context("Failed to delete {key:?}")]
	fn delete(&self, key: &str) -> Result<bool> {
		self.store.delete(key)
	}

	#[context("Failed to delete keys under {prefix:?} matching {:?}", pattern.as_str())]
	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()> {
		self.store.delete_matched_under(prefix, pattern)
	}

	#[context("Failed to increment {key:?}")]
	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.store.increment(key, amount)
	}

	#[context("Failed to decrement {key:?}")]
	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.store.decrement(key, amount)
	}

	#[context("Failed to clear cache")]
	fn clear(&self) -> Result<()> {
		self.store.clear()
	}

	#[context("Failed to clean up cache")]
	fn cleanup(&self) -> Result<()> {
		self.store.cleanup()
	}

	#[context("Failed to read {} keys", keys.len())]
	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		let entries = self.store.read_multi(keys)?;
		assert_total(self.backend(), keys, &entries);
		Ok(entries)
	}

	#[context("Failed to check {key:?}")]
	fn exists(&self, key: &str) -> Result<bool> {
		self.store.exists(key)
	}
}
