//! Key namespacing.
//!
//! [`Namespaced`] prefixes every key with `"{namespace}:"` before it reaches the
//! wrapped store, so several logical caches can share one backend without
//! seeing each other's entries.

use crate::{Blob, Entry, Store, WriteOptions, store::assert_total};
use anyhow::Result;
use regex::Regex;
use std::{borrow::Cow, collections::HashMap};

pub const NAMESPACE_SEPARATOR: char = ':';

/// Decorates a store with an optional key namespace.
///
/// Without a namespace every call passes through untouched.
#[derive(Clone, Debug)]
pub struct Namespaced<S: Store> {
	inner: S,
	namespace: Option<String>,
}

impl<S: Store> Namespaced<S> {
	pub fn new(inner: S, namespace: Option<String>) -> Self {
		Self {
			inner,
			namespace: namespace.filter(|ns| !ns.is_empty()),
		}
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	pub fn namespace(&self) -> Option<&str> {
		self.namespace.as_deref()
	}

	/// Returns the key as the wrapped store sees it.
	pub fn qualify<'a>(&self, key: &'a str) -> Cow<'a, str> {
		match &self.namespace {
			Some(ns) => Cow::Owned(format!("{ns}{NAMESPACE_SEPARATOR}{key}")),
			None => Cow::Borrowed(key),
		}
	}
}

impl<S: Store> Store for Namespaced<S> {
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool> {
		self.inner.write(&self.qualify(key), value, options)
	}

	fn read(&self, key: &str) -> Result<Entry> {
		self.inner.read(&self.qualify(key))
	}

	fn delete(&self, key: &str) -> Result<bool> {
		self.inner.delete(&self.qualify(key))
	}

	/// Patterns are matched against the key below the namespace, so anchors,
	/// inline flags and builder options keep their meaning.
	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()> {
		self.inner.delete_matched_under(&self.qualify(prefix), pattern)
	}

	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.inner.increment(&self.qualify(key), amount)
	}

	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.inner.decrement(&self.qualify(key), amount)
	}

	fn clear(&self) -> Result<()> {
		if self.namespace.is_none() {
			return self.inner.clear();
		}
		self.inner.delete_matched_under(&self.qualify(""), &Regex::new("")?)
	}

	fn cleanup(&self) -> Result<()> {
		self.inner.cleanup()
	}

	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		if self.namespace.is_none() {
			return self.inner.read_multi(keys);
		}
		let qualified: Vec<Cow<'_, str>> = keys.iter().map(|key| self.qualify(key)).collect();
		let qualified: Vec<&str> = qualified.iter().map(AsRef::as_ref).collect();
		let entries = self.inner.read_multi(&qualified)?;
		assert_total(&self.inner, &qualified, &entries);
		// duplicate keys share one qualified entry, so it is cloned rather than taken
		Ok(keys
			.iter()
			.zip(&qualified)
			.map(|(key, qualified)| {
				let entry = entries.get(*qualified).cloned().unwrap_or_default();
				((*key).to_string(), entry)
			})
			.collect())
	}

	fn exists(&self, key: &str) -> Result<bool> {
		self.inner.exists(&self.qualify(key))
	}
}
