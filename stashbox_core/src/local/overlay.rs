use super::{
	LocalCache,
	scope::{self, ScopeGuard, ScopeId},
};
use crate::{Blob, Entry, Store, WriteOptions, store::assert_total};
use anyhow::Result;
use itertools::Itertools;
use regex::Regex;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// A write-through, read-through memo in front of a store.
///
/// While a scope for this overlay is open on the current thread, every read is
/// answered from the local cache when possible (misses included) and every
/// successful write or delete is mirrored into it. Outside a scope the overlay
/// forwards everything to the backend unchanged.
pub struct LocalOverlay<S: Store> {
	backend: Arc<S>,
	scope_id: ScopeId,
}

impl<S: Store> LocalOverlay<S> {
	pub fn new(backend: Arc<S>) -> Self {
		Self {
			backend,
			scope_id: ScopeId::new(),
		}
	}

	pub fn backend(&self) -> &S {
		&self.backend
	}

	pub fn scope_id(&self) -> ScopeId {
		self.scope_id
	}

	pub fn enter_scope(&self) -> ScopeGuard {
		scope::enter(self.scope_id)
	}

	pub fn is_active(&self) -> bool {
		scope::is_active(self.scope_id)
	}

	fn local<R>(&self, f: impl FnOnce(&mut LocalCache) -> R) -> Option<R> {
		scope::with_local(self.scope_id, f)
	}

	fn invalidate(&self, key: &str) {
		if self.local(|local| local.invalidate(key)).is_some() {
			log::trace!("local cache: invalidated {key:?}");
		}
	}

	fn discard(&self, operation: &str) {
		if let Some(count) = self.local(|local| {
			let count = local.len();
			local.clear();
			count
		}) {
			log::debug!("local cache: {operation} discarded {count} entries");
		}
	}
}

impl<S: Store> Clone for LocalOverlay<S> {
	fn clone(&self) -> Self {
		Self {
			backend: Arc::clone(&self.backend),
			scope_id: self.scope_id,
		}
	}
}

impl<S: Store> Debug for LocalOverlay<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LocalOverlay")
			.field("backend", &self.backend)
			.field("scope_id", &self.scope_id)
			.finish()
	}
}

impl<S: Store> Store for LocalOverlay<S> {
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool> {
		let result = self.backend.write(key, value, options);
		match &result {
			Ok(true) => {
				self.local(|local| local.write_entry(key, Entry::Present(value.clone())));
			}
			Ok(false) => self.invalidate(key),
			Err(err) => {
				log::warn!("write of {key:?} failed, dropping local entry: {err}");
				self.invalidate(key);
			}
		}
		result
	}

	fn read(&self, key: &str) -> Result<Entry> {
		if let Some(entry) = self.local(|local| local.read_entry(key)).flatten() {
			log::trace!("local cache: hit for {key:?}");
			return Ok(entry);
		}
		let entry = self.backend.read(key)?;
		if self.local(|local| local.write_entry(key, entry.clone())).is_some() {
			log::trace!("local cache: recorded {key:?} (present: {})", entry.is_present());
		}
		Ok(entry)
	}

	fn delete(&self, key: &str) -> Result<bool> {
		let result = self.backend.delete(key);
		match &result {
			Ok(_) => {
				self.local(|local| local.write_entry(key, Entry::Absent));
			}
			Err(err) => {
				log::warn!("delete of {key:?} failed, dropping local entry: {err}");
				self.invalidate(key);
			}
		}
		result
	}

	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()> {
		let result = self.backend.delete_matched_under(prefix, pattern);
		self.discard("delete_matched");
		result
	}

	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		let result = self.backend.increment(key, amount);
		self.invalidate(key);
		result
	}

	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		let result = self.backend.decrement(key, amount);
		self.invalidate(key);
		result
	}

	fn clear(&self) -> Result<()> {
		let result = self.backend.clear();
		self.discard("clear");
		result
	}

	fn cleanup(&self) -> Result<()> {
		let result = self.backend.cleanup();
		self.discard("cleanup");
		result
	}

	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		let Some(mut entries) = self.local(|local| {
			keys
				.iter()
				.filter_map(|key| local.read_entry(key).map(|entry| ((*key).to_string(), entry)))
				.collect::<HashMap<_, _>>()
		}) else {
			return self.backend.read_multi(keys);
		};

		let missing: Vec<&str> = keys
			.iter()
			.copied()
			.filter(|key| !entries.contains_key(*key))
			.unique()
			.collect();
		if missing.is_empty() {
			log::trace!("local cache: all {} keys answered locally", keys.len());
			return Ok(entries);
		}

		let mut fetched = self.backend.read_multi(&missing)?;
		assert_total(self.backend.as_ref(), &missing, &fetched);
		let fetched: Vec<(&str, Entry)> = missing
			.iter()
			.map(|key| (*key, fetched.remove(*key).unwrap_or_default()))
			.collect();
		self.local(|local| {
			for (key, entry) in &fetched {
				local.write_entry(key, entry.clone());
			}
		});
		entries.extend(fetched.into_iter().map(|(key, entry)| (key.to_string(), entry)));
		Ok(entries)
	}
}
