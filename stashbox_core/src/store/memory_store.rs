use super::{Store, WriteOptions};
use crate::{Blob, Entry};
use anyhow::Result;
use parking_lot::Mutex;
use regex::Regex;
use std::collections::HashMap;

#[derive(Clone, Debug)]
struct StoredValue {
	value: Blob,
	raw: bool,
}

impl StoredValue {
	fn counter(&self) -> Option<i64> {
		if !self.raw {
			return None;
		}
		self.value.to_str().ok()?.trim().parse().ok()
	}
}

/// A process-local store keeping every value in a `HashMap`.
///
/// All operations, including increment and decrement, run under one lock, so
/// concurrent counter updates are never lost.
#[derive(Debug, Default)]
pub struct MemoryStore {
	data: Mutex<HashMap<String, StoredValue>>,
}

impl MemoryStore {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.data.lock().len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.data.lock().is_empty()
	}

	fn modify_counter(&self, key: &str, amount: i64) -> Option<i64> {
		let mut data = self.data.lock();
		let next = match data.get(key) {
			Some(stored) => stored.counter()?.checked_add(amount)?,
			None => amount,
		};
		data.insert(
			key.to_string(),
			StoredValue {
				value: Blob::from(next.to_string()),
				raw: true,
			},
		);
		Some(next)
	}
}

impl Store for MemoryStore {
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool> {
		let mut data = self.data.lock();
		if options.unless_exist && data.contains_key(key) {
			return Ok(false);
		}
		data.insert(
			key.to_string(),
			StoredValue {
				value: value.clone(),
				raw: options.raw,
			},
		);
		Ok(true)
	}

	fn read(&self, key: &str) -> Result<Entry> {
		Ok(self.data.lock().get(key).map(|stored| stored.value.clone()).into())
	}

	fn delete(&self, key: &str) -> Result<bool> {
		Ok(self.data.lock().remove(key).is_some())
	}

	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()> {
		self.data
			.lock()
			.retain(|key, _| !key.strip_prefix(prefix).is_some_and(|rest| pattern.is_match(rest)));
		Ok(())
	}

	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		Ok(self.modify_counter(key, amount))
	}

	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		Ok(amount.checked_neg().and_then(|negated| self.modify_counter(key, negated)))
	}

	fn clear(&self) -> Result<()> {
		self.data.lock().clear();
		Ok(())
	}

	fn cleanup(&self) -> Result<()> {
		let mut data = self.data.lock();
		data.shrink_to_fit();
		log::debug!("compacted memory store holding {} entries", data.len());
		Ok(())
	}

	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		let data = self.data.lock();
		Ok(keys
			.iter()
			.map(|key| {
				let entry: Entry = data.get(*key).map(|stored| stored.value.clone()).into();
				((*key).to_string(), entry)
			})
			.collect())
	}
}
