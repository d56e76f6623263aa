use super::{Store, WriteOptions};
use crate::{Blob, Entry};
use anyhow::Result;
use regex::Regex;

/// A store that keeps nothing.
///
/// Writes are accepted and discarded, reads always miss, deletes never remove
/// anything and counters never exist. Use it to switch caching off without
/// touching the calling code.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStore;

impl NullStore {
	#[must_use]
	pub fn new() -> Self {
		Self
	}
}

impl Store for NullStore {
	fn write(&self, _key: &str, _value: &Blob, _options: &WriteOptions) -> Result<bool> {
		Ok(true)
	}

	fn read(&self, _key: &str) -> Result<Entry> {
		Ok(Entry::Absent)
	}

	fn delete(&self, _key: &str) -> Result<bool> {
		Ok(false)
	}

	fn delete_matched_under(&self, _prefix: &str, _pattern: &Regex) -> Result<()> {
		Ok(())
	}

	fn increment(&self, _key: &str, _amount: i64) -> Result<Option<i64>> {
		Ok(None)
	}

	fn decrement(&self, _key: &str, _amount: i64) -> Result<Option<i64>> {
		Ok(None)
	}

	fn clear(&self) -> Result<()> {
		Ok(())
	}

	fn cleanup(&self) -> Result<()> {
		Ok(())
	}
}
