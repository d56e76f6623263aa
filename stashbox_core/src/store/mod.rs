//! The store contract and the built-in backends.
//!
//! Every backend implements [`Store`]. [`Backend`] is the closed set of
//! variants chosen at configuration time; custom stores plug in through
//! [`Backend::Custom`].

mod backend;
mod memory_store;
mod null_store;

pub use backend::Backend;
pub use memory_store::MemoryStore;
pub use null_store::NullStore;

use crate::{Blob, Entry};
use anyhow::Result;
use regex::Regex;
use std::{collections::HashMap, fmt::Debug};

/// Options accepted by [`Store::write`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
	/// Store the bytes verbatim. Only raw decimal values can be incremented.
	pub raw: bool,
	/// Refuse the write (and return `false`) if the key already holds a value.
	pub unless_exist: bool,
}

impl WriteOptions {
	#[must_use]
	pub fn raw() -> Self {
		Self {
			raw: true,
			..Self::default()
		}
	}

	#[must_use]
	pub fn unless_exist() -> Self {
		Self {
			unless_exist: true,
			..Self::default()
		}
	}
}

/// The operations every cache backend provides.
///
/// A miss is never an error: it is reported as [`Entry::Absent`]. Errors are
/// reserved for backend failures and are returned to the caller untouched.
pub trait Store: Debug + Send + Sync {
	/// Stores `value` under `key`. Returns whether the write was accepted,
	/// which does not imply the value was retained.
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool>;

	fn read(&self, key: &str) -> Result<Entry>;

	/// Removes `key`. Returns whether something was actually removed.
	fn delete(&self, key: &str) -> Result<bool>;

	/// Removes every key that starts with `prefix` and whose remainder is matched by `pattern`.
	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()>;

	/// Removes every key matched by `pattern`.
	fn delete_matched(&self, pattern: &Regex) -> Result<()> {
		self.delete_matched_under("", pattern)
	}

	/// Adds `amount` to the raw numeric value under `key` and returns the new value,
	/// or `None` if the store cannot increment that key.
	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>>;

	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>>;

	/// Removes all entries.
	fn clear(&self) -> Result<()>;

	/// Backend-specific maintenance.
	fn cleanup(&self) -> Result<()>;

	/// Reads several keys at once. The result contains every requested key.
	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		let mut entries = HashMap::with_capacity(keys.len());
		for key in keys {
			entries.insert((*key).to_string(), self.read(key)?);
		}
		Ok(entries)
	}

	fn exists(&self, key: &str) -> Result<bool> {
		Ok(self.read(key)?.is_present())
	}

	/// Writes every pair, returning `true` only if all writes were accepted.
	fn write_multi(&self, entries: &[(&str, Blob)], options: &WriteOptions) -> Result<bool> {
		let mut all = true;
		for (key, value) in entries {
			all &= self.write(key, value, options)?;
		}
		Ok(all)
	}

	/// Deletes every key, returning how many were actually removed.
	fn delete_multi(&self, keys: &[&str]) -> Result<usize> {
		let mut removed = 0;
		for key in keys {
			if self.delete(key)? {
				removed += 1;
			}
		}
		Ok(removed)
	}
}

/// Panics if `entries` does not contain every key in `keys`.
///
/// A store dropping keys from [`Store::read_multi`] is a defect in that store,
/// not a condition callers can recover from.
pub(crate) fn assert_total<S: Debug + ?Sized>(store: &S, keys: &[&str], entries: &HashMap<String, Entry>) {
	for key in keys {
		assert!(
			entries.contains_key(*key),
			"store {store:?} omitted key {key:?} from read_multi"
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::RecordingStore;

	#[derive(Debug)]
	struct LossyStore;

	impl Store for LossyStore {
		fn write(&self, _: &str, _: &Blob, _: &WriteOptions) -> Result<bool> {
			Ok(true)
		}
		fn read(&self, _: &str) -> Result<Entry> {
			Ok(Entry::Absent)
		}
		fn delete(&self, _: &str) -> Result<bool> {
			Ok(false)
		}
		fn delete_matched_under(&self, _: &str, _: &Regex) -> Result<()> {
			Ok(())
		}
		fn increment(&self, _: &str, _: i64) -> Result<Option<i64>> {
			Ok(None)
		}
		fn decrement(&self, _: &str, _: i64) -> Result<Option<i64>> {
			Ok(None)
		}
		fn clear(&self) -> Result<()> {
			Ok(())
		}
		fn cleanup(&self) -> Result<()> {
			Ok(())
		}
		fn read_multi(&self, _: &[&str]) -> Result<HashMap<String, Entry>> {
			Ok(HashMap::new())
		}
	}

	#[test]
	fn write_options_constructors() {
		assert!(WriteOptions::raw().raw);
		assert!(!WriteOptions::raw().unless_exist);
		assert!(WriteOptions::unless_exist().unless_exist);
		assert_eq!(WriteOptions::default(), WriteOptions { raw: false, unless_exist: false });
	}

	#[test]
	fn provided_multi_operations() -> Result<()> {
		let store = RecordingStore::memory();
		let entries = [("a", Blob::from("1")), ("b", Blob::from("2"))];
		assert!(store.write_multi(&entries, &WriteOptions::default())?);
		assert!(store.exists("a")?);
		assert!(!store.exists("c")?);

		let read = store.read_multi(&["a", "c"])?;
		assert_eq!(read.len(), 2);
		assert_eq!(read["a"], Entry::Present(Blob::from("1")));
		assert_eq!(read["c"], Entry::Absent);

		assert_eq!(store.delete_multi(&["a", "b", "c"])?, 2);
		assert!(!store.exists("b")?);
		Ok(())
	}

	#[test]
	fn write_multi_reports_partial_refusal() -> Result<()> {
		let store = RecordingStore::memory();
		store.write("a", &Blob::from("old"), &WriteOptions::default())?;
		let entries = [("a", Blob::from("new")), ("b", Blob::from("2"))];
		assert!(!store.write_multi(&entries, &WriteOptions::unless_exist())?);
		assert_eq!(store.read("a")?, Entry::Present(Blob::from("old")));
		assert_eq!(store.read("b")?, Entry::Present(Blob::from("2")));
		Ok(())
	}

	#[test]
	#[should_panic(expected = "omitted key \"name\"")]
	fn assert_total_catches_dropped_keys() {
		let store = LossyStore;
		let entries = store.read_multi(&["name"]).unwrap();
		assert_total(&store, &["name"], &entries);
	}
}
