use super::{MemoryStore, NullStore, Store, WriteOptions};
use crate::{
	Blob, Entry,
	config::{StoreConfig, StoreType},
};
use anyhow::Result;
use regex::Regex;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// The backend behind a cache handle, picked once when the handle is built.
pub enum Backend {
	Null(NullStore),
	Memory(MemoryStore),
	Custom(Arc<dyn Store>),
}

impl Backend {
	#[must_use]
	pub fn new(config: &StoreConfig) -> Self {
		match config.store_type {
			StoreType::Null => Self::Null(NullStore::new()),
			StoreType::Memory => Self::Memory(MemoryStore::new()),
		}
	}

	#[must_use]
	pub fn custom(store: impl Store + 'static) -> Self {
		Self::Custom(Arc::new(store))
	}

	fn store(&self) -> &dyn Store {
		match self {
			Self::Null(store) => store,
			Self::Memory(store) => store,
			Self::Custom(store) => store.as_ref(),
		}
	}
}

impl Store for Backend {
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool> {
		self.store().write(key, value, options)
	}

	fn read(&self, key: &str) -> Result<Entry> {
		self.store().read(key)
	}

	fn delete(&self, key: &str) -> Result<bool> {
		self.store().delete(key)
	}

	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()> {
		self.store().delete_matched_under(prefix, pattern)
	}

	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.store().increment(key, amount)
	}

	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.store().decrement(key, amount)
	}

	fn clear(&self) -> Result<()> {
		self.store().clear()
	}

	fn cleanup(&self) -> Result<()> {
		self.store().cleanup()
	}

	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		self.store().read_multi(keys)
	}

	fn exists(&self, key: &str) -> Result<bool> {
		self.store().exists(key)
	}

	fn write_multi(&self, entries: &[(&str, Blob)], options: &WriteOptions) -> Result<bool> {
		self.store().write_multi(entries, options)
	}

	fn delete_multi(&self, keys: &[&str]) -> Result<usize> {
		self.store().delete_multi(keys)
	}
}

impl Debug for Backend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Null(store) => write!(f, "Backend::Null({store:?})"),
			Self::Memory(_) => write!(f, "Backend::Memory"),
			Self::Custom(store) => write!(f, "Backend::Custom({store:?})"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_utils::RecordingStore;
	use rstest::rstest;

	#[rstest]
	#[case::null(StoreType::Null, false)]
	#[case::memory(StoreType::Memory, true)]
	fn config_selects_variant(#[case] store_type: StoreType, #[case] retains: bool) -> Result<()> {
		let backend = Backend::new(&StoreConfig {
			store_type,
			namespace: None,
		});
		assert!(backend.write("k", &Blob::from("v"), &WriteOptions::default())?);
		assert_eq!(backend.read("k")?.is_present(), retains);
		assert_eq!(backend.delete("k")?, retains);
		Ok(())
	}

	#[test]
	fn custom_store_receives_calls() -> Result<()> {
		let recording = RecordingStore::memory();
		let calls = recording.calls();
		let backend = Backend::custom(recording);
		backend.write("k", &Blob::from("v"), &WriteOptions::default())?;
		backend.read("k")?;
		backend.read_multi(&["k", "j"])?;
		assert_eq!(calls.count("write"), 1);
		assert_eq!(calls.count("read"), 1);
		assert_eq!(calls.count("read_multi"), 1);
		Ok(())
	}

	#[test]
	fn debug_names_variant() {
		assert_eq!(format!("{:?}", Backend::Null(NullStore)), "Backend::Null(NullStore)");
		assert_eq!(format!("{:?}", Backend::Memory(MemoryStore::new())), "Backend::Memory");
	}
}
