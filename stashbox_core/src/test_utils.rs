//! Instrumented stores for unit tests.

use crate::{Blob, Entry, MemoryStore, NullStore, Store, WriteOptions};
use anyhow::{Result, bail};
use parking_lot::Mutex;
use regex::Regex;
use std::{
	collections::HashMap,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

/// Shared log of the calls a [`RecordingStore`] received.
#[derive(Clone, Debug, Default)]
pub struct Calls {
	log: Arc<Mutex<Vec<(&'static str, String)>>>,
	failing: Arc<AtomicBool>,
}

impl Calls {
	fn record(&self, operation: &'static str, key: &str) -> Result<()> {
		self.log.lock().push((operation, key.to_string()));
		if self.failing.load(Ordering::SeqCst) {
			bail!("backend unavailable during {operation}");
		}
		Ok(())
	}

	pub fn count(&self, operation: &str) -> usize {
		self.log.lock().iter().filter(|(op, _)| *op == operation).count()
	}

	/// Keys passed to `operation`, in call order. `read_multi` keys are comma-joined.
	pub fn keys(&self, operation: &str) -> Vec<String> {
		self
			.log
			.lock()
			.iter()
			.filter(|(op, _)| *op == operation)
			.map(|(_, key)| key.clone())
			.collect()
	}

	/// Makes every following call fail until switched off again.
	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}
}

/// Wraps a real store and records every call made to it.
#[derive(Debug)]
pub struct RecordingStore {
	inner: Box<dyn Store>,
	calls: Calls,
}

impl RecordingStore {
	pub fn new(inner: impl Store + 'static) -> Self {
		Self {
			inner: Box::new(inner),
			calls: Calls::default(),
		}
	}

	pub fn null() -> Self {
		Self::new(NullStore::new())
	}

	pub fn memory() -> Self {
		Self::new(MemoryStore::new())
	}

	pub fn calls(&self) -> Calls {
		self.calls.clone()
	}
}

impl Store for RecordingStore {
	fn write(&self, key: &str, value: &Blob, options: &WriteOptions) -> Result<bool> {
		self.calls.record("write", key)?;
		self.inner.write(key, value, options)
	}

	fn read(&self, key: &str) -> Result<Entry> {
		self.calls.record("read", key)?;
		self.inner.read(key)
	}

	fn delete(&self, key: &str) -> Result<bool> {
		self.calls.record("delete", key)?;
		self.inner.delete(key)
	}

	fn delete_matched_under(&self, prefix: &str, pattern: &Regex) -> Result<()> {
		self.calls.record("delete_matched", &format!("{prefix}{}", pattern.as_str()))?;
		self.inner.delete_matched_under(prefix, pattern)
	}

	fn increment(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.calls.record("increment", key)?;
		self.inner.increment(key, amount)
	}

	fn decrement(&self, key: &str, amount: i64) -> Result<Option<i64>> {
		self.calls.record("decrement", key)?;
		self.inner.decrement(key, amount)
	}

	fn clear(&self) -> Result<()> {
		self.calls.record("clear", "")?;
		self.inner.clear()
	}

	fn cleanup(&self) -> Result<()> {
		self.calls.record("cleanup", "")?;
		self.inner.cleanup()
	}

	fn read_multi(&self, keys: &[&str]) -> Result<HashMap<String, Entry>> {
		self.calls.record("read_multi", &keys.join(","))?;
		self.inner.read_multi(keys)
	}
}
