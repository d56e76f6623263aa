use crate::Entry;
use std::collections::HashMap;

/// The per-scope map behind a local overlay.
///
/// Keys are fully qualified (namespace already applied). A missing key means
/// "never looked up in this scope", while [`Entry::Absent`] means "known to be
/// missing".
#[derive(Debug, Default)]
pub struct LocalCache {
	entries: HashMap<String, Entry>,
}

impl LocalCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn read_entry(&self, key: &str) -> Option<Entry> {
		self.entries.get(key).cloned()
	}

	pub fn write_entry(&mut self, key: &str, entry: Entry) {
		self.entries.insert(key.to_string(), entry);
	}

	/// Forgets everything known about `key`.
	pub fn invalidate(&mut self, key: &str) {
		self.entries.remove(key);
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
