//! This module provides the [`Blob`] struct, the opaque value type stored by every cache backend.
//!
//! A `Blob` is an owned byte buffer. Stores never look inside it, except for raw numeric values
//! that can be incremented (see [`Store::increment`](crate::Store::increment)).
//!
//! # Examples
//!
//! ```rust
//! use stashbox_core::Blob;
//!
//! let blob = Blob::from("value");
//! assert_eq!(blob.len(), 5);
//! assert_eq!(blob.to_str().unwrap(), "value");
//! assert_eq!(blob.into_vec(), b"value".to_vec());
//! ```

use anyhow::{Result, anyhow};
use std::fmt::Debug;

/// An owned, immutable byte buffer.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// Creates an empty `Blob`.
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		self.0.as_ref()
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Returns the content as UTF-8 text.
	///
	/// # Errors
	///
	/// Returns an error if the bytes are not valid UTF-8.
	pub fn to_str(&self) -> Result<&str> {
		std::str::from_utf8(&self.0).map_err(|e| anyhow!("blob is not valid UTF-8: {e}"))
	}

	/// Returns the content as lowercase hex bytes separated by spaces.
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(item: &str) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<&String> for Blob {
	fn from(item: &String) -> Self {
		Blob(item.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(item: String) -> Self {
		Blob(item.into_bytes())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
	}
}

impl std::fmt::Display for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", String::from_utf8_lossy(&self.0))
	}
}
