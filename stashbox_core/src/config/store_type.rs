//! Defines the store type backing a cache handle.
//!
//! The set of built-in backends is closed: a [`StoreType`] is picked once,
//! typically from configuration, and turned into a
//! [`Backend`](crate::store::Backend) when the handle is built.

use anyhow::{Result, bail};
use std::{fmt, str::FromStr};

/// Selects one of the built-in backends.
///
/// - `Null` keeps nothing: useful for switching caching off.
/// - `Memory` keeps entries in a process-local map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreType {
	Null,
	#[default]
	Memory,
}

impl StoreType {
	#[must_use]
	pub fn name(self) -> &'static str {
		match self {
			StoreType::Null => "null",
			StoreType::Memory => "memory",
		}
	}
}

impl FromStr for StoreType {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self> {
		Ok(match s.trim().to_ascii_lowercase().as_str() {
			"null" | "null_store" => StoreType::Null,
			"memory" | "memory_store" => StoreType::Memory,
			other => bail!("unknown store type {other:?}, expected one of: null, null_store, memory, memory_store"),
		})
	}
}

impl fmt::Display for StoreType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("null", StoreType::Null)]
	#[case("null_store", StoreType::Null)]
	#[case(" NULL ", StoreType::Null)]
	#[case("memory", StoreType::Memory)]
	#[case("Memory_Store", StoreType::Memory)]
	fn parses_names(#[case] input: &str, #[case] expected: StoreType) {
		assert_eq!(input.parse::<StoreType>().unwrap(), expected);
	}

	#[test]
	fn rejects_unknown_names() {
		let err = "redis".parse::<StoreType>().unwrap_err();
		assert!(err.to_string().starts_with("unknown store type \"redis\""), "{err}");
	}

	#[test]
	fn display_roundtrips() {
		for store_type in [StoreType::Null, StoreType::Memory] {
			assert_eq!(store_type.to_string().parse::<StoreType>().unwrap(), store_type);
		}
		assert_eq!(StoreType::default(), StoreType::Memory);
	}
}
