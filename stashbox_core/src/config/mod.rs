//! Configuration of cache handles.
//!
//! [`StoreConfig::from_env`] reads `STASHBOX_STORE` (a [`StoreType`] name) and
//! `STASHBOX_NAMESPACE`. Unset variables fall back to the defaults.

pub use crate::config::store_type::StoreType;
use anyhow::{Context, Result};
mod store_type;

pub const ENV_STORE: &str = "STASHBOX_STORE";
pub const ENV_NAMESPACE: &str = "STASHBOX_NAMESPACE";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
	pub store_type: StoreType,
	/// Prefix applied to every key. `None` uses the global key space.
	pub namespace: Option<String>,
}

impl StoreConfig {
	#[must_use]
	pub fn new(store_type: StoreType) -> Self {
		Self {
			store_type,
			namespace: None,
		}
	}

	#[must_use]
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Builds a config from any variable source, e.g. a map in tests.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let store_type = match lookup(ENV_STORE) {
			Some(name) => name.parse::<StoreType>().with_context(|| format!("invalid {ENV_STORE}"))?,
			None => StoreType::default(),
		};
		let namespace = lookup(ENV_NAMESPACE).filter(|ns| !ns.is_empty());
		Ok(Self { store_type, namespace })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
		let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn defaults_without_variables() -> Result<()> {
		assert_eq!(StoreConfig::from_lookup(lookup(&[]))?, StoreConfig::default());
		Ok(())
	}

	#[test]
	fn reads_store_and_namespace() -> Result<()> {
		let config = StoreConfig::from_lookup(lookup(&[(ENV_STORE, "null_store"), (ENV_NAMESPACE, "app")]))?;
		assert_eq!(config, StoreConfig::new(StoreType::Null).with_namespace("app"));
		Ok(())
	}

	#[test]
	fn empty_namespace_means_global() -> Result<()> {
		let config = StoreConfig::from_lookup(lookup(&[(ENV_NAMESPACE, "")]))?;
		assert_eq!(config.namespace, None);
		Ok(())
	}

	#[test]
	fn invalid_store_names_the_variable() {
		let err = StoreConfig::from_lookup(lookup(&[(ENV_STORE, "disk")])).unwrap_err();
		assert_eq!(err.to_string(), "invalid STASHBOX_STORE");
	}
}
