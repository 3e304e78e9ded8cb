use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for [`crate::ModelRegistry`].
///
/// ```toml
/// lease_timeout_ms = 250
/// warn_on_implicit_release = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Upper bound on waiting for a node's write lease.
	pub lease_timeout_ms: u64,
	/// Log a warning when a write-locked view is dropped without `close()`.
	pub warn_on_implicit_release: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			lease_timeout_ms: 5_000,
			warn_on_implicit_release: true,
		}
	}
}

impl RegistryConfig {
	/// Parses a config from TOML text. Missing keys take their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	/// Reads and parses a TOML config file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path)?;
		Self::from_toml_str(&text)
	}

	pub fn lease_timeout(&self) -> Duration {
		Duration::from_millis(self.lease_timeout_ms)
	}
}
