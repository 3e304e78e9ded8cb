use std::time::Duration;

use modelkit_type::{ParseError, TypeDescriptor};

use crate::path::{ModelPath, PathError};

/// Errors reported by [`crate::ModelRegistry`].
///
/// Views themselves never fail; every consistency check happens in the
/// registry before a view is built.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
	/// No node is registered at `path`.
	#[error("no model node at '{path}'")]
	UnknownPath { path: ModelPath },

	/// A node is already registered at `path`.
	#[error("model node '{path}' is already registered")]
	DuplicatePath { path: ModelPath },

	/// The requested descriptor differs from the node's declared descriptor.
	#[error("model node '{path}' has type {actual}, requested {expected}")]
	TypeMismatch {
		path: ModelPath,
		expected: TypeDescriptor,
		actual: TypeDescriptor,
	},

	/// The descriptors match but the stored value is not a `requested`.
	#[error("model node '{path}' does not hold a value of Rust type {requested}")]
	InstanceType {
		path: ModelPath,
		requested: &'static str,
	},

	/// The node lease was not released within `timeout`.
	#[error("timed out after {timeout:?} waiting for write access to '{path}'")]
	LeaseTimeout { path: ModelPath, timeout: Duration },

	/// The view is read-only or has already been closed.
	#[error("view does not hold a write lease")]
	NotLeased,

	/// The view's lease was issued for a node of another registry.
	#[error("write lease for '{path}' was issued by another registry")]
	ForeignLease { path: ModelPath },

	#[error(transparent)]
	InvalidPath(#[from] PathError),

	#[error("invalid type descriptor: {0}")]
	Descriptor(#[from] ParseError),
}

/// Errors loading a [`crate::RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read registry config: {0}")]
	Io(#[from] std::io::Error),

	#[error("failed to parse registry config: {0}")]
	Parse(#[from] toml::de::Error),
}
