//! Typed views over model node instances.
//!
//! # Role
//!
//! A [`ModelView`] pairs a [`ModelType<T>`] with the instance a node held
//! when the view was built. The pair is fixed at construction: accessors are
//! pure reads and may be called from any thread.
//!
//! # Invariants
//!
//! - The instance, if present, conforms to the descriptor. The constructor
//!   trusts the caller and never checks this.
//! - Disposal runs at most once. [`ModelView::close`] performs it explicitly;
//!   `Drop` performs it for views that were never closed.

use std::fmt;
use std::sync::Arc;

use modelkit_type::ModelType;

use crate::lease::NodeLease;

/// Disposal variant of a [`ModelView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewAccess {
	/// Disposal does nothing.
	ReadOnly,
	/// Disposal releases the node's write lease.
	WriteLocked,
}

enum Access {
	ReadOnly,
	WriteLocked(Option<NodeLease>),
}

/// Immutable binding of a type descriptor to a node instance.
pub struct ModelView<T> {
	model_type: ModelType<T>,
	instance: Option<Arc<T>>,
	access: Access,
}

impl<T> ModelView<T> {
	/// Creates a read-only view. `instance` must conform to `model_type`.
	pub fn new(model_type: ModelType<T>, instance: Option<Arc<T>>) -> Self {
		Self {
			model_type,
			instance,
			access: Access::ReadOnly,
		}
	}

	/// Same as [`ModelView::new`].
	pub fn of(model_type: ModelType<T>, instance: Option<Arc<T>>) -> Self {
		Self::new(model_type, instance)
	}

	/// Creates a view that releases `lease` on disposal.
	pub fn write_locked(
		model_type: ModelType<T>,
		instance: Option<Arc<T>>,
		lease: NodeLease,
	) -> Self {
		Self {
			model_type,
			instance,
			access: Access::WriteLocked(Some(lease)),
		}
	}

	/// Returns the descriptor the view was built with.
	pub fn model_type(&self) -> &ModelType<T> {
		&self.model_type
	}

	/// Returns the instance the view was built with, `None` for an unset node.
	pub fn instance(&self) -> Option<&Arc<T>> {
		self.instance.as_ref()
	}

	/// Borrows the instance.
	pub fn get(&self) -> Option<&T> {
		self.instance.as_deref()
	}

	/// Returns which disposal variant this view carries.
	pub fn access(&self) -> ViewAccess {
		match self.access {
			Access::ReadOnly => ViewAccess::ReadOnly,
			Access::WriteLocked(_) => ViewAccess::WriteLocked,
		}
	}

	/// Returns the lease held by an open write-locked view.
	pub fn lease(&self) -> Option<&NodeLease> {
		match &self.access {
			Access::WriteLocked(lease) => lease.as_ref(),
			Access::ReadOnly => None,
		}
	}

	/// Returns `true` once a write-locked view has released its lease.
	///
	/// Read-only views have nothing to release and always report `false`.
	pub fn is_closed(&self) -> bool {
		matches!(self.access, Access::WriteLocked(None))
	}

	/// Disposes of the view.
	///
	/// Read-only views do nothing. Write-locked views release their lease on
	/// the first call; later calls do nothing. Accessors stay usable either
	/// way, but the instance may be replaced in the registry once released.
	pub fn close(&mut self) {
		if let Access::WriteLocked(lease) = &mut self.access
			&& let Some(lease) = lease.take()
		{
			tracing::trace!(path = %lease.path(), "model.view.close");
			drop(lease);
		}
	}
}

impl<T> Drop for ModelView<T> {
	fn drop(&mut self) {
		if let Some(lease) = self.lease()
			&& lease.warns_on_implicit_release()
		{
			tracing::warn!(
				path = %lease.path(),
				model_type = %self.model_type,
				"write-locked model view dropped without close"
			);
		}
		self.close();
	}
}

impl<T: fmt::Debug> fmt::Debug for ModelView<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModelView")
			.field("model_type", &self.model_type)
			.field("instance", &self.instance)
			.field("access", &self.access())
			.field("closed", &self.is_closed())
			.finish()
	}
}

#[cfg(test)]
mod tests;
