//! Exclusive write leases on model nodes.
//!
//! # Invariants
//!
//! - At most one [`NodeLease`] exists per node at any time.
//! - Dropping a lease releases it and wakes one waiter.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::ModelError;
use crate::path::ModelPath;

/// Per-node lease state, shared between the node and its outstanding lease.
#[derive(Default)]
pub(crate) struct LeaseSlot {
	held: Mutex<bool>,
	released: Condvar,
}

impl LeaseSlot {
	/// Blocks until the lease is free or `timeout` elapses.
	pub(crate) fn acquire(
		self: &Arc<Self>,
		path: &ModelPath,
		timeout: Duration,
		warn_on_implicit_release: bool,
	) -> Result<NodeLease, ModelError> {
		let deadline = Instant::now() + timeout;
		let mut held = self.held.lock();
		while *held {
			if self.released.wait_until(&mut held, deadline).timed_out() && *held {
				tracing::debug!(path = %path, ?timeout, "model.lease.timeout");
				return Err(ModelError::LeaseTimeout {
					path: path.clone(),
					timeout,
				});
			}
		}
		*held = true;
		tracing::trace!(path = %path, "model.lease.acquire");
		Ok(NodeLease {
			slot: Arc::clone(self),
			path: path.clone(),
			warn_on_implicit_release,
		})
	}

	pub(crate) fn is_held(&self) -> bool {
		*self.held.lock()
	}

	fn release(&self) {
		*self.held.lock() = false;
		self.released.notify_one();
	}
}

/// Exclusive right to replace a node's value.
///
/// Held by write-locked views and released when the view is closed.
pub struct NodeLease {
	slot: Arc<LeaseSlot>,
	path: ModelPath,
	warn_on_implicit_release: bool,
}

impl NodeLease {
	/// Returns the path of the leased node.
	pub fn path(&self) -> &ModelPath {
		&self.path
	}

	pub(crate) fn is_for(&self, slot: &Arc<LeaseSlot>) -> bool {
		Arc::ptr_eq(&self.slot, slot)
	}

	pub(crate) fn warns_on_implicit_release(&self) -> bool {
		self.warn_on_implicit_release
	}
}

impl Drop for NodeLease {
	fn drop(&mut self) {
		self.slot.release();
		tracing::trace!(path = %self.path, "model.lease.release");
	}
}

impl fmt::Debug for NodeLease {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NodeLease").field("path", &self.path).finish()
	}
}
