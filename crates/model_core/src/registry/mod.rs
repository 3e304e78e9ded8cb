//! Model node registry with atomic publication.
//!
//! # Role
//!
//! Owns the model nodes and hands out [`ModelView`]s over them. Every
//! consistency check a view relies on happens here, before construction:
//! the requested descriptor must equal the node's declared descriptor, and
//! the stored value must downcast to the requested Rust type.
//!
//! # Invariants
//!
//! - The node table is replaced wholesale with CAS; readers never block.
//! - A write-locked view holds the node's lease until disposed.
//! - A view keeps the instance it was built with even if the node is
//!   replaced afterwards.

use std::any::{Any, type_name};
use std::sync::Arc;

use arc_swap::ArcSwap;
use modelkit_type::{ModelType, Reified, TypeDescriptor};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::RegistryConfig;
use crate::error::ModelError;
use crate::lease::LeaseSlot;
use crate::path::ModelPath;
use crate::view::ModelView;

type NodeValue = Arc<dyn Any + Send + Sync>;
type NodeTable = FxHashMap<ModelPath, Arc<ModelNode>>;

struct ModelNode {
	descriptor: TypeDescriptor,
	value: RwLock<Option<NodeValue>>,
	lease: Arc<LeaseSlot>,
}

/// Registry of typed model nodes.
pub struct ModelRegistry {
	config: RegistryConfig,
	nodes: ArcSwap<NodeTable>,
}

impl Default for ModelRegistry {
	fn default() -> Self {
		Self::new(RegistryConfig::default())
	}
}

impl ModelRegistry {
	pub fn new(config: RegistryConfig) -> Self {
		Self {
			config,
			nodes: ArcSwap::from_pointee(NodeTable::default()),
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Registers a node whose descriptor is derived from `T`.
	pub fn register<T>(&self, path: &ModelPath, initial: Option<T>) -> Result<(), ModelError>
	where
		T: Reified + Send + Sync + 'static,
	{
		self.register_as(path, ModelType::<T>::of(), initial)
	}

	/// Registers a node with an explicit descriptor.
	///
	/// Fails with [`ModelError::DuplicatePath`] if `path` is taken.
	pub fn register_as<T>(
		&self,
		path: &ModelPath,
		model_type: ModelType<T>,
		initial: Option<T>,
	) -> Result<(), ModelError>
	where
		T: Send + Sync + 'static,
	{
		let node = Arc::new(ModelNode {
			descriptor: model_type.erase(),
			value: RwLock::new(initial.map(|v| Arc::new(v) as NodeValue)),
			lease: Arc::new(LeaseSlot::default()),
		});

		loop {
			let old = self.nodes.load_full();
			if old.contains_key(path) {
				return Err(ModelError::DuplicatePath { path: path.clone() });
			}
			let mut table = NodeTable::clone(&old);
			table.insert(path.clone(), Arc::clone(&node));

			let prev = self.nodes.compare_and_swap(&old, Arc::new(table));
			if Arc::ptr_eq(&prev, &old) {
				tracing::debug!(
					path = %path,
					model_type = %node.descriptor,
					"model.node.register"
				);
				return Ok(());
			}
		}
	}

	/// Returns the declared descriptor of the node at `path`.
	pub fn descriptor(&self, path: &ModelPath) -> Option<TypeDescriptor> {
		self.nodes
			.load()
			.get(path)
			.map(|node| node.descriptor.clone())
	}

	pub fn contains(&self, path: &ModelPath) -> bool {
		self.nodes.load().contains_key(path)
	}

	/// Returns all registered paths in sorted order.
	pub fn paths(&self) -> Vec<ModelPath> {
		let mut paths: Vec<_> = self.nodes.load().keys().cloned().collect();
		paths.sort_unstable();
		paths
	}

	pub fn len(&self) -> usize {
		self.nodes.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns `true` while a write-locked view over `path` is open.
	pub fn is_leased(&self, path: &ModelPath) -> Result<bool, ModelError> {
		Ok(self.node(path)?.lease.is_held())
	}

	/// Builds a read-only view of the node at `path`.
	pub fn read<T>(
		&self,
		path: &ModelPath,
		model_type: &ModelType<T>,
	) -> Result<ModelView<T>, ModelError>
	where
		T: Send + Sync + 'static,
	{
		let node = self.node(path)?;
		let instance = Self::instance(path, &node, model_type)?;
		tracing::trace!(path = %path, model_type = %model_type, "model.view.read");
		Ok(ModelView::new(model_type.clone(), instance))
	}

	/// Builds a write-locked view of the node at `path`.
	///
	/// Blocks until no other write-locked view of the node is open, for at
	/// most [`RegistryConfig::lease_timeout`].
	pub fn write<T>(
		&self,
		path: &ModelPath,
		model_type: &ModelType<T>,
	) -> Result<ModelView<T>, ModelError>
	where
		T: Send + Sync + 'static,
	{
		let node = self.node(path)?;
		Self::check_descriptor(path, &node, model_type)?;
		let lease = node.lease.acquire(
			path,
			self.config.lease_timeout(),
			self.config.warn_on_implicit_release,
		)?;
		let instance = Self::instance(path, &node, model_type)?;
		tracing::trace!(path = %path, model_type = %model_type, "model.view.write");
		Ok(ModelView::write_locked(model_type.clone(), instance, lease))
	}

	/// Publishes `value` through an open write-locked view.
	///
	/// Returns the previous instance. The view keeps the instance it was
	/// built with.
	pub fn replace<T>(
		&self,
		view: &ModelView<T>,
		value: Option<T>,
	) -> Result<Option<Arc<T>>, ModelError>
	where
		T: Send + Sync + 'static,
	{
		let Some(lease) = view.lease() else {
			return Err(ModelError::NotLeased);
		};
		let path = lease.path();
		let node = self.node(path)?;
		if !lease.is_for(&node.lease) {
			return Err(ModelError::ForeignLease { path: path.clone() });
		}
		Self::check_descriptor(path, &node, view.model_type())?;

		let mut slot = node.value.write();
		let old = slot
			.clone()
			.map(|old| Self::downcast(path, old))
			.transpose()?;
		*slot = value.map(|v| Arc::new(v) as NodeValue);
		drop(slot);
		tracing::debug!(path = %path, "model.node.replace");
		Ok(old)
	}

	/// Runs `f` with a read-only view and closes it afterwards.
	pub fn with_read<T, R>(
		&self,
		path: &ModelPath,
		model_type: &ModelType<T>,
		f: impl FnOnce(&ModelView<T>) -> R,
	) -> Result<R, ModelError>
	where
		T: Send + Sync + 'static,
	{
		let mut view = self.read(path, model_type)?;
		let out = f(&view);
		view.close();
		Ok(out)
	}

	/// Runs `f` with a write-locked view and closes it afterwards.
	///
	/// The lease is released even if `f` panics.
	pub fn with_write<T, R>(
		&self,
		path: &ModelPath,
		model_type: &ModelType<T>,
		f: impl FnOnce(&ModelView<T>) -> R,
	) -> Result<R, ModelError>
	where
		T: Send + Sync + 'static,
	{
		let mut view = self.write(path, model_type)?;
		let out = f(&view);
		view.close();
		Ok(out)
	}

	fn node(&self, path: &ModelPath) -> Result<Arc<ModelNode>, ModelError> {
		self.nodes
			.load()
			.get(path)
			.cloned()
			.ok_or_else(|| ModelError::UnknownPath { path: path.clone() })
	}

	fn check_descriptor<T>(
		path: &ModelPath,
		node: &ModelNode,
		model_type: &ModelType<T>,
	) -> Result<(), ModelError> {
		if *model_type == node.descriptor {
			Ok(())
		} else {
			Err(ModelError::TypeMismatch {
				path: path.clone(),
				expected: model_type.descriptor().clone(),
				actual: node.descriptor.clone(),
			})
		}
	}

	fn instance<T>(
		path: &ModelPath,
		node: &ModelNode,
		model_type: &ModelType<T>,
	) -> Result<Option<Arc<T>>, ModelError>
	where
		T: Send + Sync + 'static,
	{
		Self::check_descriptor(path, node, model_type)?;
		let value = node.value.read().clone();
		value.map(|value| Self::downcast(path, value)).transpose()
	}

	fn downcast<T>(path: &ModelPath, value: NodeValue) -> Result<Arc<T>, ModelError>
	where
		T: Send + Sync + 'static,
	{
		value.downcast::<T>().map_err(|_| ModelError::InstanceType {
			path: path.clone(),
			requested: type_name::<T>(),
		})
	}
}
