//! Typed views over model nodes.
//!
//! A [`ModelView`] binds a [`ModelType`] to the instance currently held by a
//! model node. Rules receive views from a [`ModelRegistry`], read them through
//! [`ModelView::model_type`] and [`ModelView::instance`], and dispose of them
//! with [`ModelView::close`] (or by dropping them).

/// Registry configuration.
pub mod config;
/// Error types.
pub mod error;
/// Exclusive node leases.
pub mod lease;
/// Dotted node addresses.
pub mod path;
/// Node registry.
pub mod registry;
/// Typed views.
pub mod view;

pub use config::RegistryConfig;
pub use error::{ConfigError, ModelError};
pub use lease::NodeLease;
pub use modelkit_type::{ModelType, ParseError, Reified, TypeDescriptor};
pub use path::{ModelPath, PathError};
pub use registry::ModelRegistry;
pub use view::{ModelView, ViewAccess};
