//! Reified type descriptors for model nodes.
//!
//! A [`TypeDescriptor`] names a base type plus an ordered list of type
//! parameters, and compares structurally. [`ModelType<T>`] is the same
//! descriptor tagged with the Rust type it stands for, so typed views can
//! return the descriptor they were built with without any runtime
//! introspection of the instance.

/// Untyped structural descriptors.
pub mod descriptor;
/// Typed descriptors and the [`Reified`] trait.
pub mod model_type;
/// Textual descriptor syntax.
pub mod parse;

pub use descriptor::TypeDescriptor;
pub use model_type::{ModelType, Reified};
pub use parse::{MAX_DEPTH, ParseError};
