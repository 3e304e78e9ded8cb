use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::TypeDescriptor;

/// Types with a statically known descriptor.
///
/// Implementations must return structurally equal descriptors for the same
/// Rust type on every call.
pub trait Reified {
	/// Returns the descriptor for `Self`.
	fn descriptor() -> TypeDescriptor;
}

/// A [`TypeDescriptor`] tagged with the Rust type it describes.
pub struct ModelType<T> {
	descriptor: TypeDescriptor,
	_marker: PhantomData<fn() -> T>,
}

impl<T: Reified> ModelType<T> {
	/// Returns the descriptor for `T`.
	pub fn of() -> Self {
		Self::from_descriptor_unchecked(T::descriptor())
	}
}

impl<T> ModelType<T> {
	/// Tags `descriptor` as describing `T` without checking.
	///
	/// The caller guarantees that values of `T` conform to `descriptor`.
	pub fn from_descriptor_unchecked(descriptor: TypeDescriptor) -> Self {
		Self {
			descriptor,
			_marker: PhantomData,
		}
	}

	/// Returns the untyped descriptor.
	pub fn descriptor(&self) -> &TypeDescriptor {
		&self.descriptor
	}

	/// Drops the type tag.
	pub fn erase(self) -> TypeDescriptor {
		self.descriptor
	}
}

impl TypeDescriptor {
	/// Returns a typed descriptor if `self` equals the descriptor of `T`.
	pub fn downcast<T: Reified>(&self) -> Option<ModelType<T>> {
		(*self == T::descriptor()).then(|| ModelType::from_descriptor_unchecked(self.clone()))
	}
}

impl<T> Clone for ModelType<T> {
	fn clone(&self) -> Self {
		Self::from_descriptor_unchecked(self.descriptor.clone())
	}
}

impl<T> PartialEq for ModelType<T> {
	fn eq(&self, other: &Self) -> bool {
		self.descriptor == other.descriptor
	}
}

impl<T> Eq for ModelType<T> {}

impl<T> PartialEq<TypeDescriptor> for ModelType<T> {
	fn eq(&self, other: &TypeDescriptor) -> bool {
		self.descriptor == *other
	}
}

impl<T> Hash for ModelType<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.descriptor.hash(state);
	}
}

impl<T> fmt::Display for ModelType<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.descriptor, f)
	}
}

impl<T> fmt::Debug for ModelType<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModelType({})", self.descriptor)
	}
}

impl<T> From<ModelType<T>> for TypeDescriptor {
	fn from(ty: ModelType<T>) -> Self {
		ty.erase()
	}
}

macro_rules! reified_named {
	($($ty:ty => $name:literal),* $(,)?) => {
		$(
			impl Reified for $ty {
				fn descriptor() -> TypeDescriptor {
					TypeDescriptor::named($name)
				}
			}
		)*
	};
}

reified_named! {
	bool => "bool",
	char => "char",
	i8 => "i8",
	i16 => "i16",
	i32 => "i32",
	i64 => "i64",
	i128 => "i128",
	isize => "isize",
	u8 => "u8",
	u16 => "u16",
	u32 => "u32",
	u64 => "u64",
	u128 => "u128",
	usize => "usize",
	f32 => "f32",
	f64 => "f64",
	String => "String",
	() => "Unit",
}

impl<T: Reified> Reified for Vec<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::generic("List", [T::descriptor()])
	}
}

impl<T: Reified> Reified for Option<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::generic("Optional", [T::descriptor()])
	}
}

impl<T: Reified, S> Reified for HashSet<T, S> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::generic("Set", [T::descriptor()])
	}
}

impl<T: Reified> Reified for BTreeSet<T> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::generic("Set", [T::descriptor()])
	}
}

impl<K: Reified, V: Reified, S> Reified for HashMap<K, V, S> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::generic("Map", [K::descriptor(), V::descriptor()])
	}
}

impl<K: Reified, V: Reified> Reified for BTreeMap<K, V> {
	fn descriptor() -> TypeDescriptor {
		TypeDescriptor::generic("Map", [K::descriptor(), V::descriptor()])
	}
}

#[cfg(test)]
mod tests {
	use std::collections::{BTreeMap, HashMap};

	use super::*;

	#[test]
	fn nested_generics_describe_structure() {
		let ty = ModelType::<HashMap<String, Vec<i64>>>::of();
		assert_eq!(ty.to_string(), "Map<String, List<i64>>");
		assert_eq!(ty.descriptor().params().len(), 2);
		assert_eq!(ty.descriptor().params()[1].base(), "List");
	}

	#[test]
	fn map_kinds_share_descriptor() {
		assert_eq!(
			<HashMap<String, u8>>::descriptor(),
			<BTreeMap<String, u8>>::descriptor()
		);
	}

	#[test]
	fn downcast_requires_exact_match() {
		let list = TypeDescriptor::generic("List", [TypeDescriptor::named("String")]);
		assert!(list.downcast::<Vec<String>>().is_some());
		assert!(list.downcast::<Vec<i64>>().is_none());
		assert!(list.raw().downcast::<Vec<String>>().is_none());
	}

	#[test]
	fn typed_and_untyped_compare() {
		let ty = ModelType::<Option<bool>>::of();
		assert_eq!(ty, "Optional<bool>".parse::<TypeDescriptor>().unwrap());
		assert_eq!(ty.clone().erase(), *ty.descriptor());
	}
}
