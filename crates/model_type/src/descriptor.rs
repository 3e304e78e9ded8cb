use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::parse::{self, ParseError};

/// Structural stand-in for a (possibly generic) type.
///
/// Two descriptors are equal when their base names are equal and their
/// parameter lists are pairwise equal, in order. Cloning is cheap: both
/// the base name and the parameter list are reference counted.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeDescriptor {
	base: Arc<str>,
	params: Arc<[TypeDescriptor]>,
}

impl TypeDescriptor {
	/// Creates a descriptor for a non-generic type.
	///
	/// The name is not validated, so the [`fmt::Display`] form of a
	/// descriptor with an unusual name may not parse back. Use
	/// [`TypeDescriptor::try_named`] or [`str::parse`] for untrusted input.
	pub fn named(base: impl Into<Arc<str>>) -> Self {
		Self {
			base: base.into(),
			params: Arc::from([]),
		}
	}

	/// Creates a descriptor for a generic type applied to `params`.
	pub fn generic(
		base: impl Into<Arc<str>>,
		params: impl IntoIterator<Item = TypeDescriptor>,
	) -> Self {
		Self {
			base: base.into(),
			params: params.into_iter().collect(),
		}
	}

	/// Like [`TypeDescriptor::named`], but rejects names the parser would not
	/// accept.
	pub fn try_named(base: impl Into<Arc<str>>) -> Result<Self, ParseError> {
		let base = base.into();
		parse::check_name(&base)?;
		Ok(Self::named(base))
	}

	/// Like [`TypeDescriptor::generic`], but rejects names the parser would
	/// not accept. Parameters are trusted as already built.
	pub fn try_generic(
		base: impl Into<Arc<str>>,
		params: impl IntoIterator<Item = TypeDescriptor>,
	) -> Result<Self, ParseError> {
		let base = base.into();
		parse::check_name(&base)?;
		Ok(Self::generic(base, params))
	}

	/// Returns the base type name.
	pub fn base(&self) -> &str {
		&self.base
	}

	/// Returns the ordered type parameters.
	pub fn params(&self) -> &[TypeDescriptor] {
		&self.params
	}

	/// Returns `true` if the descriptor carries type parameters.
	pub fn is_generic(&self) -> bool {
		!self.params.is_empty()
	}

	/// Returns the base type with its parameters stripped.
	pub fn raw(&self) -> TypeDescriptor {
		Self {
			base: self.base.clone(),
			params: Arc::from([]),
		}
	}
}

impl fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.base)?;
		if let Some((first, rest)) = self.params.split_first() {
			write!(f, "<{first}")?;
			for param in rest {
				write!(f, ", {param}")?;
			}
			f.write_str(">")?;
		}
		Ok(())
	}
}

impl fmt::Debug for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.params.is_empty() {
			f.debug_tuple("TypeDescriptor").field(&self.base).finish()
		} else {
			f.debug_tuple("TypeDescriptor")
				.field(&self.base)
				.field(&self.params)
				.finish()
		}
	}
}

impl FromStr for TypeDescriptor {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse::parse_descriptor(s)
	}
}

/// Serializes as `{ base, params }` so that any name survives a round trip.
impl Serialize for TypeDescriptor {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct("TypeDescriptor", 2)?;
		state.serialize_field("base", &*self.base)?;
		state.serialize_field("params", &*self.params)?;
		state.end()
	}
}

/// Accepts the `{ base, params }` form, or the textual form for hand-written
/// input such as config files.
impl<'de> Deserialize<'de> for TypeDescriptor {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(DescriptorVisitor)
	}
}

struct DescriptorVisitor;

impl<'de> Visitor<'de> for DescriptorVisitor {
	type Value = TypeDescriptor;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a type descriptor string or a { base, params } map")
	}

	fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
		text.parse().map_err(E::custom)
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
		let mut base: Option<String> = None;
		let mut params: Option<Vec<TypeDescriptor>> = None;
		while let Some(key) = map.next_key::<String>()? {
			match key.as_str() {
				"base" => {
					if base.is_some() {
						return Err(de::Error::duplicate_field("base"));
					}
					base = Some(map.next_value()?);
				}
				"params" => {
					if params.is_some() {
						return Err(de::Error::duplicate_field("params"));
					}
					params = Some(map.next_value()?);
				}
				_ => return Err(de::Error::unknown_field(&key, &["base", "params"])),
			}
		}
		let base = base.ok_or_else(|| de::Error::missing_field("base"))?;
		Ok(TypeDescriptor::generic(base, params.unwrap_or_default()))
	}
}
