use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Invalid [`ModelPath`] text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
	#[error("model path is empty")]
	Empty,
	#[error("model path '{path}' has an empty segment")]
	EmptySegment { path: String },
	#[error("model path segment '{segment}' contains invalid character {ch:?}")]
	InvalidChar { segment: String, ch: char },
}

/// Dotted address of a node in the model graph, e.g. `tasks.build`.
///
/// Segments are non-empty and consist of ASCII alphanumerics, `_` and `-`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelPath(Arc<str>);

impl ModelPath {
	/// Returns the path as text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the segments from root to leaf.
	pub fn segments(&self) -> impl Iterator<Item = &str> {
		self.0.split('.')
	}

	/// Returns the last segment.
	pub fn name(&self) -> &str {
		self.0.rsplit_once('.').map_or(&*self.0, |(_, name)| name)
	}

	/// Returns the enclosing path, or `None` for a root segment.
	pub fn parent(&self) -> Option<ModelPath> {
		self.0
			.rsplit_once('.')
			.map(|(parent, _)| ModelPath(Arc::from(parent)))
	}

	/// Appends a segment.
	pub fn child(&self, name: &str) -> Result<ModelPath, PathError> {
		validate_segment(name, name)?;
		Ok(ModelPath(Arc::from(format!("{}.{name}", self.0))))
	}
}

fn validate_segment(path: &str, segment: &str) -> Result<(), PathError> {
	if segment.is_empty() {
		return Err(PathError::EmptySegment { path: path.to_string() });
	}
	match segment
		.chars()
		.find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
	{
		Some(ch) => Err(PathError::InvalidChar {
			segment: segment.to_string(),
			ch,
		}),
		None => Ok(()),
	}
}

impl FromStr for ModelPath {
	type Err = PathError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Err(PathError::Empty);
		}
		for segment in s.split('.') {
			validate_segment(s, segment)?;
		}
		Ok(ModelPath(Arc::from(s)))
	}
}

impl TryFrom<&str> for ModelPath {
	type Error = PathError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		s.parse()
	}
}

impl fmt::Display for ModelPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for ModelPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModelPath({})", self.0)
	}
}
