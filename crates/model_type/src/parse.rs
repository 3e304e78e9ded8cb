//! Parser for the `Base<Param, ...>` descriptor syntax.
//!
//! Names start with an ASCII letter or `_` and continue with ASCII
//! alphanumerics, `_` or `.`. Whitespace is allowed around names and
//! punctuation. Parameter lists nest at most [`MAX_DEPTH`] levels deep.

use crate::TypeDescriptor;

/// Deepest parameter nesting accepted by the parser.
pub const MAX_DEPTH: usize = 64;

/// Errors produced while parsing a textual descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
	/// Input was empty or whitespace only.
	#[error("empty type descriptor")]
	Empty,
	/// A type name was expected at `position`.
	#[error("expected a type name at byte {position}")]
	InvalidName { position: usize },
	/// A `<` was never closed.
	#[error("unclosed '<' opened at byte {position}")]
	Unbalanced { position: usize },
	/// `<>` with no parameters.
	#[error("empty type parameter list at byte {position}")]
	EmptyParams { position: usize },
	/// Input continued after a complete descriptor.
	#[error("unexpected input at byte {position}")]
	TrailingInput { position: usize },
	/// Parameter lists nest deeper than [`MAX_DEPTH`].
	#[error("type parameters nested deeper than {max} levels at byte {position}", max = MAX_DEPTH)]
	TooDeep { position: usize },
}

pub(crate) fn parse_descriptor(input: &str) -> Result<TypeDescriptor, ParseError> {
	if input.trim().is_empty() {
		return Err(ParseError::Empty);
	}
	let mut parser = Parser {
		input,
		pos: 0,
		depth: 0,
	};
	let descriptor = parser.descriptor()?;
	parser.skip_ws();
	if parser.pos < input.len() {
		return Err(ParseError::TrailingInput { position: parser.pos });
	}
	Ok(descriptor)
}

/// Checks that `name` is a single type name in the descriptor grammar.
pub(crate) fn check_name(name: &str) -> Result<(), ParseError> {
	let mut parser = Parser {
		input: name,
		pos: 0,
		depth: 0,
	};
	parser.name()?;
	if parser.pos < name.len() {
		return Err(ParseError::InvalidName { position: parser.pos });
	}
	Ok(())
}

struct Parser<'a> {
	input: &'a str,
	pos: usize,
	depth: usize,
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<u8> {
		self.input.as_bytes().get(self.pos).copied()
	}

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
			self.pos += 1;
		}
	}

	fn descriptor(&mut self) -> Result<TypeDescriptor, ParseError> {
		self.skip_ws();
		let base = self.name()?;
		self.skip_ws();
		if self.peek() != Some(b'<') {
			return Ok(TypeDescriptor::named(base));
		}

		let open = self.pos;
		if self.depth == MAX_DEPTH {
			return Err(ParseError::TooDeep { position: open });
		}
		self.pos += 1;
		self.skip_ws();
		if self.peek() == Some(b'>') {
			return Err(ParseError::EmptyParams { position: open });
		}

		self.depth += 1;
		let params = self.params(open)?;
		self.depth -= 1;
		Ok(TypeDescriptor::generic(base, params))
	}

	/// Parses a comma separated list up to and including the closing `>`.
	fn params(&mut self, open: usize) -> Result<Vec<TypeDescriptor>, ParseError> {
		let mut params = Vec::new();
		loop {
			params.push(self.descriptor()?);
			self.skip_ws();
			match self.peek() {
				Some(b',') => self.pos += 1,
				Some(b'>') => {
					self.pos += 1;
					return Ok(params);
				}
				None => return Err(ParseError::Unbalanced { position: open }),
				Some(_) => return Err(ParseError::TrailingInput { position: self.pos }),
			}
		}
	}

	fn name(&mut self) -> Result<&'a str, ParseError> {
		let start = self.pos;
		match self.peek() {
			Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
			_ => return Err(ParseError::InvalidName { position: start }),
		}
		while self
			.peek()
			.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
		{
			self.pos += 1;
		}
		let input = self.input;
		Ok(&input[start..self.pos])
	}
}
