/*!
# Minweb: Errors
*/

use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Parse Error Kind.
///
/// Tokenizing only ever fails when a mandatory token is missing outright.
/// Unbalanced tags, stray closers and unterminated bodies are repaired
/// instead.
pub enum ParseErrorKind {
	/// # Missing Tag Name.
	TagName,

	/// # Missing Attribute Name.
	AttributeName,

	/// # Unexpected End of Input.
	///
	/// The input ended inside a tag, before its `>`.
	UnexpectedEof,
}

impl ParseErrorKind {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::TagName => "Expected a tag name.",
			Self::AttributeName => "Expected an attribute name.",
			Self::UnexpectedEof => "Unexpected end of input inside a tag.",
		}
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Parse (Tokenize) Error.
///
/// This is returned by [`parse`](crate::parse) when the markup cannot be
/// tokenized at all. No partial tree is ever returned alongside it.
pub struct ParseError {
	/// # Kind.
	kind: ParseErrorKind,

	/// # Byte Offset.
	offset: usize,

	/// # Line (Zero-Indexed).
	line: usize,

	/// # Column (Zero-Indexed, in Bytes).
	column: usize,
}

impl fmt::Display for ParseError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}:{}] {}", self.line, self.column, self.kind.as_str())
	}
}

impl Error for ParseError {}

impl ParseError {
	#[must_use]
	/// # New.
	///
	/// Resolve the line and column from the byte offset.
	pub(crate) fn new(kind: ParseErrorKind, src: &str, offset: usize) -> Self {
		let offset = offset.min(src.len());
		let before = &src.as_bytes()[..offset];
		let line = before.iter().filter(|b| b'\n'.eq(b)).count();
		let column = before.iter()
			.rposition(|b| b'\n'.eq(b))
			.map_or(offset, |nl| offset - nl - 1);

		Self { kind, offset, line, column }
	}

	#[must_use]
	/// # Kind.
	pub const fn kind(&self) -> ParseErrorKind { self.kind }

	#[must_use]
	/// # Byte Offset.
	pub const fn offset(&self) -> usize { self.offset }

	#[must_use]
	/// # Line and Column.
	pub const fn line_and_column(&self) -> (usize, usize) { (self.line, self.column) }
}
