/*!
# Minweb: Scanner Primitives.

Offset-based helpers over the full input. All delimiters are ASCII, so every
position the scanner stops at is also a valid `str` boundary.
*/

use crate::spec;



#[derive(Debug, Clone, Copy)]
/// # Scanner.
pub(crate) struct Scanner<'a> {
	/// # Source.
	src: &'a str,

	/// # Offset.
	pos: usize,
}

impl<'a> Scanner<'a> {
	#[must_use]
	/// # New.
	pub(crate) const fn new(src: &'a str) -> Self { Self { src, pos: 0 } }

	#[must_use]
	/// # Source.
	pub(crate) const fn src(&self) -> &'a str { self.src }

	#[must_use]
	/// # Offset.
	pub(crate) const fn pos(&self) -> usize { self.pos }

	#[must_use]
	/// # At End?
	pub(crate) const fn is_eof(&self) -> bool { self.src.len() <= self.pos }

	#[must_use]
	/// # Current Byte.
	pub(crate) fn peek(&self) -> Option<u8> { self.src.as_bytes().get(self.pos).copied() }

	#[must_use]
	/// # Byte at Offset (From Current).
	pub(crate) fn peek_at(&self, offset: usize) -> Option<u8> {
		self.src.as_bytes().get(self.pos + offset).copied()
	}

	#[must_use]
	/// # Starts With?
	pub(crate) fn starts_with(&self, pat: &str) -> bool {
		self.src.as_bytes()[self.pos..].starts_with(pat.as_bytes())
	}

	#[must_use]
	/// # Starts With (Case-Insensitively)?
	pub(crate) fn starts_with_ignore_case(&self, pat: &str) -> bool {
		self.src.as_bytes()[self.pos..]
			.get(..pat.len())
			.is_some_and(|v| v.eq_ignore_ascii_case(pat.as_bytes()))
	}

	/// # Advance.
	pub(crate) fn advance(&mut self, n: usize) {
		self.pos = usize::min(self.pos + n, self.src.len());
	}

	#[must_use]
	/// # Slice From.
	pub(crate) fn slice_from(&self, start: usize) -> &'a str { &self.src[start..self.pos] }

	/// # Skip Whitespace.
	///
	/// Return the skipped run, if any.
	pub(crate) fn skip_whitespace(&mut self) -> &'a str {
		let start = self.pos;
		while self.peek().is_some_and(spec::is_whitespace) { self.pos += 1; }
		self.slice_from(start)
	}

	/// # Scan Name.
	///
	/// Consume a maximal run of anything other than `=`, `/`, whitespace,
	/// `<`, or `>`. A zero-length result is returned as `None`; callers treat
	/// that as fatal.
	pub(crate) fn scan_name(&mut self) -> Option<&'a str> {
		let start = self.pos;
		while self.peek().is_some_and(is_name_char) { self.pos += 1; }
		if start == self.pos { None }
		else { Some(self.slice_from(start)) }
	}

	/// # Scan Attribute Value.
	///
	/// Quoted values run through the matching unescaped quote, inclusive. A
	/// backslash only shields the next character from terminating the value;
	/// both are kept verbatim.
	///
	/// Unquoted values run until whitespace, `<`, `>`, or a `/` that closes
	/// the tag. They may be empty.
	pub(crate) fn scan_value(&mut self) -> &'a str {
		let start = self.pos;
		match self.peek() {
			Some(q @ (b'"' | b'\'')) => { self.skip_quoted(q, false); },
			_ => while let Some(b) = self.peek() {
				match b {
					b'<' | b'>' => break,
					b'/' if self.peek_at(1) == Some(b'>') => break,
					b if spec::is_whitespace(b) => break,
					_ => { self.pos += 1; },
				}
			},
		}
		self.slice_from(start)
	}

	/// # Scan Until Literal.
	///
	/// Consume everything up to (but not including) the first occurrence of
	/// `pat`, returning the consumed slice and whether or not the pattern was
	/// actually found. If it wasn't, the scanner ends up at EOF.
	pub(crate) fn scan_until(&mut self, pat: &str) -> (&'a str, bool) {
		let start = self.pos;
		if let Some(idx) = self.src[start..].find(pat) {
			self.pos += idx;
			(self.slice_from(start), true)
		}
		else {
			self.pos = self.src.len();
			(self.slice_from(start), false)
		}
	}

	/// # Scan Until Literal (Case-Insensitively).
	///
	/// Same as `scan_until`, but ASCII case is ignored.
	pub(crate) fn scan_until_ignore_case(&mut self, pat: &str) -> (&'a str, bool) {
		let start = self.pos;
		while ! self.is_eof() {
			if self.starts_with_ignore_case(pat) { return (self.slice_from(start), true); }
			self.pos += 1;
		}
		(self.slice_from(start), false)
	}

	/// # Scan Script Body.
	///
	/// Consume a script body up to its (case-insensitive) closing tag,
	/// stepping over string literals, template literals (including their
	/// `${…}` interpolations), and comments so a closing tag embedded in any
	/// of those doesn't end the element early.
	pub(crate) fn scan_script(&mut self, close: &str) -> (&'a str, bool) {
		let start = self.pos;
		while let Some(b) = self.peek() {
			match b {
				b'"' | b'\'' => { self.skip_quoted(b, true); },
				b'`' => { self.skip_template(); },
				b'/' if self.skip_comment(true) => {},
				b'<' if self.starts_with_ignore_case(close) => {
					return (self.slice_from(start), true);
				},
				_ => { self.pos += 1; },
			}
		}
		(self.slice_from(start), false)
	}

	/// # Scan Style Body.
	///
	/// Like `scan_script`, but CSS only has strings and block comments.
	pub(crate) fn scan_style(&mut self, close: &str) -> (&'a str, bool) {
		let start = self.pos;
		while let Some(b) = self.peek() {
			match b {
				b'"' | b'\'' => { self.skip_quoted(b, true); },
				b'/' if self.skip_comment(false) => {},
				b'<' if self.starts_with_ignore_case(close) => {
					return (self.slice_from(start), true);
				},
				_ => { self.pos += 1; },
			}
		}
		(self.slice_from(start), false)
	}

	/// # Skip Quoted String.
	///
	/// The scanner must be sitting on the opening quote. Code strings cannot
	/// span raw line breaks, so for those an unescaped newline ends the
	/// string early (without being consumed).
	pub(crate) fn skip_quoted(&mut self, quote: u8, code: bool) {
		self.pos += 1;
		while let Some(b) = self.peek() {
			if b == b'\\' { self.advance(2); }
			else if b == quote {
				self.pos += 1;
				return;
			}
			else if code && b == b'\n' { return; }
			else { self.pos += 1; }
		}
	}

	/// # Skip Template Literal.
	///
	/// The scanner must be sitting on the opening backtick.
	pub(crate) fn skip_template(&mut self) {
		self.pos += 1;
		while let Some(b) = self.peek() {
			match b {
				b'\\' => { self.advance(2); },
				b'`' => {
					self.pos += 1;
					return;
				},
				b'$' if self.peek_at(1) == Some(b'{') => {
					self.pos += 2;
					self.skip_interpolation();
				},
				_ => { self.pos += 1; },
			}
		}
	}

	/// # Skip Template Interpolation.
	///
	/// Consume code through the `}` that balances an already-consumed `${`.
	fn skip_interpolation(&mut self) {
		let mut depth = 1_usize;
		while let Some(b) = self.peek() {
			match b {
				b'"' | b'\'' => { self.skip_quoted(b, true); },
				b'`' => { self.skip_template(); },
				b'/' if self.skip_comment(true) => {},
				b'{' => {
					depth += 1;
					self.pos += 1;
				},
				b'}' => {
					self.pos += 1;
					depth -= 1;
					if depth == 0 { return; }
				},
				_ => { self.pos += 1; },
			}
		}
	}

	/// # Skip Comment.
	///
	/// If the scanner is sitting on a `/*` (or, when `line` is true, a `//`)
	/// comment, consume it and return `true`. Line comments stop short of
	/// their terminating newline.
	pub(crate) fn skip_comment(&mut self, line: bool) -> bool {
		match self.peek_at(1) {
			Some(b'*') => {
				self.pos += 2;
				if let Some(idx) = self.src[self.pos..].find("*/") { self.pos += idx + 2; }
				else { self.pos = self.src.len(); }
				true
			},
			Some(b'/') if line => {
				self.pos += 2;
				if let Some(idx) = self.src[self.pos..].find('\n') { self.pos += idx; }
				else { self.pos = self.src.len(); }
				true
			},
			_ => false,
		}
	}
}



#[must_use]
/// # Is Name Character?
pub(crate) const fn is_name_char(b: u8) -> bool {
	! matches!(b, b'=' | b'/' | b'<' | b'>') && ! spec::is_whitespace(b)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_scan_name() {
		let mut s = Scanner::new("data-x=1");
		assert_eq!(s.scan_name(), Some("data-x"));
		assert_eq!(s.peek(), Some(b'='));

		let mut s = Scanner::new("Ünïcode>");
		assert_eq!(s.scan_name(), Some("Ünïcode"));

		for i in ["", " a", "=a", "/a", "<a", ">"] {
			assert_eq!(Scanner::new(i).scan_name(), None, "{i:?}");
		}
	}

	#[test]
	fn t_scan_value() {
		for (raw, expected, rest) in [
			(r#""hello world" x"#, r#""hello world""#, Some(b' ')),
			(r"'it\'s' x", r"'it\'s'", Some(b' ')),
			(r#""a\"b">"#, r#""a\"b""#, Some(b'>')),
			(r#""multi
line">"#, "\"multi\nline\"", Some(b'>')),
			("/x/y?a=b c", "/x/y?a=b", Some(b' ')),
			("bare/>", "bare", Some(b'/')),
			(">", "", Some(b'>')),
			(r#""unterminated"#, r#""unterminated"#, None),
		] {
			let mut s = Scanner::new(raw);
			assert_eq!(s.scan_value(), expected);
			assert_eq!(s.peek(), rest);
		}
	}

	#[test]
	fn t_scan_until() {
		let mut s = Scanner::new("abc-->def");
		assert_eq!(s.scan_until("-->"), ("abc", true));
		assert!(s.starts_with("-->"));

		let mut s = Scanner::new("abc");
		assert_eq!(s.scan_until("-->"), ("abc", false));
		assert!(s.is_eof());

		let mut s = Scanner::new("{}</STYLE>");
		assert_eq!(s.scan_until_ignore_case("</style>"), ("{}", true));
	}

	#[test]
	fn t_scan_script() {
		for (raw, body) in [
			(r#"var s = "</script>";</script>"#, r#"var s = "</script>";"#),
			("var s = '</script>';</script>", "var s = '</script>';"),
			("// </script>\nx();</script>", "// </script>\nx();"),
			("/* </script> */x();</SCRIPT>", "/* </script> */x();"),
			("let t = `a${ {b: '</script>'}.b }c`;</script>", "let t = `a${ {b: '</script>'}.b }c`;"),
			("a = 1 / 2;</script>", "a = 1 / 2;"),
		] {
			let mut s = Scanner::new(raw);
			assert_eq!(s.scan_script("</script>"), (body, true), "{raw:?}");
		}

		let mut s = Scanner::new("var x = 1;");
		assert_eq!(s.scan_script("</script>"), ("var x = 1;", false));
	}

	#[test]
	fn t_scan_style() {
		let mut s = Scanner::new(r#"a::after{content:"</style>"}/*</style>*/</style>"#);
		assert_eq!(
			s.scan_style("</style>"),
			(r#"a::after{content:"</style>"}/*</style>*/"#, true),
		);
	}
}
