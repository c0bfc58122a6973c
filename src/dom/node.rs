/*!
# Minweb: DOM Node.

Nodes live in the document arena and refer to one another by `NodeId`. The
parent link is a plain index, used for upward queries only; a node belongs to
whichever child list currently holds its id.
*/

use crate::{
	scan::Scanner,
	spec,
};
use std::{
	fmt,
	sync::Arc,
};



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Node ID.
///
/// An index into a specific `Document`'s arena. IDs are meaningless outside
/// the document that issued them.
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}



#[derive(Debug, Clone)]
/// # DOM Node.
pub struct Node {
	/// # Node Kind/Data.
	pub(crate) kind: NodeKind,

	/// # Parent.
	pub(crate) parent: Option<NodeId>,

	/// # Child Node(s).
	pub(crate) children: Vec<NodeId>,
}

impl Node {
	#[must_use]
	/// # New (Detached).
	pub(crate) const fn new(kind: NodeKind) -> Self {
		Self { kind, parent: None, children: Vec::new() }
	}

	#[must_use]
	/// # Kind.
	pub const fn kind(&self) -> &NodeKind { &self.kind }

	/// # Kind (Mutable).
	pub const fn kind_mut(&mut self) -> &mut NodeKind { &mut self.kind }

	#[must_use]
	/// # Parent.
	pub const fn parent(&self) -> Option<NodeId> { self.parent }

	#[must_use]
	/// # Children.
	pub fn children(&self) -> &[NodeId] { &self.children }
}



#[derive(Debug, Clone)]
/// # Node Kind/Data.
pub enum NodeKind {
	/// # The Root Node.
	Document,

	/// # Text.
	///
	/// The raw run of characters between two tags, entities and all.
	Text(String),

	/// # HTML Element.
	Element(Element),

	/// # Command.
	///
	/// Markup like `<!DOCTYPE html>`. These are always void.
	Command(Command),

	/// # Comment.
	Comment {
		/// # The Contents Between `<!--` and `-->`.
		content: String,

		/// # Missing `-->`?
		not_closed: bool,
	},

	/// # Style Element.
	Style(RawText),

	/// # Script Element.
	Script(RawText),
}

impl NodeKind {
	#[must_use]
	/// # Element.
	///
	/// Return the element details for regular elements as well as styles and
	/// scripts.
	pub const fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(e) => Some(e),
			Self::Style(e) | Self::Script(e) => Some(&e.element),
			_ => None,
		}
	}

	/// # Element (Mutable).
	pub const fn as_element_mut(&mut self) -> Option<&mut Element> {
		match self {
			Self::Element(e) => Some(e),
			Self::Style(e) | Self::Script(e) => Some(&mut e.element),
			_ => None,
		}
	}

	#[must_use]
	/// # Text.
	pub fn as_text(&self) -> Option<&str> {
		if let Self::Text(t) = self { Some(t) } else { None }
	}

	#[must_use]
	/// # Is Text?
	pub const fn is_text(&self) -> bool { matches!(self, Self::Text(_)) }

	#[must_use]
	/// # Is Comment?
	pub const fn is_comment(&self) -> bool { matches!(self, Self::Comment { .. }) }

	#[must_use]
	/// # Is Command?
	pub const fn is_command(&self) -> bool { matches!(self, Self::Command(_)) }

	#[must_use]
	/// # Tag Name.
	///
	/// Commands report their name too (e.g. `DOCTYPE`).
	pub fn tag_name(&self) -> Option<&str> {
		match self {
			Self::Command(c) => Some(&c.name),
			_ => self.as_element().map(|e| &*e.name),
		}
	}

	#[must_use]
	/// # Is Tag Name?
	///
	/// This is case-insensitive, and only ever true for element-like nodes.
	pub fn is_tag_name(&self, name: &str) -> bool {
		self.as_element().is_some_and(|e| e.name.eq_ignore_ascii_case(name))
	}

	#[must_use]
	/// # Is Any Tag Name?
	pub fn is_any_tag_name(&self, names: &[&str]) -> bool {
		self.as_element().is_some_and(|e| spec::contains_ignore_ascii_case(names, &e.name))
	}

	#[must_use]
	/// # Attributes.
	pub const fn attrs(&self) -> Option<&Attributes> {
		match self {
			Self::Command(c) => Some(&c.attrs),
			Self::Element(e) => Some(&e.attrs),
			Self::Style(e) | Self::Script(e) => Some(&e.element.attrs),
			_ => None,
		}
	}

	/// # Attributes (Mutable).
	pub const fn attrs_mut(&mut self) -> Option<&mut Attributes> {
		match self {
			Self::Command(c) => Some(&mut c.attrs),
			Self::Element(e) => Some(&mut e.attrs),
			Self::Style(e) | Self::Script(e) => Some(&mut e.element.attrs),
			_ => None,
		}
	}
}



#[derive(Debug, Clone)]
/// # Element.
pub struct Element {
	/// # Tag Name (Case Preserved).
	pub(crate) name: Arc<str>,

	/// # Attributes.
	pub(crate) attrs: Attributes,

	/// # No Body.
	///
	/// Void elements and anything self-closed with `/>`.
	pub(crate) no_body: bool,

	/// # Self-Closed?
	///
	/// The opening tag ended with `/>`.
	pub(crate) self_closing: bool,

	/// # Not Closed.
	///
	/// No matching closing tag was found; the parser repaired it.
	pub(crate) not_closed: bool,

	/// # Extra Closing.
	///
	/// An orphan closing tag with nothing to close, kept as a marker.
	pub(crate) extra_closing: bool,

	/// # Reopened.
	///
	/// A synthetic clone created during repair. The source never had an
	/// opening tag for it.
	pub(crate) reopened: bool,

	/// # Raw Closing Tag.
	///
	/// Only set when the source text differs from `</name>`.
	pub(crate) close_raw: Option<String>,
}

impl Element {
	#[must_use]
	/// # New.
	pub fn new(name: &str) -> Self {
		Self {
			name: Arc::from(name),
			attrs: Attributes::default(),
			no_body: spec::is_void_tag(name),
			self_closing: false,
			not_closed: false,
			extra_closing: false,
			reopened: false,
			close_raw: None,
		}
	}

	#[must_use]
	/// # With Attribute.
	///
	/// The value should include its quotes, if any.
	pub fn with_attr(mut self, name: &str, value: Option<&str>) -> Self {
		self.attrs.set(name, value);
		self
	}

	#[must_use]
	/// # Tag Name.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # Attributes.
	pub const fn attrs(&self) -> &Attributes { &self.attrs }

	/// # Attributes (Mutable).
	pub const fn attrs_mut(&mut self) -> &mut Attributes { &mut self.attrs }

	#[must_use]
	/// # No Body?
	pub const fn no_body(&self) -> bool { self.no_body }

	#[must_use]
	/// # Not Closed?
	pub const fn not_closed(&self) -> bool { self.not_closed }

	#[must_use]
	/// # Extra Closing?
	pub const fn extra_closing(&self) -> bool { self.extra_closing }

	#[must_use]
	/// # Reopened?
	pub const fn reopened(&self) -> bool { self.reopened }

	#[must_use]
	/// # Reopened Clone.
	///
	/// Copy the tag and attributes into a fresh, unclosed, reopened element.
	/// The name is shared, not copied.
	pub(crate) fn reopen(&self) -> Self {
		Self {
			name: Arc::clone(&self.name),
			attrs: self.attrs.clone(),
			no_body: self.no_body,
			self_closing: false,
			not_closed: true,
			extra_closing: false,
			reopened: true,
			close_raw: None,
		}
	}

	#[must_use]
	/// # Orphan Closing Marker.
	pub(crate) fn orphan(name: &str, raw: &str) -> Self {
		let mut out = Self::new(name);
		out.no_body = true;
		out.extra_closing = true;
		out.close_raw = Some(raw.to_owned());
		out
	}
}



#[derive(Debug, Clone)]
/// # Command.
pub struct Command {
	/// # Name (e.g. `DOCTYPE`).
	pub(crate) name: Arc<str>,

	/// # Attributes.
	pub(crate) attrs: Attributes,
}

impl Command {
	#[must_use]
	/// # New.
	pub fn new(name: &str) -> Self {
		Self { name: Arc::from(name), attrs: Attributes::default() }
	}

	#[must_use]
	/// # Name.
	pub fn name(&self) -> &str { &self.name }
}



#[derive(Debug, Clone)]
/// # Raw-Text Element.
///
/// A `<style>` or `<script>` whose body is stored verbatim rather than
/// parsed into child nodes.
pub struct RawText {
	/// # Element.
	pub(crate) element: Element,

	/// # Content.
	pub(crate) content: String,
}

impl RawText {
	#[must_use]
	/// # Element.
	pub const fn element(&self) -> &Element { &self.element }

	#[must_use]
	/// # Text Content.
	pub fn content(&self) -> &str { &self.content }

	#[must_use]
	/// # Is JSON?
	///
	/// JSON script bodies are left exactly as they are.
	pub fn is_json(&self) -> bool {
		self.element.attrs.get("type")
			.is_some_and(|v| v.eq_ignore_ascii_case("application/json"))
	}

	#[must_use]
	/// # Minified Text Content.
	///
	/// Comments are removed and whitespace runs collapsed. Strings, and for
	/// scripts template literals too, pass through untouched.
	pub fn minified_content(&self, script: bool) -> String {
		if script && self.is_json() { self.content.clone() }
		else { minify_code(&self.content, script) }
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Attribute.
pub struct Attribute {
	/// # Name.
	pub(crate) name: String,

	/// # Value.
	///
	/// Quotes, if any, are kept as-is; nothing is unescaped.
	pub(crate) value: Option<String>,

	/// # Raw Assignment.
	///
	/// The text between name and value when it isn't a lone `=`.
	pub(crate) eq_raw: Option<String>,
}

impl Attribute {
	#[must_use]
	/// # Name.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # Raw Value.
	pub fn value(&self) -> Option<&str> { self.value.as_deref() }
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Attribute Token.
pub(crate) enum AttrToken {
	/// # Separator.
	///
	/// Whitespace, or a stray `/`.
	Space(String),

	/// # Attribute.
	Attr(Attribute),
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Attributes.
///
/// Attributes are stored in source order, interleaved with the separators
/// found between them, so the raw form can be rebuilt exactly.
pub struct Attributes(pub(crate) Vec<AttrToken>);

impl Attributes {
	/// # Iterate.
	pub fn iter(&self) -> impl Iterator<Item=&Attribute> {
		self.0.iter().filter_map(|t| match t {
			AttrToken::Attr(a) => Some(a),
			AttrToken::Space(_) => None,
		})
	}

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.iter().next().is_none() }

	#[must_use]
	/// # Has Attribute?
	pub fn has(&self, name: &str) -> bool {
		self.iter().any(|a| a.name.eq_ignore_ascii_case(name))
	}

	#[must_use]
	/// # Get Raw Value.
	///
	/// Return the value exactly as written, quotes and all. Valueless
	/// attributes return `None`, same as missing ones.
	pub fn get_raw(&self, name: &str) -> Option<&str> {
		self.iter()
			.find(|a| a.name.eq_ignore_ascii_case(name))
			.and_then(|a| a.value.as_deref())
	}

	#[must_use]
	/// # Get Value.
	///
	/// Same as `get_raw`, but with one matching pair of quotes removed.
	pub fn get(&self, name: &str) -> Option<&str> { self.get_raw(name).map(unquote) }

	/// # Set.
	///
	/// Replace the first matching attribute's value, or append a new one.
	/// The value should include its quotes, if any.
	pub fn set(&mut self, name: &str, value: Option<&str>) {
		for t in &mut self.0 {
			if let AttrToken::Attr(a) = t && a.name.eq_ignore_ascii_case(name) {
				a.value = value.map(String::from);
				if a.value.is_none() { a.eq_raw = None; }
				return;
			}
		}

		self.0.push(AttrToken::Space(" ".to_owned()));
		self.0.push(AttrToken::Attr(Attribute {
			name: name.to_owned(),
			value: value.map(String::from),
			eq_raw: None,
		}));
	}

	/// # Remove.
	///
	/// Remove every attribute called `name`. Returns `true` if anything was
	/// removed.
	pub fn remove(&mut self, name: &str) -> bool {
		let before = self.0.len();
		self.retain(|a| ! a.name.eq_ignore_ascii_case(name));
		before != self.0.len()
	}

	/// # Retain.
	///
	/// Keep only the attributes for which the callback returns `true`. The
	/// separator preceding each removed attribute goes with it.
	pub fn retain<F>(&mut self, mut cb: F)
	where F: FnMut(&Attribute) -> bool {
		let mut out = Vec::with_capacity(self.0.len());
		let mut pending: Vec<AttrToken> = Vec::new();
		for t in self.0.drain(..) {
			match t {
				AttrToken::Space(_) => { pending.push(t); },
				AttrToken::Attr(a) =>
					if cb(&a) {
						out.append(&mut pending);
						out.push(AttrToken::Attr(a));
					}
					else { pending.clear(); },
			}
		}
		out.append(&mut pending);
		self.0 = out;
	}

	/// # Write Raw.
	pub(crate) fn write_raw(&self, out: &mut String) {
		for t in &self.0 {
			match t {
				AttrToken::Space(s) => { out.push_str(s); },
				AttrToken::Attr(a) => {
					out.push_str(&a.name);
					if let Some(v) = a.value.as_deref() {
						out.push_str(a.eq_raw.as_deref().unwrap_or("="));
						out.push_str(v);
					}
				},
			}
		}
	}

	/// # Write Minified.
	///
	/// Each attribute is preceded by exactly one space; separators are
	/// dropped.
	pub(crate) fn write_minified(&self, out: &mut String) {
		for a in self.iter() {
			out.push(' ');
			out.push_str(&a.name);
			if let Some(v) = a.value.as_deref() {
				out.push('=');
				if v.is_empty() { out.push_str("\"\""); }
				else { out.push_str(v); }
			}
		}
	}
}



#[must_use]
/// # Unquote.
///
/// Strip one matching pair of surrounding quotes, if present.
pub(crate) fn unquote(src: &str) -> &str {
	let bytes = src.as_bytes();
	if
		2 <= bytes.len() &&
		matches!(bytes[0], b'"' | b'\'') &&
		bytes[0] == bytes[bytes.len() - 1]
	{
		&src[1..src.len() - 1]
	}
	else { src }
}

/// # Write Trimmed Text.
///
/// Trim leading and trailing whitespace, but keep the first character of
/// each trimmed run. An all-whitespace string becomes its first character.
pub(crate) fn write_trimmed_text(src: &str, out: &mut String) {
	let inner = src.trim_matches(is_whitespace_char);
	if inner.is_empty() {
		if let Some(c) = src.chars().next() { out.push(c); }
		return;
	}

	if src.len() != src.trim_start_matches(is_whitespace_char).len() {
		out.push_str(&src[..1]);
	}
	out.push_str(inner);
	if src.len() != src.trim_end_matches(is_whitespace_char).len() {
		out.push_str(&src[src.len() - 1..]);
	}
}

#[must_use]
/// # Minify Code.
///
/// Shared by scripts (`script == true`) and styles.
fn minify_code(src: &str, script: bool) -> String {
	let mut out = String::with_capacity(src.len());
	let mut s = Scanner::new(src);
	while let Some(b) = s.peek() {
		let start = s.pos();
		match b {
			b'"' | b'\'' => {
				s.skip_quoted(b, true);
				out.push_str(s.slice_from(start));
			},
			b'`' if script => {
				s.skip_template();
				out.push_str(s.slice_from(start));
			},
			b'/' if s.skip_comment(script) => {},
			b if spec::is_whitespace(b) => {
				let newline = s.skip_whitespace().contains('\n');
				match out.as_bytes().last().copied() {
					None => {},
					Some(b'\n') => {},
					Some(last) if spec::is_whitespace(last) => if newline {
						out.pop();
						out.push('\n');
					},
					Some(_) => { out.push(if newline { '\n' } else { char::from(b) }); },
				}
			},
			_ => {
				s.advance(1);
				while s.peek().is_some_and(|b| ! is_code_special(b)) { s.advance(1); }
				out.push_str(s.slice_from(start));
			},
		}
	}

	let len = out.trim_end_matches(is_whitespace_char).len();
	out.truncate(len);
	out
}

#[must_use]
/// # Is Code-Special Byte?
const fn is_code_special(b: u8) -> bool {
	matches!(b, b'"' | b'\'' | b'`' | b'/') || spec::is_whitespace(b)
}

#[must_use]
/// # Is Whitespace Char?
const fn is_whitespace_char(c: char) -> bool {
	c.is_ascii() && spec::is_whitespace(c as u8)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_write_trimmed_text() {
		for (raw, expected) in [
			("", ""),
			("hello", "hello"),
			("   ", " "),
			("\n\n", "\n"),
			("  hello  world \t", " hello  world\t"),
			("\n  hi", "\nhi"),
		] {
			let mut out = String::new();
			write_trimmed_text(raw, &mut out);
			assert_eq!(out, expected, "{raw:?}");
		}
	}

	#[test]
	fn t_unquote() {
		assert_eq!(unquote(r#""a b""#), "a b");
		assert_eq!(unquote("'a'"), "a");
		assert_eq!(unquote(r#""a'"#), r#""a'"#);
		assert_eq!(unquote("\""), "\"");
		assert_eq!(unquote("bare"), "bare");
	}

	#[test]
	fn t_attributes() {
		let mut attrs = Attributes(vec![
			AttrToken::Space(" ".to_owned()),
			AttrToken::Attr(Attribute { name: "ID".to_owned(), value: Some("'x'".to_owned()), eq_raw: None }),
			AttrToken::Space("\n\t".to_owned()),
			AttrToken::Attr(Attribute { name: "hidden".to_owned(), value: None, eq_raw: None }),
			AttrToken::Space(" ".to_owned()),
			AttrToken::Attr(Attribute { name: "data-y".to_owned(), value: Some("1".to_owned()), eq_raw: Some(" = ".to_owned()) }),
		]);

		assert!(attrs.has("id"));
		assert!(attrs.has("HIDDEN"));
		assert_eq!(attrs.get("id"), Some("x"));
		assert_eq!(attrs.get_raw("id"), Some("'x'"));
		assert_eq!(attrs.get("hidden"), None);

		let mut raw = String::new();
		attrs.write_raw(&mut raw);
		assert_eq!(raw, " ID='x'\n\thidden data-y = 1");

		let mut min = String::new();
		attrs.write_minified(&mut min);
		assert_eq!(min, " ID='x' hidden data-y=1");

		assert!(attrs.remove("hidden"));
		assert!(! attrs.remove("hidden"));
		attrs.set("id", Some("\"z\""));
		attrs.set("lang", Some("en"));

		let mut raw = String::new();
		attrs.write_raw(&mut raw);
		assert_eq!(raw, " ID=\"z\" data-y = 1 lang=en");
	}

	#[test]
	fn t_minify_code() {
		assert_eq!(
			minify_code("  var a = 1;  // one\n\n  var b = \"x  // y\";\n", true),
			"var a = 1;\nvar b = \"x  // y\";",
		);
		assert_eq!(
			minify_code("let t = `a   ${ b /* c */ }`;   /* gone */ x();", true),
			"let t = `a   ${ b /* c */ }`; x();",
		);
		assert_eq!(
			minify_code("body {\n  color: red; /* note */\n}\na[href=\"a  b\"] { }", false),
			"body {\ncolor: red;\n}\na[href=\"a  b\"] { }",
		);

		// Styles have no line comments.
		assert_eq!(minify_code("a{background:url(//x.com/y.png)}", false), "a{background:url(//x.com/y.png)}");
	}
}
