/*!
# Minweb: Parser.

A single pass over the input, building the tree as it goes. Open elements are
tracked on a stack owned by the parser session, which is also where all of
the tag-soup repair happens.
*/

use crate::{
	Document,
	ParseError,
	ParseErrorKind,
	scan::Scanner,
	spec,
};
use super::node::{
	Attribute,
	Attributes,
	AttrToken,
	Command,
	Element,
	NodeId,
	NodeKind,
	RawText,
};
use tracing::{
	debug,
	trace,
};



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Parse Options.
pub struct ParseOptions {
	/// # Keep Orphans.
	///
	/// Keep closing tags with nothing to close as (invisible) marker nodes so
	/// the raw output reproduces them.
	keep_orphans: bool,

	/// # Trim Start.
	///
	/// Skip leading whitespace and byte-order marks.
	trim_start: bool,
}

impl ParseOptions {
	#[must_use]
	/// # With Keep Orphans.
	pub const fn with_keep_orphans(self, keep_orphans: bool) -> Self {
		Self { keep_orphans, ..self }
	}

	#[must_use]
	/// # With Trim Start.
	pub const fn with_trim_start(self, trim_start: bool) -> Self {
		Self { trim_start, ..self }
	}

	#[must_use]
	/// # Keep Orphans?
	pub const fn keep_orphans(&self) -> bool { self.keep_orphans }

	#[must_use]
	/// # Trim Start?
	pub const fn trim_start(&self) -> bool { self.trim_start }
}



#[derive(Debug)]
/// # Parser Session.
pub(super) struct Parser<'a> {
	/// # Input.
	scan: Scanner<'a>,

	/// # Output.
	doc: Document,

	/// # Open Elements.
	///
	/// The document root is implied beneath the bottom entry.
	stack: Vec<NodeId>,

	/// # Options.
	opts: ParseOptions,
}

impl<'a> Parser<'a> {
	#[must_use]
	/// # New.
	pub(super) fn new(src: &'a str, opts: ParseOptions) -> Self {
		let mut scan = Scanner::new(src);
		if opts.trim_start {
			let rest = src.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
			scan.advance(src.len() - rest.len());
		}

		Self {
			scan,
			doc: Document::default(),
			stack: Vec::new(),
			opts,
		}
	}

	/// # Run.
	///
	/// ## Errors
	///
	/// Returns an error if the markup cannot be tokenized.
	pub(super) fn run(mut self) -> Result<Document, ParseError> {
		while let Some(b) = self.scan.peek() {
			if b == b'<' { self.tag()?; }
			else { self.text(); }
		}

		// Anything still open stays that way, but empty reopened clones can
		// go.
		while let Some(id) = self.stack.pop() { self.prune_reopened(id); }

		debug!(
			bytes = self.scan.src().len(),
			nodes = self.doc.arena_len(),
			"parsed document"
		);
		Ok(self.doc)
	}

	#[must_use]
	/// # Current Parent.
	fn current(&self) -> NodeId {
		self.stack.last().copied().unwrap_or_else(|| self.doc.root())
	}

	/// # Error.
	fn error(&self, kind: ParseErrorKind) -> ParseError {
		ParseError::new(kind, self.scan.src(), self.scan.pos())
	}

	/// # Text.
	fn text(&mut self) {
		let (txt, _) = self.scan.scan_until("<");
		let parent = self.current();
		self.doc.append(parent, NodeKind::Text(txt.to_owned()));
	}

	/// # Tag-Like Thing.
	fn tag(&mut self) -> Result<(), ParseError> {
		if self.scan.starts_with("<!--") { self.comment(); Ok(()) }
		else if self.scan.starts_with("<!") { self.command() }
		else if self.scan.starts_with("</") { self.close_tag() }
		else { self.open_tag() }
	}

	/// # Comment.
	///
	/// An unterminated comment runs to the end of the input.
	fn comment(&mut self) {
		self.scan.advance(4);
		let (content, found) = self.scan.scan_until("-->");
		let content = content.to_owned();
		if found { self.scan.advance(3); }
		else { trace!("unterminated comment"); }

		let parent = self.current();
		self.doc.append(parent, NodeKind::Comment { content, not_closed: ! found });
	}

	/// # Command.
	fn command(&mut self) -> Result<(), ParseError> {
		self.scan.advance(2);
		let name = self.scan.scan_name().ok_or_else(|| self.error(ParseErrorKind::TagName))?;
		let mut cmd = Command::new(name);
		let (mut attrs, self_closing) = self.attributes()?;
		if self_closing { attrs.0.push(AttrToken::Space("/".to_owned())); }
		cmd.attrs = attrs;

		let parent = self.current();
		self.doc.append(parent, NodeKind::Command(cmd));
		Ok(())
	}

	/// # Opening Tag.
	fn open_tag(&mut self) -> Result<(), ParseError> {
		self.scan.advance(1);
		let name = self.scan.scan_name().ok_or_else(|| self.error(ParseErrorKind::TagName))?;
		let mut el = Element::new(name);
		let (attrs, self_closing) = self.attributes()?;
		el.attrs = attrs;
		if self_closing {
			el.self_closing = true;
			el.no_body = true;
		}

		let parent = self.current();
		if el.no_body {
			self.doc.append(parent, NodeKind::Element(el));
		}
		else if spec::is_raw_text_tag(name) {
			let raw = self.raw_text(el);
			self.doc.append(parent, raw);
		}
		else {
			el.not_closed = true;
			let id = self.doc.append(parent, NodeKind::Element(el));
			self.stack.push(id);
		}

		Ok(())
	}

	/// # Attributes.
	///
	/// Parse the rest of a tag, through its `>`. The second value is `true`
	/// if the tag ended with `/>`.
	fn attributes(&mut self) -> Result<(Attributes, bool), ParseError> {
		let mut out = Attributes::default();
		loop {
			let space = self.scan.skip_whitespace();
			if ! space.is_empty() { out.0.push(AttrToken::Space(space.to_owned())); }

			match self.scan.peek() {
				None => return Err(self.error(ParseErrorKind::UnexpectedEof)),
				Some(b'>') => {
					self.scan.advance(1);
					return Ok((out, false));
				},
				Some(b'/') =>
					if self.scan.peek_at(1) == Some(b'>') {
						self.scan.advance(2);
						return Ok((out, true));
					}
					else {
						self.scan.advance(1);
						out.0.push(AttrToken::Space("/".to_owned()));
					},
				Some(_) => {
					let attr = self.attribute()?;
					out.0.push(AttrToken::Attr(attr));
				},
			}
		}
	}

	/// # Attribute.
	///
	/// Quoted names, like a doctype's public identifier, are taken whole so
	/// their inner `/` and whitespace survive.
	fn attribute(&mut self) -> Result<Attribute, ParseError> {
		let name =
			if matches!(self.scan.peek(), Some(b'"' | b'\'')) { self.scan.scan_value() }
			else {
				self.scan.scan_name()
					.ok_or_else(|| self.error(ParseErrorKind::AttributeName))?
			}
			.to_owned();

		// Look ahead for an assignment.
		let mut ahead = self.scan;
		let eq_start = ahead.pos();
		ahead.skip_whitespace();
		if ahead.peek() != Some(b'=') {
			return Ok(Attribute { name, value: None, eq_raw: None });
		}

		ahead.advance(1);
		ahead.skip_whitespace();
		let eq = ahead.slice_from(eq_start);
		let eq_raw = if eq == "=" { None } else { Some(eq.to_owned()) };
		let value = ahead.scan_value().to_owned();
		self.scan = ahead;

		Ok(Attribute { name, value: Some(value), eq_raw })
	}

	/// # Raw-Text Body.
	///
	/// Scan a style or script body through its closing tag.
	fn raw_text(&mut self, mut el: Element) -> NodeKind {
		let close = format!("</{}>", el.name.to_ascii_lowercase());
		let is_script = ! el.name.eq_ignore_ascii_case("style");
		let json = is_script && el.attrs.get("type")
			.is_some_and(|v| v.eq_ignore_ascii_case("application/json"));

		let (content, found) =
			if json { self.scan.scan_until_ignore_case(&close) }
			else if is_script { self.scan.scan_script(&close) }
			else { self.scan.scan_style(&close) };
		let content = content.to_owned();

		if found {
			let start = self.scan.pos();
			self.scan.advance(close.len());
			let raw = self.scan.slice_from(start);
			if ! is_canonical_close(raw, &el.name) { el.close_raw = Some(raw.to_owned()); }
		}
		else {
			trace!(tag = %el.name, "unterminated raw-text element");
			el.not_closed = true;
		}

		let raw = RawText { element: el, content };
		if is_script { NodeKind::Script(raw) }
		else { NodeKind::Style(raw) }
	}

	/// # Closing Tag.
	fn close_tag(&mut self) -> Result<(), ParseError> {
		let start = self.scan.pos();
		self.scan.advance(2);
		let name = self.scan.scan_name().ok_or_else(|| self.error(ParseErrorKind::TagName))?;
		let (_, found) = self.scan.scan_until(">");
		if ! found { return Err(self.error(ParseErrorKind::UnexpectedEof)); }
		self.scan.advance(1);
		let raw = self.scan.slice_from(start);

		// The easy case: it closes the current element.
		if let Some(&top) = self.stack.last() && self.doc.is_tag_name(top, name) {
			self.stack.pop();
			self.close(top, raw);
			return Ok(());
		}

		// Look further down.
		let Some(k) = self.stack.iter().rposition(|id| self.is_exact_tag_name(*id, name))
		else {
			self.orphan(name, raw);
			return Ok(());
		};

		// Everything above the match has to be force-closed.
		let above = self.stack.split_off(k + 1);
		if let Some(matched) = self.stack.pop() { self.close(matched, raw); }

		let mut reopen = Vec::with_capacity(above.len());
		for &id in &above {
			if let NodeKind::Element(el) = self.doc.kind(id) {
				trace!(tag = %el.name, closed_by = name, "forced close");
				reopen.push(el.reopen());
			}
		}
		for &id in above.iter().rev() { self.prune_reopened(id); }

		// And reopened beneath the new current element so subsequent content
		// nests the same way.
		for el in reopen {
			trace!(tag = %el.name, "reopened");
			let parent = self.current();
			let id = self.doc.append(parent, NodeKind::Element(el));
			self.stack.push(id);
		}

		Ok(())
	}

	/// # Close Element.
	fn close(&mut self, id: NodeId, raw: &str) {
		if let Some(el) = self.doc.kind_mut(id).as_element_mut() {
			el.not_closed = false;
			if ! is_canonical_close(raw, &el.name) { el.close_raw = Some(raw.to_owned()); }
		}
	}

	/// # Orphan Closing Tag.
	fn orphan(&mut self, name: &str, raw: &str) {
		if self.opts.keep_orphans {
			trace!(tag = name, "kept orphan close");
			let parent = self.current();
			self.doc.append(parent, NodeKind::Element(Element::orphan(name, raw)));
		}
		else { trace!(tag = name, "dropped orphan close"); }
	}

	/// # Prune Empty Reopened Clone.
	///
	/// A reopened clone that never received any content and was never
	/// properly closed contributes nothing, so is removed.
	fn prune_reopened(&mut self, id: NodeId) {
		if
			let NodeKind::Element(el) = self.doc.kind(id) &&
			el.reopened &&
			el.not_closed &&
			self.doc.children(id).is_empty()
		{
			self.doc.detach(id);
		}
	}

	#[must_use]
	/// # Is Exact Tag Name?
	///
	/// The stack search is case-sensitive.
	fn is_exact_tag_name(&self, id: NodeId, name: &str) -> bool {
		self.doc.kind(id).tag_name().is_some_and(|n| n == name)
	}
}



#[must_use]
/// # Is Canonical Closing Tag?
fn is_canonical_close(raw: &str, name: &str) -> bool {
	raw.len() == name.len() + 3 &&
	raw.starts_with("</") &&
	raw.ends_with('>') &&
	&raw[2..raw.len() - 1] == name
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Tag Names of a Node's Children.
	fn names(doc: &Document, id: NodeId) -> Vec<String> {
		doc.children(id).iter()
			.map(|c| match doc.kind(*c) {
				NodeKind::Text(t) => format!("#{t}"),
				k => k.tag_name().unwrap_or("?").to_owned(),
			})
			.collect()
	}

	#[test]
	fn t_round_trip() {
		for raw in [
			"",
			"Just text.",
			"<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"></head>\n<body class='a  b'   data-x=1 hidden>\n<p>Hi <b>there</b>!</p>\n</body>\n</html>\n",
			"<p><br><br/><br /><img src=x.png alt=\"\"><hr></p>",
			"<!-- comment --><div\n\tid = \"x\"\n></div >",
			"<DIV></div>",
			"<input value=\"a \\\" b\"><a href=>x</a>",
			"<p / >stray</p>",
			"<style>a::after { content: \"</style>\"; }</STYLE>",
			"<script>if (a < b) { x = `${ '</script>' }`; }</script>",
			"<p>a</p><!-- b",
			include_str!("../../skel/test-assets/article.html"),
		] {
			let doc = Document::parse(raw).expect("Parse failed.");
			assert_eq!(doc.to_string(), raw);
		}
	}

	#[test]
	fn t_void() {
		for tag in spec::VOID_TAGS {
			let raw = format!("<div><{tag} class=x>after</div>");
			let doc = Document::parse(&raw).expect("Parse failed.");
			let div = doc.children(doc.root())[0];
			assert_eq!(doc.children(div).len(), 2, "{tag} should not have children.");

			let void = doc.children(div)[0];
			assert!(doc.children(void).is_empty());
			assert!(doc.kind(void).as_element().is_some_and(Element::no_body));
			assert_eq!(doc.to_string(), raw);
			assert_eq!(
				doc.minified_outer_html(doc.root(), true),
				format!("<div><{tag} class=x/>after</div>"),
			);
		}
	}

	#[test]
	fn t_repair_nested() {
		let doc = Document::parse("<a><b><c>text</a>").expect("Parse failed.");
		let root = doc.root();
		assert_eq!(names(&doc, root), ["a"]);

		let a = doc.children(root)[0];
		assert_eq!(names(&doc, a), ["b"]);
		let b = doc.children(a)[0];
		assert_eq!(names(&doc, b), ["c"]);
		let c = doc.children(b)[0];
		assert_eq!(names(&doc, c), ["#text"]);

		let flag = |id| doc.kind(id).as_element().map(Element::not_closed);
		assert_eq!(flag(a), Some(false));
		assert_eq!(flag(b), Some(true));
		assert_eq!(flag(c), Some(true));

		assert_eq!(doc.to_string(), "<a><b><c>text</a>");
		assert_eq!(doc.minified_outer_html(root, false), "<a><b><c>text</a>");
		assert_eq!(doc.minified_outer_html(root, true), "<a><b><c>text</c></b></a>");
	}

	#[test]
	fn t_repair_reopen() {
		let raw = "<b><i>one</b>two</i>three";
		let doc = Document::parse(raw).expect("Parse failed.");
		let root = doc.root();
		assert_eq!(names(&doc, root), ["b", "i", "#three"]);

		let i2 = doc.children(root)[1];
		assert!(doc.kind(i2).as_element().is_some_and(Element::reopened));
		assert_eq!(names(&doc, i2), ["#two"]);

		// The source never opened the clone, so raw output matches.
		assert_eq!(doc.to_string(), raw);
		assert_eq!(
			doc.minified_outer_html(root, true),
			"<b><i>one</i></b><i>two</i>three",
		);
	}

	#[test]
	fn t_orphan() {
		let doc = Document::parse("</b>hello").expect("Parse failed.");
		assert_eq!(names(&doc, doc.root()), ["#hello"]);

		let doc = Document::parse_with(
			"<p>a</b>c</p>",
			ParseOptions::default().with_keep_orphans(true),
		).expect("Parse failed.");
		assert_eq!(doc.to_string(), "<p>a</b>c</p>");
		assert_eq!(doc.minified_outer_html(doc.root(), false), "<p>ac</p>");
	}

	#[test]
	fn t_case() {
		// The stack search is case-sensitive.
		let doc = Document::parse("<div><p>x</DIV>y").expect("Parse failed.");
		let div = doc.children(doc.root())[0];
		assert_eq!(names(&doc, div), ["p"]);
		assert_eq!(doc.to_string(), "<div><p>xy");

		// But the current element matches regardless.
		let doc = Document::parse("<P>x</p>").expect("Parse failed.");
		assert_eq!(doc.minified_outer_html(doc.root(), false), "<P>x</P>");
	}

	#[test]
	fn t_script() {
		let doc = Document::parse(r#"<script>var s = "</script>";</script>"#)
			.expect("Parse failed.");
		let script = doc.children(doc.root())[0];
		let NodeKind::Script(raw) = doc.kind(script) else { panic!("Expected a script."); };
		assert_eq!(raw.content(), r#"var s = "</script>";"#);
		assert!(! raw.element().not_closed());

		// JSON is scanned literally.
		let doc = Document::parse(r#"<script type="application/json">{"a":"</script>"}"#)
			.expect("Parse failed.");
		let script = doc.children(doc.root())[0];
		let NodeKind::Script(raw) = doc.kind(script) else { panic!("Expected a script."); };
		assert_eq!(raw.content(), r#"{"a":""#);

		// Unterminated.
		let doc = Document::parse("<style>a{}").expect("Parse failed.");
		assert_eq!(doc.to_string(), "<style>a{}");
	}

	#[test]
	fn t_command() {
		let raw = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN"  "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"><p>x</p>"#;
		let doc = Document::parse(raw).expect("Parse failed.");
		assert_eq!(doc.to_string(), raw);
		assert_eq!(
			doc.minified_outer_html(doc.root(), false),
			r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"><p>x</p>"#,
		);

		let NodeKind::Command(cmd) = doc.kind(doc.children(doc.root())[0]) else {
			panic!("Expected a command.");
		};
		assert_eq!(cmd.name(), "DOCTYPE");
		assert_eq!(cmd.attrs.iter().count(), 4);
	}

	#[test]
	fn t_comment() {
		let doc = Document::parse("<p>a</p><!-- b").expect("Parse failed.");
		let comment = doc.children(doc.root())[1];
		assert!(matches!(
			doc.kind(comment),
			NodeKind::Comment { content, not_closed: true } if content == " b",
		));
		assert_eq!(doc.to_string(), "<p>a</p><!-- b");
		assert_eq!(doc.minified_outer_html(doc.root(), false), "<p>a</p>");

		let doc = Document::parse("<!--a-->").expect("Parse failed.");
		assert!(matches!(
			doc.kind(doc.children(doc.root())[0]),
			NodeKind::Comment { not_closed: false, .. },
		));
	}

	#[test]
	fn t_errors() {
		for (raw, kind) in [
			("a < b", ParseErrorKind::TagName),
			("<>", ParseErrorKind::TagName),
			("</>", ParseErrorKind::TagName),
			("<!>", ParseErrorKind::TagName),
			("<a =b>", ParseErrorKind::AttributeName),
			("<a href", ParseErrorKind::UnexpectedEof),
			("<p>x</p", ParseErrorKind::UnexpectedEof),
		] {
			let err = Document::parse(raw).expect_err("Parse should fail.");
			assert_eq!(err.kind(), kind, "{raw:?}");
		}
	}

	#[test]
	fn t_trim_start() {
		let doc = Document::parse_with(
			"\u{feff}  \n<p>x</p>",
			ParseOptions::default().with_trim_start(true),
		).expect("Parse failed.");
		assert_eq!(doc.to_string(), "<p>x</p>");
	}
}
