/*!
# Minweb: Filter Passes.

Each pass is a full walk of the tree. The order in which `minify_in_place`
runs them matters: later passes rely on the pruning done by earlier ones.
*/

use crate::{
	Action,
	Document,
	FilterOptions,
	NodeId,
	NodeKind,
	Theme,
	TextDecorator,
	dom::node::{
		Command,
		Element,
		unquote,
	},
	spec::{
		self,
		MOBILE_META,
		OPT_OUT_CLASS,
		STYLESHEETS,
		TAG_ARTICLE,
		TAG_IFRAME,
		TAG_WHITELIST,
		TEXT_BLACKLIST,
	},
	theme::{
		opt_out_html,
		separator_html,
	},
	url::{
		UrlFixer,
		add_prefix,
		is_http,
	},
	walk,
	walk_reversed,
};
use tracing::warn;



/// # Article Keepers.
const ARTICLE_KEEP: [&str; 5] = [TAG_ARTICLE, "head", "style", "link", "meta"];



/// # Has Opt-Out Marker?
///
/// Look for an element carrying the marker class, or text mentioning it.
pub(crate) fn has_opt_out(doc: &Document) -> bool {
	doc.descendants(doc.root()).any(|id| match doc.kind(id) {
		NodeKind::Text(t) => t.contains(OPT_OUT_CLASS),
		k => is_opt_out(k),
	})
}

/// # Pass #1: Strip Comments.
pub(crate) fn strip_comments(doc: &mut Document) {
	walk(doc, |doc, id|
		if doc.kind(id).is_comment() { Action::Detach }
		else { Action::Continue }
	);
}

/// # Pass #2: Skip Tags.
///
/// Drop the unwanted elements. Skipping `style` takes `link` and inline
/// `style` attributes with it; skipping `script` too strips `class`, `id`,
/// and `data-*` attributes, since nothing is left to use them.
///
/// Opt-out markers from an earlier run are left exactly as they are.
pub(crate) fn skip_tags(doc: &mut Document, opts: &FilterOptions) {
	let skip_style = opts.skips("style");
	let plain = skip_style && opts.skips("script");

	walk(doc, |doc, id| {
		let kind = doc.kind_mut(id);
		let Some(name) = kind.tag_name() else { return Action::Continue; };
		if kind.is_command() { return Action::Continue; }
		if is_opt_out(kind) { return Action::Skip; }
		if can_skip(name, opts, skip_style) { return Action::Detach; }

		if let Some(attrs) = kind.attrs_mut() {
			if skip_style { attrs.remove("style"); }
			if plain {
				attrs.retain(|a|
					! a.name().eq_ignore_ascii_case("class") &&
					! a.name().eq_ignore_ascii_case("id") &&
					! a.name().get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data-"))
				);
			}
		}

		Action::Continue
	});
}

/// # Pass #3: Article Mode.
///
/// Keep only the subtrees that are or contain an `<article>` or metadata
/// element, plus any opt-out marker from an earlier run.
///
/// Returns `false`, leaving the tree alone, if there is no `<article>`
/// anywhere.
pub(crate) fn article(doc: &mut Document) -> bool {
	if doc.find(TAG_ARTICLE).is_none() { return false; }

	walk(doc, |doc, id| {
		let kind = doc.kind(id);
		if kind.is_command() || kind.is_any_tag_name(&ARTICLE_KEEP) || is_opt_out(kind) {
			Action::Skip
		}
		else if kind.as_element().is_some() && doc.has_element_by_any_tag_name(id, &ARTICLE_KEEP) {
			Action::Continue
		}
		else { Action::Detach }
	});

	true
}

/// # Pass #4: Text Mode.
///
/// Drop everything that isn't, or doesn't contain, text. Opt-out markers
/// are kept.
pub(crate) fn text_only(doc: &mut Document) {
	walk(doc, |doc, id| {
		let kind = doc.kind(id);
		if
			kind.is_text() ||
			kind.is_command() ||
			kind.is_any_tag_name(&TAG_WHITELIST) ||
			is_opt_out(kind)
		{
			Action::Skip
		}
		else if kind.is_any_tag_name(&TEXT_BLACKLIST) || ! doc.has_text(id) { Action::Detach }
		else { Action::Continue }
	});
}

/// # Pass #5: Neutralize Iframes.
///
/// Replace each `<iframe>` with a plain link to its source.
pub(crate) fn iframes(doc: &mut Document) {
	walk(doc, |doc, id| {
		if ! doc.is_tag_name(id, TAG_IFRAME) { return Action::Continue; }

		let Some(src) = doc.kind(id).attrs()
			.and_then(|a| a.get_raw("src"))
			.map(String::from)
		else { return Action::Detach; };

		let label = format!("iframe: {}", unquote(&src));
		*doc.kind_mut(id) = NodeKind::Element(Element::new("a").with_attr("href", Some(&src)));
		doc.set_only_child(id, NodeKind::Text(label));
		Action::Skip
	});
}

/// # Pass #6: Absolutize URLs.
///
/// Links and form actions also get the relay prefix, if any, once they
/// point somewhere on the web.
pub(crate) fn urls(doc: &mut Document, fixer: &UrlFixer, prefix: &str) {
	walk(doc, |doc, id| {
		let kind = doc.kind_mut(id);
		let (attr, prefixed) =
			if kind.is_tag_name("a") { ("href", true) }
			else if kind.is_tag_name("form") { ("action", true) }
			else if kind.is_tag_name("link") { ("href", false) }
			else if kind.is_tag_name("img") { ("src", false) }
			else { return Action::Continue; };

		if let Some(attrs) = kind.attrs_mut() {
			let Some(mut new) = attrs.get_raw(attr).map(|v| fixer.fix(v))
			else { return Action::Continue; };

			if prefixed && ! prefix.is_empty() && is_http(&new) {
				new = add_prefix(&new, prefix);
			}
			attrs.set(attr, Some(&new));
		}

		Action::Continue
	});
}

/// # Pass #7: Decorate Text.
pub(crate) fn decorate(doc: &mut Document, cb: &TextDecorator) {
	walk(doc, |doc, id| {
		if let NodeKind::Text(t) = doc.kind_mut(id) { *t = cb(t); }
		Action::Continue
	});
}

/// # Pass #8: Structural Cleanup.
///
/// Remove blank `<div>`s and unwrap single-child ones, children first, then
/// merge whatever text ended up side by side.
pub(crate) fn cleanup(doc: &mut Document) {
	walk_reversed(doc, |doc, id| {
		if ! doc.is_tag_name(id, "div") || is_opt_out(doc.kind(id)) { Action::Continue }
		else if doc.is_blank(id) { Action::Detach }
		else if doc.children(id).len() == 1 { Action::Fold }
		else { Action::Continue }
	});

	doc.merge_text();
}

/// # Pass #9: Theme and Opt-Out.
///
/// Bracket the body content with the opt-out marker, separators, and theme
/// styles. Fragments (no `<body>` or `<html>`) are left alone.
pub(crate) fn theme(doc: &mut Document, theme: Theme, url: Option<&str>) {
	let Some(body) = doc.body().or_else(|| doc.html().map(|html| synthesize_body(doc, html)))
	else { return; };

	let marker = opt_out_html(url);
	if doc.children(body).is_empty() {
		for id in graft(doc, &marker) { doc.append_child(body, id); }
		return;
	}

	let mut lead = graft(doc, &marker);
	lead.extend(graft(doc, &separator_html()));
	lead.extend(graft(doc, theme.css()));
	for (idx, id) in lead.into_iter().enumerate() { doc.insert_child(body, idx, id); }

	let mut tail = graft(doc, &separator_html());
	tail.extend(graft(doc, &marker));
	for id in tail { doc.append_child(body, id); }
}

/// # Pass #10: Mobile and Readability Styles.
///
/// Everything is added only if missing.
pub(crate) fn inject_style(doc: &mut Document) {
	ensure_doctype(doc);

	let html = doc.html().unwrap_or_else(|| synthesize_html(doc));
	if let Some(attrs) = doc.kind_mut(html).attrs_mut() {
		if ! attrs.has("lang") { attrs.set("lang", Some("\"en\"")); }
		if ! attrs.has("dir") { attrs.set("dir", Some("\"ltr\"")); }
	}

	let head = doc.head().unwrap_or_else(|| {
		let head = doc.create(NodeKind::Element(Element::new("head")));
		doc.insert_child(html, 0, head);
		head
	});
	let body = doc.body().unwrap_or_else(|| synthesize_body(doc, html));

	// Mobile meta, in order, at the top of the head.
	let mut idx = 0;
	for attrs in MOBILE_META {
		let Some(&(key, value)) = attrs.first() else { continue; };
		if has_meta(doc, key, value) { continue; }

		let mut el = Element::new("meta");
		for &(k, v) in attrs { el.attrs.set(k, Some(format!("\"{v}\"").as_str())); }
		let id = doc.create(NodeKind::Element(el));
		doc.insert_child(head, idx, id);
		idx += 1;
	}

	// Stylesheets at the end of the body.
	for href in STYLESHEETS {
		let exists = doc.get_elements_by_tag_name(doc.root(), "link")
			.into_iter()
			.any(|l| doc.kind(l).attrs().and_then(|a| a.get("href")) == Some(href));
		if ! exists {
			doc.append(body, NodeKind::Element(
				Element::new("link")
					.with_attr("rel", Some("\"stylesheet\""))
					.with_attr("href", Some(format!("\"{href}\"").as_str()))
			));
		}
	}
}



/// # Can Skip?
fn can_skip(name: &str, opts: &FilterOptions, skip_style: bool) -> bool {
	if name.eq_ignore_ascii_case("style") || name.eq_ignore_ascii_case("link") { skip_style }
	else if spec::is_whitelisted_tag(name) || name.eq_ignore_ascii_case(TAG_IFRAME) { false }
	else { opts.skips(name) }
}

/// # Is Opt-Out Element?
fn is_opt_out(kind: &NodeKind) -> bool {
	kind.attrs()
		.and_then(|a| a.get("class"))
		.is_some_and(|c| c.split_ascii_whitespace().any(|c| c == OPT_OUT_CLASS))
}

/// # Has Meta?
///
/// Charsets match by presence; everything else by value too.
fn has_meta(doc: &Document, key: &str, value: &str) -> bool {
	doc.get_elements_by_tag_name(doc.root(), "meta")
		.into_iter()
		.filter_map(|m| doc.kind(m).attrs())
		.any(|a|
			if key.eq_ignore_ascii_case("charset") { a.has(key) }
			else { a.get(key).is_some_and(|v| v.eq_ignore_ascii_case(value)) }
		)
}

/// # Ensure Doctype.
fn ensure_doctype(doc: &mut Document) {
	let root = doc.root();
	let found = doc.children(root).iter()
		.find(|c| ! matches!(doc.kind(**c), NodeKind::Text(t) if spec::is_whitespace_str(t)))
		.is_some_and(|c| matches!(
			doc.kind(*c),
			NodeKind::Command(cmd) if cmd.name().eq_ignore_ascii_case("doctype")
		));

	if ! found {
		let mut cmd = Command::new("DOCTYPE");
		cmd.attrs.set("html", None);
		let id = doc.create(NodeKind::Command(cmd));
		doc.insert_child(root, 0, id);
	}
}

/// # Graft Markup.
///
/// Parse a bit of fixed markup and copy its nodes into the document,
/// returning them (detached) in order.
fn graft(doc: &mut Document, html: &str) -> Vec<NodeId> {
	match Document::parse(html) {
		Ok(frag) => doc.adopt(&frag),
		Err(e) => {
			warn!(error = %e, "unable to graft markup");
			Vec::new()
		},
	}
}

/// # Synthesize `<body>`.
///
/// Move everything in `<html>` but the `<head>` into a new `<body>`.
fn synthesize_body(doc: &mut Document, html: NodeId) -> NodeId {
	let kids: Vec<NodeId> = doc.children(html).iter()
		.copied()
		.filter(|c| ! doc.is_tag_name(*c, "head"))
		.collect();

	let body = doc.append(html, NodeKind::Element(Element::new("body")));
	for k in kids { doc.append_child(body, k); }
	body
}

/// # Synthesize `<html>`.
///
/// Move everything but commands (doctype) into a new `<html>`.
fn synthesize_html(doc: &mut Document) -> NodeId {
	let root = doc.root();
	let kids: Vec<NodeId> = doc.children(root).iter()
		.copied()
		.filter(|c| ! doc.kind(*c).is_command())
		.collect();

	let html = doc.append(root, NodeKind::Element(Element::new("html")));
	for k in kids { doc.append_child(html, k); }
	html
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Parse and Run.
	fn run<F: Fn(&mut Document)>(html: &str, cb: F) -> String {
		let mut doc = Document::parse(html).expect("Parse failed.");
		cb(&mut doc);
		doc.minified_outer_html(doc.root(), false)
	}

	#[test]
	fn t_skip_tags() {
		let opts = FilterOptions::default()
			.with_skip_tags(["style", "SCRIPT", "link", "head"]);
		assert_eq!(
			run(
				concat!(
					r#"<link rel="x"><style>a{}</style>"#,
					r#"<p class="c" id="i" data-x="1" style="color:red" title="t">x</p>"#,
					"<head></head><iframe src=x></iframe><script>x()</script>",
				),
				|doc| skip_tags(doc, &opts),
			),
			r#"<p title="t">x</p><head></head><iframe src=x></iframe>"#,
		);

		// Style alone only takes the style attribute.
		let opts = FilterOptions::default().with_skip_tags(["style"]);
		assert_eq!(
			run(r#"<p class="c" style="x">x</p><script>x()</script>"#, |doc| skip_tags(doc, &opts)),
			r#"<p class="c">x</p><script>x()</script>"#,
		);
	}

	#[test]
	fn t_article() {
		let raw = concat!(
			"<!DOCTYPE html><html><head><title>T</title></head><body>",
			"<nav>menu</nav><div><article><p>Story</p></article></div><footer>f</footer>",
			"</body></html>",
		);
		let mut doc = Document::parse(raw).expect("Parse failed.");
		assert!(article(&mut doc));
		assert_eq!(
			doc.minified_outer_html(doc.root(), false),
			"<!DOCTYPE html><html><head><title>T</title></head><body><div><article><p>Story</p></article></div></body></html>",
		);

		// No article, no change.
		let mut doc = Document::parse("<p>x</p>").expect("Parse failed.");
		assert!(! article(&mut doc));
		assert_eq!(doc.to_string(), "<p>x</p>");
	}

	#[test]
	fn t_text_only() {
		assert_eq!(
			run(
				"<body><nav><a>x</a></nav><div><img src=a.png><p>Keep <b>me</b></p><span></span></div><button>b</button></body>",
				text_only,
			),
			"<body><div><p>Keep <b>me</b></p></div></body>",
		);
	}

	#[test]
	fn t_iframes() {
		assert_eq!(
			run(r#"<p>a</p><iframe src="https://v.com/e/1"></iframe><iframe></iframe>"#, iframes),
			r#"<p>a</p><a href="https://v.com/e/1">iframe: https://v.com/e/1</a>"#,
		);
	}

	#[test]
	fn t_urls() {
		let fixer = UrlFixer::new("http://example.com/dir/page.html").expect("Invalid URL.");
		let raw = r##"<img src="pic.png"><a href="/x">x</a><a href="#top">t</a><form action=go></form><link href="//cdn.com/a.css">"##;
		assert_eq!(
			run(raw, |doc| urls(doc, &fixer, "")),
			r##"<img src="http://example.com/dir/pic.png"/><a href="http://example.com/x">x</a><a href="#top">t</a><form action=http://example.com/dir/go></form><link href="http://cdn.com/a.css"/>"##,
		);
		assert_eq!(
			run(raw, |doc| urls(doc, &fixer, "/r/")),
			r##"<img src="http://example.com/dir/pic.png"/><a href="/r/http://example.com/x">x</a><a href="#top">t</a><form action=/r/http://example.com/dir/go></form><link href="http://cdn.com/a.css"/>"##,
		);
	}

	#[test]
	fn t_cleanup() {
		assert_eq!(
			run("<div><div><div><p>x</p></div></div></div><div>  </div><div><!-- c --></div>", cleanup),
			"<p>x</p>",
		);

		let mut doc = Document::parse("<b>a</b><div>b</div>c").expect("Parse failed.");
		cleanup(&mut doc);
		assert_eq!(doc.children(doc.root()).len(), 2);
		assert_eq!(doc.to_string(), "<b>a</b>bc");
	}

	#[test]
	fn t_theme() {
		// Empty bodies just get the marker.
		let out = run("<html><body></body></html>", |doc| theme(doc, Theme::Dark, None));
		assert_eq!(out.matches(OPT_OUT_CLASS).count(), 1);
		assert!(! out.contains("<style>"));

		// Missing bodies are synthesized.
		let out = run(
			"<html><head></head><p>x</p></html>",
			|doc| theme(doc, Theme::Light, Some("http://x.com/")),
		);
		let marker = opt_out_html(Some("http://x.com/"));
		assert_eq!(
			out,
			format!(
				"<html><head></head><body>{marker}{hr}{}<p>x</p>{hr}{marker}</body></html>",
				Theme::Light.css(),
				hr = r#"<hr class="minweb-opt-out"/>"#,
			),
		);
		assert!(has_opt_out(&Document::parse(&out).expect("Parse failed.")));

		// Fragments are ignored.
		assert_eq!(run("<p>x</p>", |doc| theme(doc, Theme::Dark, None)), "<p>x</p>");
	}

	#[test]
	fn t_inject_style() {
		let expected = concat!(
			"<!DOCTYPE html><html lang=\"en\" dir=\"ltr\"><head>",
			"<meta charset=\"UTF-8\"/>",
			"<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\"/>",
			"<meta name=\"HandheldFriendly\" content=\"true\"/>",
			"</head><body><p>x</p>",
			"<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/normalize.css@8/normalize.min.css\"/>",
			"<link rel=\"stylesheet\" href=\"https://cdn.jsdelivr.net/npm/water.css@2/out/light.min.css\"/>",
			"</body></html>",
		);
		assert_eq!(run("<p>x</p>", inject_style), expected);

		// A second run changes nothing.
		assert_eq!(run(expected, inject_style), expected);

		// Existing bits are respected.
		let out = run(
			"<!doctype html>\n<html lang=fr><head><meta charset=latin1></head><body></body></html>",
			inject_style,
		);
		assert!(out.starts_with("<!doctype html>\n<html lang=fr dir=\"ltr\"><head><meta name=\"viewport\""));
		assert_eq!(out.matches("charset").count(), 1);
	}
}
