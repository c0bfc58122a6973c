/*!
# Minweb: Minification.
*/

use crate::{
	Document,
	ParseError,
	ParseOptions,
	TextDecorator,
	Theme,
	UrlFixer,
	filter,
	spec::{
		DEFAULT_SKIP_TAGS,
		TAG_ARTICLE,
		TAG_IFRAME,
	},
};
use std::{
	fmt,
	sync::Arc,
};
use tracing::{
	debug,
	warn,
};



/// # Article Extraction.
///
/// A stand-in for an external "readability" library, consulted in article
/// mode when a page has no `<article>` of its own.
pub trait Readability {
	/// # Extract.
	///
	/// Pull the main content out of the raw HTML, or return `None` if there
	/// isn't anything worth keeping.
	fn extract(&self, html: &str, url: Option<&str>) -> Option<Article>;
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Extracted Article.
pub struct Article {
	/// # Title (Plain Text).
	title: String,

	/// # Content (HTML).
	content: String,
}

impl Article {
	#[must_use]
	/// # New.
	pub fn new<T, C>(title: T, content: C) -> Self
	where T: Into<String>, C: Into<String> {
		Self { title: title.into(), content: content.into() }
	}

	#[must_use]
	/// # Title.
	pub fn title(&self) -> &str { &self.title }

	#[must_use]
	/// # Content.
	pub fn content(&self) -> &str { &self.content }

	#[must_use]
	/// # As Document Markup.
	///
	/// Wrap the content in a minimal document, with the title repeated as
	/// the top-level heading.
	pub fn to_html(&self) -> String {
		let title = escape_text(&self.title);
		format!(
			"<html><head><meta charset=\"UTF-8\"><title>{title}</title></head><body><h1>{title}</h1>{}</body></html>",
			self.content,
		)
	}
}



#[derive(Clone)]
/// # Filter Options.
///
/// The default configuration drops scripts, images, and SVGs, and otherwise
/// leaves the content alone.
///
/// ## Examples
///
/// ```
/// use minweb::{FilterOptions, Theme};
///
/// let opts = FilterOptions::default()
///     .with_skip_tags(["script", "iframe"])
///     .with_url("https://example.com/blog/")
///     .with_theme(Theme::Dark);
///
/// assert!(opts.skips("IFRAME"));
/// assert!(! opts.skips("img"));
/// ```
pub struct FilterOptions {
	/// # Skipped Tags (Lowercase).
	skip_tags: Vec<String>,

	/// # Page URL.
	url: Option<String>,

	/// # Link Prefix.
	href_prefix: String,

	/// # Article Mode.
	article_mode: bool,

	/// # Text Mode.
	text_mode: bool,

	/// # Inject Mobile/Readability Styles.
	inject_style: bool,

	/// # Theme.
	theme: Theme,

	/// # Text Decorator.
	text_decorator: Option<TextDecorator>,

	/// # Close Everything?
	auto_repair: bool,

	/// # Readability Fallback.
	readability: Option<Arc<dyn Readability + Send + Sync>>,
}

impl Default for FilterOptions {
	fn default() -> Self {
		Self {
			skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| (*t).to_owned()).collect(),
			url: None,
			href_prefix: String::new(),
			article_mode: false,
			text_mode: false,
			inject_style: false,
			theme: Theme::Default,
			text_decorator: None,
			auto_repair: false,
			readability: None,
		}
	}
}

impl fmt::Debug for FilterOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FilterOptions")
			.field("skip_tags", &self.skip_tags)
			.field("url", &self.url)
			.field("href_prefix", &self.href_prefix)
			.field("article_mode", &self.article_mode)
			.field("text_mode", &self.text_mode)
			.field("inject_style", &self.inject_style)
			.field("theme", &self.theme)
			.field("text_decorator", &self.text_decorator.is_some())
			.field("auto_repair", &self.auto_repair)
			.field("readability", &self.readability.is_some())
			.finish()
	}
}

/// # Setters.
impl FilterOptions {
	#[must_use]
	/// # With Skipped Tags.
	///
	/// Replace the skip list. Names are matched case-insensitively; blank
	/// entries are ignored.
	pub fn with_skip_tags<I, S>(mut self, tags: I) -> Self
	where I: IntoIterator<Item=S>, S: AsRef<str> {
		self.skip_tags = tags.into_iter()
			.filter_map(|t| {
				let t = t.as_ref().trim();
				if t.is_empty() { None }
				else { Some(t.to_ascii_lowercase()) }
			})
			.collect();
		self
	}

	#[must_use]
	/// # With Page URL.
	///
	/// Relative links are resolved against this.
	pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
		self.url = Some(url.into());
		self
	}

	#[must_use]
	/// # With Link Prefix.
	///
	/// Rewritten `<a href>` and `<form action>` values get this prepended,
	/// typically so they route back through a relay. It has no effect
	/// without a URL.
	pub fn with_href_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
		self.href_prefix = prefix.into();
		self
	}

	#[must_use]
	/// # With Article Mode.
	pub const fn with_article_mode(mut self, on: bool) -> Self {
		self.article_mode = on;
		self
	}

	#[must_use]
	/// # With Text Mode.
	pub const fn with_text_mode(mut self, on: bool) -> Self {
		self.text_mode = on;
		self
	}

	#[must_use]
	/// # With Style Injection.
	pub const fn with_inject_style(mut self, on: bool) -> Self {
		self.inject_style = on;
		self
	}

	#[must_use]
	/// # With Theme.
	pub const fn with_theme(mut self, theme: Theme) -> Self {
		self.theme = theme;
		self
	}

	#[must_use]
	/// # With Text Decorator.
	pub fn with_text_decorator(mut self, cb: TextDecorator) -> Self {
		self.text_decorator = Some(cb);
		self
	}

	#[must_use]
	/// # With Auto-Repair.
	///
	/// Close every element in the output, even those the source left open.
	pub const fn with_auto_repair(mut self, on: bool) -> Self {
		self.auto_repair = on;
		self
	}

	#[must_use]
	/// # With Readability Fallback.
	pub fn with_readability(mut self, cb: Arc<dyn Readability + Send + Sync>) -> Self {
		self.readability = Some(cb);
		self
	}
}

/// # Getters.
impl FilterOptions {
	#[must_use]
	/// # Skipped Tags.
	pub fn skip_tags(&self) -> &[String] { &self.skip_tags }

	#[must_use]
	/// # Skips Tag?
	pub fn skips(&self, tag: &str) -> bool {
		self.skip_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
	}

	#[must_use]
	/// # Page URL.
	pub fn url(&self) -> Option<&str> { self.url.as_deref() }

	#[must_use]
	/// # Link Prefix.
	pub fn href_prefix(&self) -> &str { &self.href_prefix }

	#[must_use]
	/// # Article Mode?
	pub const fn article_mode(&self) -> bool { self.article_mode }

	#[must_use]
	/// # Text Mode?
	pub const fn text_mode(&self) -> bool { self.text_mode }

	#[must_use]
	/// # Inject Styles?
	pub const fn inject_style(&self) -> bool { self.inject_style }

	#[must_use]
	/// # Theme.
	pub const fn theme(&self) -> Theme { self.theme }

	#[must_use]
	/// # Auto-Repair?
	pub const fn auto_repair(&self) -> bool { self.auto_repair }
}



#[must_use]
/// # Minify.
///
/// Run the filter pipeline over a copy of the document and return the
/// minified markup. The original is left untouched.
pub fn minify(doc: &Document, opts: &FilterOptions) -> String {
	let mut doc = doc.clone();
	minify_in_place(&mut doc, opts)
}

/// # Minify In Place.
///
/// Same as `minify`, but without the copy; the document is left in its
/// filtered state.
pub fn minify_in_place(doc: &mut Document, opts: &FilterOptions) -> String {
	if opts.article_mode && doc.find(TAG_ARTICLE).is_none() {
		if let Some(out) = readability(doc, opts) { return out; }
		debug!("no <article> found; keeping the whole document");
	}

	let guarded = filter::has_opt_out(doc);

	filter::strip_comments(doc);
	filter::skip_tags(doc, opts);
	if opts.article_mode { filter::article(doc); }
	if opts.text_mode { filter::text_only(doc); }
	if opts.skips(TAG_IFRAME) { filter::iframes(doc); }
	if let Some(url) = opts.url.as_deref() {
		if let Some(fixer) = UrlFixer::new(url) {
			filter::urls(doc, &fixer, &opts.href_prefix);
		}
		else { debug!(url, "unusable page URL; links left as-is"); }
	}
	if let Some(cb) = opts.text_decorator.as_ref() { filter::decorate(doc, cb); }
	filter::cleanup(doc);
	if guarded { debug!("opt-out marker already present"); }
	else { filter::theme(doc, opts.theme, opts.url.as_deref()); }
	if opts.inject_style { filter::inject_style(doc); }

	let out = doc.minified_outer_html(doc.root(), opts.auto_repair);
	debug!(nodes = doc.descendants(doc.root()).count(), bytes = out.len(), "minified document");
	out
}

/// # Minify HTML.
///
/// Parse and minify in one go. Leading whitespace and byte-order marks are
/// ignored.
///
/// ## Examples
///
/// ```
/// use minweb::{FilterOptions, minify_html};
///
/// let out = minify_html(
///     "<div>  <script>x()</script>  </div><p>Hello <!-- c -->World</p>",
///     &FilterOptions::default(),
/// ).unwrap();
/// assert_eq!(out, "<p>Hello World</p>");
/// ```
///
/// ## Errors
///
/// Returns an error if the markup cannot be tokenized.
pub fn minify_html(html: &str, opts: &FilterOptions) -> Result<String, ParseError> {
	let mut doc = Document::parse_with(html, ParseOptions::default().with_trim_start(true))?;
	Ok(minify_in_place(&mut doc, opts))
}



/// # Readability Fallback.
///
/// Hand the page to the extractor, if any, and minify what comes back with
/// article mode off.
fn readability(doc: &Document, opts: &FilterOptions) -> Option<String> {
	let reader = opts.readability.as_ref()?;
	let article = reader.extract(&doc.to_string(), opts.url.as_deref())?;
	debug!(title = article.title(), "using readability fallback");

	match Document::parse(&article.to_html()) {
		Ok(mut synth) => {
			let opts = opts.clone().with_article_mode(false);
			Some(minify_in_place(&mut synth, &opts))
		},
		Err(e) => {
			warn!(error = %e, "readability content could not be parsed");
			None
		},
	}
}

/// # Escape Text.
fn escape_text(src: &str) -> String {
	let mut out = String::with_capacity(src.len());
	for c in src.chars() {
		match c {
			'&' => { out.push_str("&amp;"); },
			'<' => { out.push_str("&lt;"); },
			'>' => { out.push_str("&gt;"); },
			c => { out.push(c); },
		}
	}
	out
}
