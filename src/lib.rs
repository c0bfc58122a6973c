/*!
# Minweb

Minweb is a reader-mode HTML reducer. It parses arbitrary, often malformed,
markup into a tree, prunes and rewrites that tree according to a handful of
options, and spits out a minified copy suitable for relaying to a reader.

Unlike a spec-complete HTML5 parser, Minweb makes no attempt to guess at
implied tags or decode entities. What it does do is keep track of the
elements left open, repairing unbalanced markup as it goes, so the output
nests the same way the input (probably) meant to.



## Use

```
use minweb::{FilterOptions, Theme};

let opts = FilterOptions::default()
    .with_url("https://example.com/posts/hello.html")
    .with_theme(Theme::Light);

let out = minweb::minify_html(
    r#"<html><body><p>See <a href="next.html">the next one</a>!</p><script>x()</script></body></html>"#,
    &opts,
).unwrap();

assert!(out.contains(r#"<a href="https://example.com/posts/next.html">"#));
assert!(! out.contains("<script>"));
```

For finer control, parse a [`Document`] once and [`minify`] it as many
times as needed with different options, or walk and edit it yourself with
[`walk`] and [`walk_reversed`].



## Filters

In order, the pipeline:

1. Strips comments;
2. Drops skipped tags (`script`, `img`, and `svg` by default);
3. In article mode, keeps only `<article>` content (and metadata);
4. In text mode, keeps only text-bearing markup;
5. Turns `<iframe>`s into links, if `iframe` is skipped;
6. Resolves relative URLs, if the page URL is known;
7. Runs text through a decorator, if any;
8. Removes empty `<div>`s and unwraps single-child ones;
9. Brackets the `<body>` with an opt-out link and theme styles;
10. Adds mobile `<meta>` tags and readability stylesheets, if asked.
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod dom;
mod error;
mod filter;
mod minify;
mod scan;
mod ser;
pub mod spec;
mod theme;
mod url;
mod walk;

pub use dom::{
	Descendants,
	Document,
	node::{
		Attribute,
		Attributes,
		Command,
		Element,
		Node,
		NodeId,
		NodeKind,
		RawText,
	},
	parse::ParseOptions,
};
pub use error::{
	ParseError,
	ParseErrorKind,
};
pub use minify::{
	Article,
	FilterOptions,
	Readability,
	minify,
	minify_html,
	minify_in_place,
};
pub use theme::{
	TextDecorator,
	Theme,
	debug_text_decorator,
	plain_text_decorator,
};
pub use self::url::UrlFixer;
pub use walk::{
	Action,
	walk,
	walk_reversed,
};



/// # Parse.
///
/// Parse an HTML document or fragment with the default options.
///
/// ## Errors
///
/// An error is returned only if a mandatory token, like a tag name, is
/// missing. Unbalanced markup is repaired rather than rejected.
pub fn parse(html: &str) -> Result<Document, ParseError> { Document::parse(html) }

#[must_use]
/// # Serialize.
///
/// Reconstruct the raw (unminified) markup for the whole document.
pub fn serialize(doc: &Document) -> String { doc.to_string() }
