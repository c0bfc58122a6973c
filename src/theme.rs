/*!
# Minweb: Themes and Decorators.
*/

use crate::spec::OPT_OUT_CLASS;
use std::{
	fmt,
	sync::{
		Arc,
		atomic::{
			AtomicUsize,
			Ordering::Relaxed,
		},
	},
};



/// # Text Decorator.
///
/// A callback applied to the (raw) contents of every text node.
pub type TextDecorator = Arc<dyn Fn(&str) -> String + Send + Sync>;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Color Theme.
pub enum Theme {
	#[default]
	/// # Whatever the Page Says.
	Default,

	/// # Light.
	Light,

	/// # Dark.
	Dark,

	/// # Console.
	Console,
}

impl fmt::Display for Theme {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<&str> for Theme {
	#[inline]
	fn from(src: &str) -> Self { Self::from_name(src) }
}

impl Theme {
	/// # All Themes.
	pub const ALL: [Self; 4] = [Self::Default, Self::Light, Self::Dark, Self::Console];

	#[must_use]
	/// # From Name.
	///
	/// Names are case-insensitive. Unrecognized names quietly fall back to
	/// the default.
	pub fn from_name(src: &str) -> Self {
		let src = src.trim();
		Self::ALL.into_iter()
			.find(|t| t.as_str().eq_ignore_ascii_case(src))
			.unwrap_or_default()
	}

	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Default => "default",
			Self::Light => "light",
			Self::Dark => "dark",
			Self::Console => "console",
		}
	}

	#[must_use]
	/// # Style Block.
	///
	/// Return the `<style>` markup for the theme. The default theme has none.
	pub const fn css(self) -> &'static str {
		match self {
			Self::Default => "",
			Self::Light => "<style>body,input,textarea{background:lightgrey;color: black;}</style>",
			Self::Dark => "<style>body,input,textarea{background:black;color: lightgrey;}a{color:cornflowerblue;}a:visited{color:chocolate;}</style>",
			Self::Console => "<style>body,input,textarea{background:black;color: lightgreen;}a{color:green;}a:visited{color:darkorchid;}</style>",
		}
	}
}



#[must_use]
/// # Plain Text Decorator.
///
/// Leave text as-is.
pub fn plain_text_decorator() -> TextDecorator { Arc::new(|s: &str| s.to_owned()) }

#[must_use]
/// # Debug Text Decorator.
///
/// Wrap each space-separated word in a `<span>` with an alternating
/// background color, making the text node boundaries easy to see.
pub fn debug_text_decorator() -> TextDecorator {
	const COLORS: [&str; 2] = ["#33cc00", "#00c0dc"];
	let next = Arc::new(AtomicUsize::new(0));
	Arc::new(move |src: &str| {
		src.split(' ')
			.map(|w| {
				let color = COLORS[next.fetch_add(1, Relaxed) % COLORS.len()];
				format!("<span style=\"background: {color}\">{w}</span> ")
			})
			.collect::<Vec<_>>()
			.join(" ")
	})
}

#[must_use]
/// # Separator.
///
/// The rule between the marker block and the content. It carries the
/// marker class so later runs treat it the same way.
pub(crate) fn separator_html() -> String { format!(r#"<hr class="{OPT_OUT_CLASS}">"#) }

#[must_use]
/// # Opt-Out Marker.
///
/// When the source URL is known, link straight back to it; otherwise use a
/// script that strips the relay from the current location.
pub(crate) fn opt_out_html(url: Option<&str>) -> String {
	let link = url.map_or_else(
		|| String::from(r##"<a href="#" onclick="location.href=location.href.indexOf('url=')!==-1?location.href.substring(location.href.indexOf('url=')+4):location.href.replace(location.origin,'').replace(/^\/[^\/]*\//,'')">Opt-Out</a>"##),
		|u| format!(r#"<a href="{}">Opt-Out</a>"#, u.replace('"', "%22")),
	);
	format!(r#"<div class="{OPT_OUT_CLASS}" style="text-align: center">{link}</div>"#)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_from_name() {
		for t in Theme::ALL {
			assert_eq!(Theme::from_name(t.as_str()), t);
			assert_eq!(Theme::from(t.as_str().to_ascii_uppercase().as_str()), t);
		}
		assert_eq!(Theme::from_name("neon"), Theme::Default);
		assert_eq!(Theme::from_name(""), Theme::Default);
	}

	#[test]
	fn t_css() {
		assert!(Theme::Default.css().is_empty());
		for t in [Theme::Light, Theme::Dark, Theme::Console] {
			assert!(t.css().starts_with("<style>body,input,textarea{"));
			assert!(t.css().ends_with("</style>"));
		}
	}

	#[test]
	fn t_decorators() {
		let plain = plain_text_decorator();
		assert_eq!(plain(" a b "), " a b ");

		let debug = debug_text_decorator();
		assert_eq!(
			debug("a b"),
			"<span style=\"background: #33cc00\">a</span>  <span style=\"background: #00c0dc\">b</span> ",
		);
	}

	#[test]
	fn t_opt_out() {
		let html = opt_out_html(Some("http://x.com/?a=\"b\""));
		assert!(html.contains(OPT_OUT_CLASS));
		assert!(html.contains(r#"href="http://x.com/?a=%22b%22""#));
		assert!(opt_out_html(None).contains("onclick="));
		assert_eq!(separator_html(), r#"<hr class="minweb-opt-out">"#);
	}
}
