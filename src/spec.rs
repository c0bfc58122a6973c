/*!
# Minweb: Questions of Spec.

These tables are fixed at compile time and shared freely between threads.
Tag names are stored lowercase; every lookup is ASCII case-insensitive.
*/



/// # Void Elements.
///
/// These never have children or a closing tag, regardless of markup.
pub const VOID_TAGS: [&str; 7] = ["br", "input", "meta", "img", "link", "base", "hr"];

/// # Metadata Whitelist.
///
/// Article and text-only modes always keep these.
pub const TAG_WHITELIST: [&str; 4] = ["head", "style", "link", "meta"];

/// # Text-Only Blacklist.
pub const TEXT_BLACKLIST: [&str; 6] = ["script", "button", "img", "video", "svg", "nav"];

/// # Default Skipped Tags.
pub const DEFAULT_SKIP_TAGS: [&str; 3] = ["script", "img", "svg"];

/// # Article Tag.
pub const TAG_ARTICLE: &str = "article";

/// # IFrame Tag.
pub const TAG_IFRAME: &str = "iframe";

/// # Opt-Out Marker Class.
///
/// The injected opt-out block carries this class so a second run can tell
/// it has already been there.
pub const OPT_OUT_CLASS: &str = "minweb-opt-out";

/// # Mobile Meta Tags.
///
/// Each entry is a complete attribute list; the first attribute identifies
/// the tag when checking whether a document already has it.
pub(crate) const MOBILE_META: [&[(&str, &str)]; 3] = [
	&[("charset", "UTF-8")],
	&[("name", "viewport"), ("content", "width=device-width, initial-scale=1")],
	&[("name", "HandheldFriendly"), ("content", "true")],
];

/// # Readability Stylesheets.
pub(crate) const STYLESHEETS: [&str; 2] = [
	"https://cdn.jsdelivr.net/npm/normalize.css@8/normalize.min.css",
	"https://cdn.jsdelivr.net/npm/water.css@2/out/light.min.css",
];



#[must_use]
/// # Is Void Element?
pub fn is_void_tag(name: &str) -> bool { contains_ignore_ascii_case(&VOID_TAGS, name) }

#[must_use]
/// # Is Whitelisted Metadata Element?
pub fn is_whitelisted_tag(name: &str) -> bool {
	contains_ignore_ascii_case(&TAG_WHITELIST, name)
}

#[must_use]
/// # Is Raw-Text Element?
///
/// The bodies of `<style>` and `<script>` are not markup.
pub fn is_raw_text_tag(name: &str) -> bool {
	name.eq_ignore_ascii_case("style") || name.eq_ignore_ascii_case("script")
}

#[must_use]
/// # Contains (Case-Insensitively).
pub(crate) fn contains_ignore_ascii_case(list: &[&str], name: &str) -> bool {
	list.iter().any(|v| v.eq_ignore_ascii_case(name))
}

#[must_use]
/// # Is Whitespace Byte?
pub(crate) const fn is_whitespace(b: u8) -> bool {
	matches!(b, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

#[must_use]
/// # Is Whitespace Slice?
pub(crate) const fn is_whitespace_str(txt: &str) -> bool {
	let mut txt = txt.as_bytes();
	while let [b'\t' | b'\n' | b'\x0C' | b'\r' | b' ', rest @ ..] = txt { txt = rest; }
	txt.is_empty()
}
