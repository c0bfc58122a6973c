/*!
# Minweb: URL Rewriting.

Attribute values are rewritten in place, so they arrive (and leave) with their
original quotes, if any.
*/

use ::url::Url;
use crate::dom::node::unquote;



#[derive(Debug, Clone, Eq, PartialEq)]
/// # URL Absolutizer.
///
/// This holds the pieces of the page URL needed to resolve relative links
/// found within it.
pub struct UrlFixer {
	/// # Protocol (e.g. `https`).
	protocol: String,

	/// # Host (and Port).
	host: String,

	/// # Base Directory (With Trailing Slash).
	base: String,
}

impl UrlFixer {
	#[must_use]
	/// # New.
	///
	/// Query strings and fragments are ignored when working out the base
	/// directory. A URL without a protocol is assumed to be `http`.
	///
	/// Returns `None` if no host can be found.
	pub fn new(url: &str) -> Option<Self> {
		let url = url.trim();
		let parsed = Url::parse(url).ok()
			.filter(Url::has_host)
			.or_else(|| Url::parse(&format!("http://{url}")).ok())?;

		let host = parsed.host_str().filter(|h| ! h.is_empty())?;
		let host = match parsed.port() {
			Some(port) => format!("{host}:{port}"),
			None => host.to_owned(),
		};
		let base = parsed.join("./").ok()?;

		Some(Self {
			protocol: parsed.scheme().to_owned(),
			host,
			base: base.into(),
		})
	}

	#[must_use]
	/// # Protocol.
	pub fn protocol(&self) -> &str { &self.protocol }

	#[must_use]
	/// # Host.
	pub fn host(&self) -> &str { &self.host }

	#[must_use]
	/// # Base.
	pub fn base(&self) -> &str { &self.base }

	#[must_use]
	/// # Fix (Absolutize) a Value.
	///
	/// * Root-relative paths get the page protocol and host;
	/// * Protocol-relative `//` links get the page protocol;
	/// * Anything with a scheme, empty values, and bare `#fragments` are left alone;
	/// * Everything else is resolved against the page's directory.
	///
	/// Surrounding quotes are preserved.
	pub fn fix(&self, value: &str) -> String {
		let inner = unquote(value);
		if inner.is_empty() || inner.starts_with('#') || has_scheme(inner) {
			return value.to_owned();
		}

		let fixed =
			if inner.starts_with("//") { format!("{}:{inner}", self.protocol) }
			else if inner.starts_with('/') {
				format!("{}://{}{inner}", self.protocol, self.host)
			}
			else { format!("{}{inner}", self.base) };

		requote(value, inner, &fixed)
	}
}



#[must_use]
/// # Add Prefix.
///
/// Prepend `prefix` to the value, inside its opening quote if it has one.
pub(crate) fn add_prefix(value: &str, prefix: &str) -> String {
	match value.as_bytes().first() {
		Some(q @ (b'"' | b'\'')) => {
			let mut out = String::with_capacity(value.len() + prefix.len());
			out.push(char::from(*q));
			out.push_str(prefix);
			out.push_str(&value[1..]);
			out
		},
		_ => format!("{prefix}{value}"),
	}
}

#[must_use]
/// # Is HTTP(S)?
///
/// Returns `true` if the (possibly quoted) value is an absolute web URL.
pub(crate) fn is_http(value: &str) -> bool {
	Url::parse(unquote(value)).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[must_use]
/// # Has Scheme?
///
/// Values that parse on their own (`http:`, `mailto:`, `data:`, etc.) are
/// already absolute.
fn has_scheme(src: &str) -> bool { Url::parse(src).is_ok() }

#[must_use]
/// # Requote.
///
/// Put back whatever quotes were stripped from the original.
fn requote(original: &str, inner: &str, fixed: &str) -> String {
	if original.len() == inner.len() { fixed.to_owned() }
	else {
		let q = &original[..1];
		format!("{q}{fixed}{q}")
	}
}
