/*!
# Minweb: Errors and Help
*/

use fyi_msg::ProglessError;
use std::{
	error::Error,
	fmt,
};



/// # Help Text.
const HELP: &str = concat!(r"
   .--------.
   | ~~~~~~ |
   | ~~ ~~~ |   ", "\x1b[38;5;199mMinweb\x1b[0;38;5;69m v", env!("CARGO_PKG_VERSION"), "\x1b[0m", r#"
   | ~~~~ ~ |   Reader-mode HTML reduction:
   '--------'   less markup, same story.

USAGE:
    minweb [FLAGS] [OPTIONS] <PATH(S)>...

FLAGS:
        --article         Keep only <article> subtrees (and metadata).
        --auto-repair     Close elements the source left open.
    -h, --help            Print help information and exit.
        --inject-style    Add a doctype, mobile <meta> tags, and readability
                          stylesheets.
    -p, --progress        Show progress bar while working.
        --text            Keep only text-bearing markup.
    -V, --version         Print program version and exit.

OPTIONS:
        --href-prefix <PREFIX>
                          Prefix rewritten <a href> and <form action> values
                          with this string. Requires -u/--url.
    -l, --list <FILE>     Read (absolute) file and/or directory paths from this
                          text file (or STDIN if "-"), one entry per line,
                          instead of or in addition to the trailing <PATH(S)>.
    -s, --skip <TAGS>     Comma-separated tag names to drop.
                          [default: script,img,svg]
    -t, --theme <NAME>    One of default, light, dark, or console.
                          [default: default]
    -u, --url <URL>       The source URL, used to make relative links absolute.

ARGS:
    <PATH(S)>...          One or more files or directories to crunch.

Files are rewritten in place. Set RUST_LOG=minweb=debug for the details.
"#);



#[expect(clippy::missing_docs_in_private_items, reason = "Self-explanatory.")]
#[derive(Debug, Copy, Clone)]
/// # Generic Error.
pub(super) enum MinwebError {
	EmptyFile,
	ListFile,
	NoDocuments,
	Parse,
	Progress(ProglessError),
	Read,
	Save,
	PrintHelp,    // Not an error.
	PrintVersion, // Not an error.
}

impl AsRef<str> for MinwebError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for MinwebError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Error for MinwebError {}

impl From<ProglessError> for MinwebError {
	#[inline]
	fn from(src: ProglessError) -> Self { Self::Progress(src) }
}

impl MinwebError {
	/// # As Str.
	pub(super) const fn as_str(self) -> &'static str {
		match self {
			Self::EmptyFile => "The file is empty.",
			Self::ListFile => "Unable to read the path list.",
			Self::NoDocuments => "No documents were found.",
			Self::Parse => "Unable to parse the document.",
			Self::Progress(e) => e.as_str(),
			Self::Read => "Unable to read the file.",
			Self::Save => "Unable to save the file.",
			Self::PrintHelp => HELP,
			Self::PrintVersion => concat!("Minweb v", env!("CARGO_PKG_VERSION")),
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_as_str() {
		assert!(MinwebError::PrintHelp.as_str().contains("--href-prefix <PREFIX>"));
		assert!(MinwebError::PrintVersion.to_string().starts_with("Minweb v"));
		assert_eq!(MinwebError::Parse.as_ref(), "Unable to parse the document.");
	}
}
