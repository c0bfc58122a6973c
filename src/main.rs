/*!
# Minweb

Minweb reduces HTML documents for reading: scripts, images, and other clutter
are stripped, relative links are made absolute, and what remains is minified
and bracketed with a small opt-out link and (optional) theme.

Unlike a conventional minifier, Minweb changes what a page *is*, not just how
many bytes it takes to say it, so it should only be pointed at copies meant
for a reader.

Documents that cannot be parsed, for example because a tag is missing its
name, are left as-was.



## Use

For basic use, just toss one or more file or directory paths after the command,
like:
```bash
# Crunch one file.
minweb /path/to/one.html

# Recursively crunch every .htm(l) file in a directory, keeping only the
# articles, with a dark theme and a progress bar.
minweb --article -t dark -p /path/to

# For a full list of options, run help:
minweb -h
```
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



mod menu;

use argyle::Argument;
use dactyl::NiceU64;
use dowser::{
	Dowser,
	Extension,
};
use fyi_msg::{
	Msg,
	MsgKind,
	Progless,
};
use menu::MinwebError;
use minweb::{
	FilterOptions,
	Theme,
	minify_html,
};
use rayon::iter::{
	IntoParallelRefIterator,
	ParallelIterator,
};
use std::{
	num::NonZeroU64,
	path::{
		Path,
		PathBuf,
	},
	sync::atomic::{
		AtomicU64,
		Ordering::Relaxed,
	},
};
use tracing::warn;
use tracing_subscriber::EnvFilter;



// The E_HTM and E_HTML extension constants.
include!(concat!(env!("OUT_DIR"), "/minweb-extensions.rs"));



/// # Main.
fn main() {
	match main__() {
		Ok(()) => {},
		Err(e @ (MinwebError::PrintHelp | MinwebError::PrintVersion)) => {
			println!("{e}");
		},
		Err(e) => { Msg::error(e.as_str()).die(1); },
	}
}

#[inline]
/// # Actual Main.
fn main__() -> Result<(), MinwebError> {
	// Diagnostics go to STDERR, if RUST_LOG asks for them.
	let _res = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.try_init();

	// Parse CLI arguments.
	let args = argyle::args()
		.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));

	let mut progress = false;
	let mut opts = FilterOptions::default();
	let mut paths = Dowser::default();
	for arg in args {
		match arg {
			Argument::Key("--article") => { opts = opts.with_article_mode(true); },
			Argument::Key("--auto-repair") => { opts = opts.with_auto_repair(true); },
			Argument::Key("-h" | "--help") => return Err(MinwebError::PrintHelp),
			Argument::Key("--inject-style") => { opts = opts.with_inject_style(true); },
			Argument::Key("-p" | "--progress") => { progress = true; },
			Argument::Key("--text") => { opts = opts.with_text_mode(true); },
			Argument::Key("-V" | "--version") => return Err(MinwebError::PrintVersion),

			Argument::KeyWithValue("--href-prefix", s) => { opts = opts.with_href_prefix(s); },
			Argument::KeyWithValue("-l" | "--list", s) => {
				paths.read_paths_from_file(&s).map_err(|_| MinwebError::ListFile)?;
			},
			Argument::KeyWithValue("-s" | "--skip", s) => {
				opts = opts.with_skip_tags(s.split(','));
			},
			Argument::KeyWithValue("-t" | "--theme", s) => {
				opts = opts.with_theme(Theme::from_name(&s));
			},
			Argument::KeyWithValue("-u" | "--url", s) => { opts = opts.with_url(s); },

			// Assume these are paths.
			Argument::Other(s) => { paths.push_path(s); },
			Argument::InvalidUtf8(s) => { paths.push_path(s); },

			// Nothing else is expected.
			_ => {},
		}
	}

	// Put it all together!
	let paths: Vec<PathBuf> = paths.filter(|p| is_html(p)).collect();
	if paths.is_empty() { return Err(MinwebError::NoDocuments); }

	let before = AtomicU64::new(0);
	let after = AtomicU64::new(0);
	let crunch = |path: &PathBuf| match minify(path, &opts) {
		Ok((b, a)) => {
			before.fetch_add(b.get(), Relaxed);
			after.fetch_add(a.get(), Relaxed);
		},
		Err(e) => { warn!(path = %path.display(), error = %e, "skipped document"); },
	};

	// Sexy run-through.
	if progress {
		// Boot up a progress bar.
		let progress = Progless::try_from(paths.len())?
			.with_title(Some(Msg::custom("Minweb", 199, "Reducing &markup;")));

		// Process!
		paths.par_iter().for_each(|x| {
			let tmp = x.to_string_lossy();
			progress.add(&tmp);
			crunch(x);
			progress.remove(&tmp);
		});

		// Finish up.
		progress.finish();
		progress.summary(MsgKind::Crunched, "document", "documents").print();

		let (before, after) = (before.into_inner(), after.into_inner());
		if after < before {
			Msg::success(format!(
				"Saved {} of {} bytes.",
				NiceU64::from(before - after),
				NiceU64::from(before),
			)).print();
		}
	}
	else { paths.par_iter().for_each(crunch); }

	Ok(())
}

/// # Is HTML?
fn is_html(path: &Path) -> bool {
	Extension::try_from4(path).is_some_and(|e| e == E_HTML) ||
	Extension::try_from3(path).is_some_and(|e| e == E_HTM)
}

/// # Minify a Document.
///
/// Read the raw HTML from a file, run it through the pipeline, and save the
/// result if it changed.
///
/// ## Errors
///
/// This will return an error if the file is unreadable, empty, or
/// unparseable, or if issues are encountered when trying to re-save it.
fn minify(src: &Path, opts: &FilterOptions) -> Result<(NonZeroU64, NonZeroU64), MinwebError> {
	// Load the file.
	let mut raw = std::fs::read_to_string(src).map_err(|_| MinwebError::Read)?;
	let before = u64::try_from(raw.len())
		.ok()
		.and_then(NonZeroU64::new)
		.ok_or(MinwebError::EmptyFile)?;

	// Replace all CRLF/CR instances with LF before parsing anything.
	if raw.contains('\r') { raw = raw.replace("\r\n", "\n").replace('\r', "\n"); }

	let out = minify_html(&raw, opts).map_err(|e| {
		warn!(path = %src.display(), error = %e, "parse failed");
		MinwebError::Parse
	})?;

	// Save it if different!
	if raw != out && ! out.is_empty() {
		let after = u64::try_from(out.len())
			.ok()
			.and_then(NonZeroU64::new)
			.ok_or(MinwebError::EmptyFile)?;
		write_atomic::write_file(src, out.as_bytes()).map_err(|_| MinwebError::Save)?;
		return Ok((before, after));
	}

	// We didn't do anything.
	Ok((before, before))
}
