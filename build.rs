/*!
# Minweb: Build
*/

use argyle::KeyWordsBuilder;
use dowser::Extension;
use std::{
	fs::File,
	io::Write,
	path::{
		Path,
		PathBuf,
	},
};



/// # Build.
///
/// We might as well pre-compile the CLI keywords and file extensions we're
/// looking for.
pub fn main() {
	println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

	build_cli();
	build_extensions();
}

/// # Build CLI Keywords.
fn build_cli() {
	let mut builder = KeyWordsBuilder::default();
	builder.push_keys([
		"--article",
		"--auto-repair",
		"-h", "--help",
		"--inject-style",
		"-p", "--progress",
		"--text",
		"-V", "--version",
	]);
	builder.push_keys_with_values([
		"--href-prefix",
		"-l", "--list",
		"-s", "--skip",
		"-t", "--theme",
		"-u", "--url",
	]);
	builder.save(out_path("argyle.rs"));
}

/// # Build Extensions.
fn build_extensions() {
	let out = format!(
		r"
/// # Extension: HTM.
const E_HTM: Extension = {};

/// # Extension: HTML.
const E_HTML: Extension = {};
",
		Extension::codegen(b"htm"),
		Extension::codegen(b"html"),
	);

	write(&out_path("minweb-extensions.rs"), out.as_bytes());
}

/// # Output Path.
///
/// Append the sub-path to `OUT_DIR`.
fn out_path(name: &str) -> PathBuf {
	std::fs::canonicalize(std::env::var("OUT_DIR").expect("Missing OUT_DIR."))
		.expect("Missing OUT_DIR.")
		.join(name)
}

/// # Write File.
fn write(path: &Path, data: &[u8]) {
	File::create(path).and_then(|mut f| f.write_all(data).and_then(|_| f.flush()))
		.expect("Unable to write file.");
}
