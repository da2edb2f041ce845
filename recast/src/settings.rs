/*!
# `Recast`: Settings
*/

use argyle::Argument;
use crate::CliError;
use recast_core::EncodeOptions;
use std::{
	ffi::OsString,
	path::{
		Path,
		PathBuf,
	},
};



/// # Default Output Format.
const DEFAULT_FORMAT: &str = "webp";



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Run Mode.
pub(super) enum Mode {
	/// # Print Diagnostics.
	Diagnostics,

	/// # Convert a File.
	Convert {
		src: PathBuf,
		dst: Option<PathBuf>,
	},
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// # Settings.
pub(super) struct Settings {
	pub(super) mode: Mode,
	pub(super) format: String,
	pub(super) opts: EncodeOptions,
	pub(super) verbose: bool,
}

impl Settings {
	/// # From CLI.
	pub(super) fn new() -> Result<Self, CliError> {
		Self::from_args(
			argyle::args().with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")))
		)
	}

	/// # From Arguments.
	///
	/// ## Errors
	///
	/// Help and version requests short-circuit as "errors", as do bad
	/// quality values and a missing source path.
	pub(super) fn from_args<I>(args: I) -> Result<Self, CliError>
	where I: IntoIterator<Item=Argument> {
		let mut diagnostics = false;
		let mut format = None;
		let mut opts = EncodeOptions::default();
		let mut src: Option<PathBuf> = None;
		let mut dst = None;
		let mut verbose = false;

		for arg in args {
			match arg {
				Argument::Key("--diagnostics") => { diagnostics = true; },
				Argument::Key("-h" | "--help") => return Err(CliError::PrintHelp),
				Argument::Key("--lossless") => { opts = opts.with_lossless(true); },
				Argument::Key("--optimize") => { opts = opts.with_optimize(true); },
				Argument::Key("-v" | "--verbose") => { verbose = true; },
				Argument::Key("-V" | "--version") => return Err(CliError::PrintVersion),

				Argument::KeyWithValue("-f" | "--format", s) => { format = Some(s); },
				Argument::KeyWithValue("-o" | "--output", s) => { dst = Some(PathBuf::from(s)); },
				Argument::KeyWithValue("-q" | "--quality", s) => {
					let q = s.trim().parse::<u8>()
						.ok()
						.filter(|&q| q <= 100)
						.ok_or(CliError::Quality(s))?;
					opts = opts.with_quality(q);
				},

				// The first stray is the source.
				Argument::Other(s) => if src.is_none() { src = Some(PathBuf::from(s)); },
				Argument::InvalidUtf8(s) => if src.is_none() { src = Some(PathBuf::from(s)); },

				// Nothing else is relevant.
				_ => {},
			}
		}

		let mode =
			if diagnostics { Mode::Diagnostics }
			else {
				let src = src.ok_or(CliError::NoSource)?;
				Mode::Convert { src, dst }
			};

		Ok(Self {
			mode,
			format: format.unwrap_or_else(|| DEFAULT_FORMAT.to_owned()),
			opts,
			verbose,
		})
	}
}

/// # Default Destination.
///
/// The source path with the new extension appended.
pub(super) fn default_dst(src: &Path, format: &str) -> PathBuf {
	let mut out: OsString = src.as_os_str().to_owned();
	out.push(".");
	out.push(format.trim().to_ascii_lowercase());
	PathBuf::from(out)
}
