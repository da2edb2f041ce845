/*!
# `Recast`: Error
*/

use recast_core::RecastError;
use std::{
	error::Error,
	fmt,
	io,
	path::Path,
};



/// # Help Text.
const HELP: &str = concat!("Recast v", env!("CARGO_PKG_VERSION"), r#"
Convert images between PNG, JPEG, BMP, WebP, and AVIF, or rasterize SVG
to any of them.

USAGE:
    recast [FLAGS] [OPTIONS] <FILE>

FLAGS:
        --diagnostics   Print backend availability information and exit.
    -h, --help          Print help information and exit.
        --lossless      Use lossless encoding (WebP/AVIF only).
        --optimize      Run external optimizers when available (JPEG/PNG
                        only).
    -v, --verbose       Log backend and fallback decisions.
    -V, --version       Print version information and exit.

OPTIONS:
    -f, --format <FORMAT>
                        Output format: webp, png, jpeg, jpg, jfif, bmp, or
                        avif. [default: webp]
    -o, --output <FILE> Output path. Defaults to the source path with the
                        new extension appended.
    -q, --quality <NUM> Lossy quality, 0-100. [default: 80]

TRAILING ARGS:
    <FILE>              The image to convert.

Set RUST_LOG to fine-tune logging.
"#);



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Error.
pub(super) enum CliError {
	/// # Conversion Failed.
	Convert(RecastError),

	/// # Bad Quality.
	Quality(String),

	/// # No Source File.
	NoSource,

	/// # Unable to Read Source.
	Read(String),

	/// # Unable to Write Output.
	Write(String),

	/// # Print Help (Not an Error).
	PrintHelp,

	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for CliError {}

impl From<RecastError> for CliError {
	#[inline]
	fn from(err: RecastError) -> Self { Self::Convert(err) }
}

impl fmt::Display for CliError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Convert(e) => fmt::Display::fmt(e, f),
			Self::Quality(s) => write!(f, "Invalid quality: {s}"),
			Self::NoSource => f.write_str("No source image was specified."),
			Self::Read(s) => write!(f, "Unable to read the source file ({s})."),
			Self::Write(s) => write!(f, "Unable to save the file ({s})."),
			Self::PrintHelp => f.write_str(HELP),
			Self::PrintVersion => f.write_str(concat!("Recast v", env!("CARGO_PKG_VERSION"))),
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_io_detail() {
		let err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
		let e = CliError::read(Path::new("/tmp/missing.png"), &err);
		assert_eq!(
			e.to_string(),
			"Unable to read the source file (/tmp/missing.png: No such file or directory).",
		);

		let err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
		let e = CliError::write(Path::new("/root/out.webp"), &err);
		assert_eq!(
			e.to_string(),
			"Unable to save the file (/root/out.webp: Permission denied).",
		);
	}
}
