/*!
# `Recast` - Error
*/

use thiserror::Error;



#[derive(Debug, Clone, Eq, PartialEq, Error)]
/// # Errors.
///
/// These are the only failures a conversion can surface. Native library
/// hiccups and misbehaving optimizers are recovered internally and only show
/// up in the logs.
pub enum RecastError {
	/// # Empty or unreadable input.
	#[error("Unable to read the source image: {0}")]
	Input(String),

	/// # Not a supported raster (and not SVG).
	#[error("The image could not be decoded: {0}")]
	Decode(String),

	/// # SVG rasterization failed.
	#[error("The SVG could not be rasterized: {0}")]
	Rasterize(String),

	/// # Every encoding strategy failed.
	#[error("The image could not be encoded: {0}")]
	Encode(String),

	/// # Dimensions or buffer sizes are out of range.
	#[error("The image dimensions are out of range.")]
	Overflow,
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Fallback Reason.
///
/// Strategies return this instead of a [`RecastError`] when they fail. It
/// never leaves the crate; the dispatcher logs it and moves on to the next
/// strategy.
pub(crate) struct Fallback(pub(crate) String);

impl Fallback {
	/// # New.
	pub(crate) fn new<S: Into<String>>(reason: S) -> Self { Self(reason.into()) }
}

impl std::fmt::Display for Fallback {
	#[inline]
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<image::ImageError> for Fallback {
	#[inline]
	fn from(err: image::ImageError) -> Self { Self(err.to_string()) }
}

impl From<std::io::Error> for Fallback {
	#[inline]
	fn from(err: std::io::Error) -> Self { Self(err.to_string()) }
}
