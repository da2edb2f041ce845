/*!
# `Recast` - Image Kind
*/

use crate::RecastError;
use std::{
	fmt,
	str::FromStr,
};



#[derive(Debug, Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Image Kind.
///
/// The formats `Recast` knows about, either as inputs, outputs, or both.
/// [`ImageKind::Svg`] is input-only.
pub enum ImageKind {
	/// # AVIF.
	Avif,
	/// # BMP.
	Bmp,
	/// # JPEG.
	Jpeg,
	/// # PNG.
	Png,
	/// # SVG.
	Svg,
	/// # WebP.
	Webp,
}

impl fmt::Display for ImageKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ImageKind {
	type Err = RecastError;

	/// # From Target String.
	///
	/// Parse an output format name, case-insensitively. `jpg` and `jfif` are
	/// aliases for `jpeg`.
	fn from_str(src: &str) -> Result<Self, Self::Err> {
		match src.trim().to_ascii_lowercase().as_str() {
			"avif" => Ok(Self::Avif),
			"bmp" => Ok(Self::Bmp),
			"jpeg" | "jpg" | "jfif" => Ok(Self::Jpeg),
			"png" => Ok(Self::Png),
			"svg" => Ok(Self::Svg),
			"webp" => Ok(Self::Webp),
			_ => Err(RecastError::Encode(format!("Unsupported output format: {src}"))),
		}
	}
}

impl TryFrom<&[u8]> for ImageKind {
	type Error = RecastError;

	/// # From Bytes.
	///
	/// Obtain the image kind from the raw file bytes by inspecting its magic
	/// headers. SVG is text and has no magic; see [`sniff`](crate::sniff).
	fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
		if src.len() >= 12 {
			if src[..4] == *b"RIFF" && src[8..12] == *b"WEBP" {
				return Ok(Self::Webp);
			}

			// AVIF has a few ways to be.
			if
				src[4..8] == *b"ftyp" &&
				matches!(&src[8..12], b"avif" | b"avis" | b"MA1B" | b"MA1A")
			{
				return Ok(Self::Avif);
			}
		}

		if src.len() >= 8 && src[..8] == [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'] {
			return Ok(Self::Png);
		}

		if src.len() >= 3 && src[..3] == [0xFF, 0xD8, 0xFF] {
			return Ok(Self::Jpeg);
		}

		if src.len() >= 14 && src[..2] == *b"BM" {
			return Ok(Self::Bmp);
		}

		Err(RecastError::Decode("Unrecognized image format.".to_owned()))
	}
}

impl TryFrom<image::ImageFormat> for ImageKind {
	type Error = RecastError;

	fn try_from(src: image::ImageFormat) -> Result<Self, Self::Error> {
		use image::ImageFormat;

		match src {
			ImageFormat::Avif => Ok(Self::Avif),
			ImageFormat::Bmp => Ok(Self::Bmp),
			ImageFormat::Jpeg => Ok(Self::Jpeg),
			ImageFormat::Png => Ok(Self::Png),
			ImageFormat::WebP => Ok(Self::Webp),
			other => Err(RecastError::Decode(format!("Unsupported image format: {other:?}"))),
		}
	}
}

/// ## Getters.
impl ImageKind {
	#[must_use]
	/// # Name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Avif => "AVIF",
			Self::Bmp => "BMP",
			Self::Jpeg => "JPEG",
			Self::Png => "PNG",
			Self::Svg => "SVG",
			Self::Webp => "WebP",
		}
	}

	#[must_use]
	/// # Extension.
	///
	/// Return the canonical extension, without the leading period.
	pub const fn extension(self) -> &'static str {
		match self {
			Self::Avif => "avif",
			Self::Bmp => "bmp",
			Self::Jpeg => "jpg",
			Self::Png => "png",
			Self::Svg => "svg",
			Self::Webp => "webp",
		}
	}

	#[must_use]
	/// # MIME Type.
	pub const fn mime(self) -> &'static str {
		match self {
			Self::Avif => "image/avif",
			Self::Bmp => "image/bmp",
			Self::Jpeg => "image/jpeg",
			Self::Png => "image/png",
			Self::Svg => "image/svg+xml",
			Self::Webp => "image/webp",
		}
	}

	#[must_use]
	/// # Can Encode?
	pub const fn can_encode(self) -> bool { ! matches!(self, Self::Svg) }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_from_str() {
		for (s, k) in [
			("webp", ImageKind::Webp),
			("PNG", ImageKind::Png),
			("jpeg", ImageKind::Jpeg),
			("JPG", ImageKind::Jpeg),
			("jfif", ImageKind::Jpeg),
			(" bmp ", ImageKind::Bmp),
			("Avif", ImageKind::Avif),
		] {
			assert_eq!(s.parse::<ImageKind>(), Ok(k), "{s}");
		}

		assert!(matches!("tiff".parse::<ImageKind>(), Err(RecastError::Encode(_))));
	}

	#[test]
	fn t_magic() {
		assert_eq!(
			ImageKind::try_from(&b"RIFF\0\0\0\0WEBPVP8L"[..]),
			Ok(ImageKind::Webp),
		);
		assert_eq!(
			ImageKind::try_from(&b"\0\0\0\x1cftypavif\0\0\0\0"[..]),
			Ok(ImageKind::Avif),
		);
		assert_eq!(
			ImageKind::try_from(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'][..]),
			Ok(ImageKind::Png),
		);
		assert_eq!(ImageKind::try_from(&[0xFF, 0xD8, 0xFF, 0xE0][..]), Ok(ImageKind::Jpeg));
		assert!(ImageKind::try_from(&b"<svg></svg>"[..]).is_err());
		assert!(ImageKind::try_from(&[][..]).is_err());
	}

	#[test]
	fn t_mime() {
		assert_eq!(ImageKind::Webp.mime(), "image/webp");
		assert_eq!(ImageKind::Png.mime(), "image/png");
		assert_eq!(ImageKind::Jpeg.mime(), "image/jpeg");
		assert_eq!(ImageKind::Bmp.mime(), "image/bmp");
		assert_eq!(ImageKind::Avif.mime(), "image/avif");
	}
}
