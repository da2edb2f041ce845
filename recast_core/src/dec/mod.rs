/*!
# `Recast` - Decoding!
*/

use crate::{
	Backends,
	Image,
	ImageKind,
	RecastError,
	WebpCodec,
};
use image::ImageReader;
use std::io::Cursor;



/// # Decode.
///
/// Decode a raw raster file into a canonical RGBA [`Image`], returning it
/// along with the detected source format.
///
/// The `image` crate identifies the container. WebP sources are then handed
/// to the native `libwebp`, if there is one; should that fail for any
/// reason, the `image` crate decodes it instead.
///
/// ## Errors
///
/// This will return an error if the source is empty, unrecognized, or
/// cannot be decoded by the `image` crate.
pub fn decode(raw: &[u8], backends: &Backends) -> Result<(Image, ImageKind), RecastError> {
	if raw.is_empty() {
		return Err(RecastError::Decode("The image is empty.".to_owned()));
	}

	let reader = ImageReader::new(Cursor::new(raw))
		.with_guessed_format()
		.map_err(|e| RecastError::Decode(e.to_string()))?;
	let format = reader.format().ok_or_else(|| RecastError::Decode(
		"Could not identify image format. The file may be corrupted or in an unsupported format.".to_owned()
	))?;
	let kind = ImageKind::try_from(format)?;

	if kind == ImageKind::Webp {
		if let Some(img) = backends.webp().and_then(|codec| decode_native(codec, raw)) {
			return Ok((img, kind));
		}
	}

	let img = reader.decode().map_err(|e| RecastError::Decode(e.to_string()))?;
	let img = Image::try_from(img.into_rgba8())?;
	Ok((img, kind))
}

/// # Native WebP Decode.
///
/// Failures are logged and swallowed.
fn decode_native(codec: &dyn WebpCodec, raw: &[u8]) -> Option<Image> {
	match codec.decode(raw) {
		Ok(img) => {
			log::debug!("Decoded WebP with {codec:?}.");
			Some(img)
		},
		Err(e) => {
			log::warn!("Native WebP decoding failed, using fallback: {e}");
			None
		},
	}
}
