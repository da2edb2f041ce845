/*!
# `Recast`: BMP Encoding
*/

use crate::error::Fallback;
use image::{
	ExtendedColorType,
	codecs::bmp::BmpEncoder,
};



/// # Encode.
///
/// Bitmaps are written as plain 24-bit RGB; alpha has already been
/// discarded.
pub(super) fn encode(rgb: &[u8], (width, height): (u32, u32)) -> Result<Vec<u8>, Fallback> {
	let mut out = Vec::new();
	BmpEncoder::new(&mut out).encode(rgb, width, height, ExtendedColorType::Rgb8)?;
	Ok(out)
}
