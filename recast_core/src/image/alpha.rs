/*!
# `Recast` - Alpha Operations.
*/



/// # White.
pub(crate) const WHITE: [u8; 3] = [255, 255, 255];



/// # Flatten.
///
/// Composite a 4-byte RGBA slice over a solid background, returning a 3-byte
/// RGB buffer. Fully transparent pixels become the background exactly; fully
/// opaque pixels keep their color exactly.
pub(crate) fn flatten(src: &[u8], bg: [u8; 3]) -> Vec<u8> {
	src.chunks_exact(4).fold(
		Vec::with_capacity(src.len() / 4 * 3),
		|mut acc, px| {
			let a = px[3];
			acc.extend_from_slice(&[
				blend(px[0], bg[0], a),
				blend(px[1], bg[1], a),
				blend(px[2], bg[2], a),
			]);
			acc
		}
	)
}

#[allow(clippy::cast_possible_truncation)] // The result is always <= 255.
#[inline]
/// # Blend Channel.
///
/// Mix a foreground and background value by a `0..=255` weight, rounding to
/// the nearest integer.
const fn blend(fg: u8, bg: u8, a: u8) -> u8 {
	let a = a as u32;
	((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}
