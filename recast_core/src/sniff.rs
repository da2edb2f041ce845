/*!
# `Recast` - Format Sniffing

SVG is plain text, so it has no magic bytes for a container parser to find.
This decides between "vector" and "raster" before any real decoding is
attempted.
*/

use std::path::Path;



/// # Sniff Window.
const SNIFF_LEN: usize = 200;



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Sniffed Class.
pub enum Sniff {
	/// # Raster (or at least not SVG).
	Raster,
	/// # SVG.
	Svg,
}

/// # Sniff.
///
/// Classify the source as SVG if, after trimming, its first 200 bytes begin
/// with an XML declaration or an `<svg` tag. Bytes that are not valid UTF-8
/// are ignored. Failing that, a `.svg` file name will do. Everything else is
/// treated as a raster.
pub fn sniff(raw: &[u8], name: Option<&Path>) -> Sniff {
	if is_svg_markup(raw) { return Sniff::Svg; }

	if
		name.and_then(Path::extension)
			.is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
	{
		return Sniff::Svg;
	}

	Sniff::Raster
}

/// # Looks Like SVG?
fn is_svg_markup(raw: &[u8]) -> bool {
	let head = &raw[..raw.len().min(SNIFF_LEN)];
	let text: String = String::from_utf8_lossy(head)
		.chars()
		.filter(|&c| c != char::REPLACEMENT_CHARACTER)
		.collect();

	let text = text.trim();
	text.starts_with("<?xml") || text.starts_with("<svg")
}



#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

	#[test]
	fn t_markup() {
		assert_eq!(sniff(b"<svg xmlns='http://www.w3.org/2000/svg'/>", None), Sniff::Svg);
		assert_eq!(sniff(b"\n\t  <?xml version=\"1.0\"?><svg/>", None), Sniff::Svg);
		assert_eq!(sniff(b"<html></html>", None), Sniff::Raster);
		assert_eq!(sniff(b"", None), Sniff::Raster);
	}

	#[test]
	fn t_invalid_utf8() {
		// Undecodable bytes are dropped rather than breaking the match.
		assert_eq!(sniff(b"\xFF\xFE<svg/>", None), Sniff::Svg);
		assert_eq!(sniff(&PNG_MAGIC, None), Sniff::Raster);
	}

	#[test]
	fn t_window() {
		// Only the first 200 bytes are consulted.
		let mut raw = vec![b' '; 200];
		raw.extend_from_slice(b"<svg/>");
		assert_eq!(sniff(&raw, None), Sniff::Raster);

		// But a multi-byte character split at the boundary is harmless.
		let mut raw = b"<svg>".to_vec();
		raw.resize(199, b' ');
		raw.extend_from_slice("é".as_bytes());
		assert_eq!(sniff(&raw, None), Sniff::Svg);
	}

	#[test]
	fn t_name() {
		assert_eq!(sniff(b"garbage", Some(Path::new("/tmp/logo.SVG"))), Sniff::Svg);
		assert_eq!(sniff(b"garbage", Some(Path::new("/tmp/logo.png"))), Sniff::Raster);
		assert_eq!(sniff(b"garbage", Some(Path::new("/tmp/svg"))), Sniff::Raster);
	}

	proptest! {
		#[test]
		fn t_png_never_svg(tail in proptest::collection::vec(any::<u8>(), 0..512)) {
			let mut raw = PNG_MAGIC.to_vec();
			raw.extend_from_slice(&tail);
			prop_assert_eq!(sniff(&raw, None), Sniff::Raster);
		}
	}
}
