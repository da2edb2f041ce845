/*!
# `Recast` - SVG Rasterization

SVG sources are laid out on a fixed-size page, measured in points like a
printed page, and that page is then rasterized at the requested DPI. SVG
user units are CSS pixels, so at the default 96 DPI the raster comes out at
exactly the (scaled) document size.

The page is opaque white.
*/

use crate::{
	Backends,
	Image,
	RecastError,
};



/// # Default DPI.
pub const DEFAULT_DPI: f32 = 96.0;

/// # CSS Pixels Per Inch.
const CSS_PPI: f32 = 96.0;

/// # Points Per Inch.
const PT_PPI: f32 = 72.0;

/// # Maximum Raster Pixels.
///
/// The page buffer is allocated up front, four bytes per pixel.
const MAX_PIXELS: u64 = 16_384 * 16_384;



#[derive(Debug, Copy, Clone, PartialEq)]
/// # Page.
///
/// The intermediate page a document is drawn onto, in points.
struct Page {
	width: f32,
	height: f32,
}

impl Page {
	/// # From Document Size.
	///
	/// Convert a (scaled) document size in CSS pixels to a page.
	fn from_px(width: f32, height: f32) -> Self {
		Self {
			width: width * PT_PPI / CSS_PPI,
			height: height * PT_PPI / CSS_PPI,
		}
	}

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	/// # Raster Size.
	///
	/// The pixel dimensions of this page at a given DPI. Either may be zero
	/// for degenerate input.
	fn raster_size(self, dpi: f32) -> (u32, u32) {
		let px = |pt: f32| (pt * dpi / PT_PPI).round().clamp(0.0, u32::MAX as f32) as u32;
		(px(self.width), px(self.height))
	}
}



/// # Rasterize.
///
/// Render SVG markup to a canonical [`Image`].
///
/// If a target width or height is given, the document is scaled uniformly
/// to match it. If both are given, the smaller of the two ratios wins so the
/// result fits inside the box without distortion.
///
/// ## Errors
///
/// This will return an error if SVG support is unavailable, the markup
/// cannot be parsed, or the render comes out empty.
pub fn rasterize(
	raw: &[u8],
	width: Option<u32>,
	height: Option<u32>,
	dpi: f32,
	backends: &Backends,
) -> Result<Image, RecastError> {
	if ! backends.has_svg() {
		return Err(RecastError::Rasterize("SVG support is not available.".to_owned()));
	}

	render(raw, width, height, dpi)
}

#[cfg(not(feature = "svg"))]
/// # Render (Unsupported).
fn render(_raw: &[u8], _width: Option<u32>, _height: Option<u32>, _dpi: f32)
-> Result<Image, RecastError> {
	Err(RecastError::Rasterize("SVG support is not available.".to_owned()))
}

#[cfg(feature = "svg")]
/// # Render.
fn render(raw: &[u8], width: Option<u32>, height: Option<u32>, dpi: f32)
-> Result<Image, RecastError> {
	use resvg::{
		tiny_skia::{
			Color,
			Pixmap,
			Transform,
		},
		usvg::{
			Options,
			Tree,
		},
	};
	use std::sync::Arc;

	if ! dpi.is_finite() || dpi <= 0.0 {
		return Err(RecastError::Rasterize(format!("Invalid DPI: {dpi}")));
	}

	let markup = strip_headers(raw);
	let opts = Options {
		fontdb: Arc::clone(fonts()),
		..Options::default()
	};
	let tree = Tree::from_data(&markup, &opts)
		.map_err(|e| RecastError::Rasterize(format!("Unable to parse SVG: {e}")))?;

	let size = tree.size();
	let scale = fit_scale((size.width(), size.height()), width, height);
	let page = Page::from_px(size.width() * scale, size.height() * scale);
	let (w, h) = page.raster_size(dpi);
	check_size(w, h)?;
	log::debug!("Rasterizing {}x{} SVG page to {w}x{h}.", page.width, page.height);

	let mut pixmap = Pixmap::new(w, h).ok_or_else(|| RecastError::Rasterize(
		"The SVG rendered to an empty page.".to_owned()
	))?;
	pixmap.fill(Color::WHITE);

	let zoom = scale * dpi / CSS_PPI;
	resvg::render(&tree, Transform::from_scale(zoom, zoom), &mut pixmap.as_mut());

	// The page is opaque, so premultiplied and straight RGBA agree.
	Image::new(pixmap.take(), w, h)
}

#[cfg(feature = "svg")]
/// # System Fonts.
///
/// Text elements are shaped against the fonts installed on the system. The
/// scan runs once per process. With no fonts installed, text is dropped but
/// the rest of the document still renders.
fn fonts() -> &'static std::sync::Arc<resvg::usvg::fontdb::Database> {
	use resvg::usvg::fontdb::Database;
	use std::sync::{
		Arc,
		OnceLock,
	};

	static FONTS: OnceLock<Arc<Database>> = OnceLock::new();
	FONTS.get_or_init(|| {
		let mut db = Database::new();
		db.load_system_fonts();
		log::debug!("Loaded {} system font face(s) for SVG text.", db.len());
		Arc::new(db)
	})
}

#[cfg(feature = "svg")]
/// # Strip Headers.
///
/// Remove a leading XML declaration and the DOCTYPE (including an internal
/// subset) that follows it. Some parsers refuse one or the other.
fn strip_headers(raw: &[u8]) -> std::borrow::Cow<'_, [u8]> {
	use regex::bytes::Regex;
	use std::{
		borrow::Cow,
		sync::OnceLock,
	};

	static PROLOG: OnceLock<Option<Regex>> = OnceLock::new();
	static DOCTYPE: OnceLock<Option<Regex>> = OnceLock::new();

	let prolog = PROLOG.get_or_init(|| Regex::new(r"(?s-u)\A\s*<\?xml.*?\?>").ok());
	let doctype = DOCTYPE.get_or_init(|| Regex::new(r"(?s-u)<!DOCTYPE[^\[>]*(?:\[.*?\])?\s*>").ok());

	let start = prolog.as_ref()
		.and_then(|re| re.find(raw))
		.map_or(0, |m| m.end());
	let rest = &raw[start..];

	match doctype.as_ref().and_then(|re| re.find(rest)) {
		Some(m) => {
			let mut out = Vec::with_capacity(rest.len() - m.len());
			out.extend_from_slice(&rest[..m.start()]);
			out.extend_from_slice(&rest[m.end()..]);
			Cow::Owned(out)
		},
		None => Cow::Borrowed(rest),
	}
}

/// # Check Raster Size.
///
/// Refuse pages too large to allocate. Empty pages are caught later.
fn check_size(width: u32, height: u32) -> Result<(), RecastError> {
	if u64::from(width) * u64::from(height) <= MAX_PIXELS { Ok(()) }
	else {
		Err(RecastError::Rasterize(format!(
			"The SVG page is too large to rasterize ({width}x{height})."
		)))
	}
}

/// # Fit Scale.
///
/// Work out the uniform scale for a document of `size` given optional
/// target dimensions.
fn fit_scale(size: (f32, f32), width: Option<u32>, height: Option<u32>) -> f32 {
	#[allow(clippy::cast_precision_loss)]
	let ratio = |target: u32, actual: f32| target as f32 / actual;

	let scale = match (width, height) {
		(Some(w), Some(h)) => ratio(w, size.0).min(ratio(h, size.1)),
		(Some(w), None) => ratio(w, size.0),
		(None, Some(h)) => ratio(h, size.1),
		(None, None) => 1.0,
	};

	if scale.is_finite() && 0.0 < scale { scale }
	else { 1.0 }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_fit_scale() {
		assert_eq!(fit_scale((200.0, 100.0), None, None), 1.0);
		assert_eq!(fit_scale((200.0, 100.0), Some(50), None), 0.25);
		assert_eq!(fit_scale((200.0, 100.0), None, Some(50)), 0.5);
		assert_eq!(fit_scale((200.0, 100.0), Some(50), Some(50)), 0.25);
		assert_eq!(fit_scale((200.0, 100.0), Some(400), Some(100)), 1.0);
		assert_eq!(fit_scale((0.0, 100.0), Some(50), None), 1.0);
	}

	#[test]
	fn t_page() {
		let page = Page::from_px(96.0, 48.0);
		assert_eq!(page, Page { width: 72.0, height: 36.0 });
		assert_eq!(page.raster_size(96.0), (96, 48));
		assert_eq!(page.raster_size(192.0), (192, 96));
		assert_eq!(page.raster_size(72.0), (72, 36));
	}

	#[test]
	fn t_check_size() {
		assert!(check_size(0, 0).is_ok());
		assert!(check_size(16_384, 16_384).is_ok());
		assert!(check_size(u32::MAX, 1).is_err());
		assert!(matches!(check_size(100_000, 100_000), Err(RecastError::Rasterize(_))));
	}

	#[test]
	fn t_unavailable() {
		let backends = Backends::builder()
			.without_native()
			.without_tools()
			.without_plugins()
			.build();
		let err = rasterize(b"<svg/>", None, None, DEFAULT_DPI, &backends).unwrap_err();
		assert!(matches!(err, RecastError::Rasterize(_)));
	}

	#[cfg(feature = "svg")]
	mod rendered {
		use super::*;

		const RED: &[u8] = br##"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 200 100">
	<rect x="0" y="0" width="200" height="100" fill="#ff0000"/>
</svg>"##;

		fn backends() -> Backends {
			Backends::builder().without_native().without_tools().build()
		}

		#[test]
		fn t_strip_headers() {
			let out = strip_headers(RED);
			assert!(out.starts_with(b"\n\n<svg"));
			assert!(! out.windows(9).any(|w| w == b"<!DOCTYPE"));

			let bare = b"<svg/>";
			assert!(matches!(strip_headers(bare), std::borrow::Cow::Borrowed(_)));

			let subset = b"<!DOCTYPE svg [ <!ENTITY a \"b\"> ]><svg/>";
			assert_eq!(&*strip_headers(subset), b"<svg/>");
		}

		#[test]
		fn t_native_size() {
			let img = rasterize(RED, None, None, DEFAULT_DPI, &backends()).unwrap();
			assert_eq!((img.width(), img.height()), (200, 100));
			assert!(img.chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
		}

		#[test]
		fn t_width_only() {
			let img = rasterize(RED, Some(50), None, DEFAULT_DPI, &backends()).unwrap();
			assert_eq!(img.width(), 50);
			assert!(img.height().abs_diff(25) <= 1);
		}

		#[test]
		fn t_box() {
			let img = rasterize(RED, Some(80), Some(80), DEFAULT_DPI, &backends()).unwrap();
			assert_eq!((img.width(), img.height()), (80, 40));

			let img = rasterize(RED, Some(1000), Some(100), DEFAULT_DPI, &backends()).unwrap();
			assert_eq!((img.width(), img.height()), (200, 100));
		}

		#[test]
		fn t_dpi() {
			let img = rasterize(RED, Some(50), None, 192.0, &backends()).unwrap();
			assert_eq!((img.width(), img.height()), (100, 50));
			assert!(rasterize(RED, None, None, 0.0, &backends()).is_err());
		}

		#[test]
		fn t_white_page() {
			let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"/>"#;
			let img = rasterize(svg, None, None, DEFAULT_DPI, &backends()).unwrap();
			assert!(img.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
		}

		#[test]
		fn t_text() {
			let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="40">
<text x="4" y="30" font-family="sans-serif" font-size="28" fill="black">Recast</text>
</svg>"#;
			let img = rasterize(svg, None, None, DEFAULT_DPI, &backends()).unwrap();
			assert_eq!((img.width(), img.height()), (120, 40));

			// Glyphs only show up when the host has a font to draw them with.
			if fonts().faces().next().is_some() {
				assert!(img.chunks_exact(4).any(|px| px[..3] != [255, 255, 255]));
			}
		}

		#[test]
		fn t_huge_page() {
			let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100000" height="100000"/>"#;
			let err = rasterize(svg, None, None, DEFAULT_DPI, &backends()).unwrap_err();
			assert!(matches!(err, RecastError::Rasterize(_)));

			// Scaling it down to a sane box is fine.
			let img = rasterize(svg, Some(64), Some(64), DEFAULT_DPI, &backends()).unwrap();
			assert_eq!((img.width(), img.height()), (64, 64));
		}

		#[test]
		fn t_invalid() {
			let err = rasterize(b"<svg <<<", None, None, DEFAULT_DPI, &backends()).unwrap_err();
			assert!(matches!(err, RecastError::Rasterize(_)));
		}
	}
}
