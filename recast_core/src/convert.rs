/*!
# `Recast` - Conversion
*/

use crate::{
	Backends,
	DEFAULT_DPI,
	EncodeOptions,
	ImageKind,
	Output,
	RecastError,
	Sniff,
	dec,
	enc,
	sniff,
	svg,
};
use std::{
	io::{
		Read,
		Seek,
		SeekFrom,
	},
	path::Path,
};



#[derive(Debug, Clone, Copy)]
/// # Converter.
///
/// This runs the full pipeline (sniff, decode or rasterize, encode) against
/// a particular [`Backends`] registry. The free [`convert`] and
/// [`convert_slice`] functions do the same with [`Backends::global`].
///
/// ## Examples
///
/// ```no_run
/// use recast_core::{Backends, Converter, EncodeOptions};
///
/// let raw = std::fs::read("photo.png").unwrap();
/// let out = Converter::new(Backends::global())
///     .convert_slice(&raw, None, "webp", EncodeOptions::default())
///     .unwrap();
/// assert_eq!(out.mime(), "image/webp");
/// ```
pub struct Converter<'a> {
	backends: &'a Backends,
}

impl Default for Converter<'static> {
	#[inline]
	fn default() -> Self { Self::new(Backends::global()) }
}

impl<'a> Converter<'a> {
	#[must_use]
	/// # New.
	pub const fn new(backends: &'a Backends) -> Self { Self { backends } }

	/// # Convert Stream.
	///
	/// Read the entire stream, from the very beginning, and convert it.
	///
	/// ## Errors
	///
	/// This will return an error if the stream cannot be read or is empty,
	/// or if any stage of the conversion fails.
	pub fn convert<R: Read + Seek>(
		&self,
		mut src: R,
		target: &str,
		opts: EncodeOptions,
	) -> Result<Output, RecastError> {
		src.seek(SeekFrom::Start(0)).map_err(|e| RecastError::Input(e.to_string()))?;
		let mut raw = Vec::new();
		src.read_to_end(&mut raw).map_err(|e| RecastError::Input(e.to_string()))?;
		self.convert_slice(&raw, None, target, opts)
	}

	/// # Convert Slice.
	///
	/// The optional file name is only used as a hint by the sniffer when the
	/// content alone does not look like SVG.
	///
	/// ## Errors
	///
	/// This will return an error if the input is empty, or if any stage of
	/// the conversion fails.
	pub fn convert_slice(
		&self,
		raw: &[u8],
		name: Option<&Path>,
		target: &str,
		opts: EncodeOptions,
	) -> Result<Output, RecastError> {
		if raw.is_empty() {
			return Err(RecastError::Input("The image is empty.".to_owned()));
		}

		let (img, source) = match sniff(raw, name) {
			Sniff::Svg => (
				svg::rasterize(raw, None, None, DEFAULT_DPI, self.backends)?,
				ImageKind::Svg,
			),
			Sniff::Raster => dec::decode(raw, self.backends)?,
		};
		log::debug!("Loaded {}x{} {source} source.", img.width(), img.height());

		let out = match target.parse::<ImageKind>() {
			Ok(kind) => enc::encode(&img, kind, opts, self.backends)?.with_extension(target),
			Err(_) => enc::encode_other(&img, target)?,
		};

		Ok(out.with_source(source))
	}
}



/// # Convert Stream.
///
/// Convert using the process-wide [`Backends`] registry.
///
/// ## Errors
///
/// See [`Converter::convert`].
pub fn convert<R: Read + Seek>(src: R, target: &str, opts: EncodeOptions)
-> Result<Output, RecastError> {
	Converter::default().convert(src, target, opts)
}

/// # Convert Slice.
///
/// Convert using the process-wide [`Backends`] registry.
///
/// ## Errors
///
/// See [`Converter::convert_slice`].
pub fn convert_slice(raw: &[u8], name: Option<&Path>, target: &str, opts: EncodeOptions)
-> Result<Output, RecastError> {
	Converter::default().convert_slice(raw, name, target, opts)
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn backends() -> Backends {
		Backends::builder().without_native().without_tools().build()
	}

	fn png(img: &image::RgbaImage) -> Vec<u8> {
		let mut out = Cursor::new(Vec::new());
		img.write_to(&mut out, image::ImageFormat::Png).unwrap();
		out.into_inner()
	}

	#[test]
	fn t_empty() {
		let b = backends();
		let conv = Converter::new(&b);
		let err = conv.convert_slice(&[], None, "png", EncodeOptions::default()).unwrap_err();
		assert!(matches!(err, RecastError::Input(_)));

		let err = conv.convert(Cursor::new(Vec::new()), "png", EncodeOptions::default()).unwrap_err();
		assert!(matches!(err, RecastError::Input(_)));
	}

	#[test]
	fn t_seek_to_start() {
		let src = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 0, 255, 255]));
		let mut stream = Cursor::new(png(&src));
		stream.seek(SeekFrom::End(0)).unwrap();

		let b = backends();
		let out = Converter::new(&b).convert(stream, "bmp", EncodeOptions::default()).unwrap();
		assert_eq!(out.kind(), ImageKind::Bmp);
		assert_eq!(out.source_kind(), Some(ImageKind::Png));
		assert_eq!((out.width(), out.height()), (3, 3));
	}

	#[test]
	fn t_targets() {
		let src = image::RgbaImage::from_fn(6, 4, |x, y| image::Rgba([x as u8 * 40, y as u8 * 60, 90, 255]));
		let raw = png(&src);
		let b = backends();
		let conv = Converter::new(&b);

		for (target, kind) in [
			("png", ImageKind::Png),
			("JPEG", ImageKind::Jpeg),
			("jpg", ImageKind::Jpeg),
			("jfif", ImageKind::Jpeg),
			("bmp", ImageKind::Bmp),
			("webp", ImageKind::Webp),
		] {
			let out = conv.convert_slice(&raw, None, target, EncodeOptions::default()).unwrap();
			assert!(! out.is_empty());
			assert_eq!(ImageKind::try_from(&*out), Ok(kind));
			assert_eq!(out.file_name(), format!("image.{}", target.to_ascii_lowercase()));
		}

		let avif = conv.convert_slice(&raw, None, "avif", EncodeOptions::default());
		if b.is_avif_available() {
			assert_eq!(avif.unwrap().kind(), ImageKind::Avif);
		}
		else {
			assert!(matches!(avif, Err(RecastError::Encode(_))));
		}
	}

	#[test]
	fn t_png_idempotent() {
		let src = image::RgbaImage::from_fn(5, 5, |x, y| image::Rgba([x as u8, y as u8, 3, 128]));
		let b = backends();
		let conv = Converter::new(&b);
		let opts = EncodeOptions::default();

		let once = conv.convert_slice(&png(&src), None, "png", opts).unwrap();
		let twice = conv.convert_slice(&once, None, "png", opts).unwrap();
		assert_eq!(&*once, &*twice);
	}

	#[test]
	fn t_transparent_jpeg() {
		let src = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
		let b = backends();
		let out = Converter::new(&b)
			.convert_slice(&png(&src), None, "jpeg", EncodeOptions::default().with_quality(100))
			.unwrap();
		let back = image::load_from_memory(&out).unwrap().into_rgb8();
		assert_eq!(back.dimensions(), (1, 1));
		assert_eq!(back.get_pixel(0, 0).0, [255, 255, 255]);
	}

	#[test]
	fn t_bad_target() {
		let src = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
		let b = backends();
		let conv = Converter::new(&b);
		for target in ["xyz", "svg", ""] {
			let err = conv.convert_slice(&png(&src), None, target, EncodeOptions::default()).unwrap_err();
			assert!(matches!(err, RecastError::Encode(_)), "{target}");
		}
	}

	#[test]
	fn t_svg() {
		let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="4"><rect width="8" height="4" fill="lime"/></svg>"#;
		let b = backends();
		let res = Converter::new(&b).convert_slice(svg, None, "png", EncodeOptions::default());

		if b.has_svg() {
			let out = res.unwrap();
			assert_eq!(out.source_kind(), Some(ImageKind::Svg));
			assert_eq!((out.width(), out.height()), (8, 4));
		}
		else {
			assert!(matches!(res, Err(RecastError::Rasterize(_))));
		}

		let bare = Backends::builder().without_native().without_tools().without_plugins().build();
		let err = Converter::new(&bare)
			.convert_slice(svg, None, "png", EncodeOptions::default())
			.unwrap_err();
		assert!(matches!(err, RecastError::Rasterize(_)));
	}
}
