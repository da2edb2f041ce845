/*!
# `Recast`: `WebP` Encoding

The native `libwebp`, when one was found, handles both lossy and lossless
output. Otherwise the `image` crate takes over, but its encoder is
lossless-only, so the quality setting has no effect on that path.
*/

use crate::{
	EncodeOptions,
	Image,
	WebpCodec,
	error::Fallback,
};
use image::{
	ExtendedColorType,
	codecs::webp::WebPEncoder,
};



/// # Encode (Native).
pub(super) fn native(codec: &dyn WebpCodec, img: &Image, opts: &EncodeOptions)
-> Result<Vec<u8>, Fallback> {
	let quality =
		if opts.lossless() { None }
		else { Some(f32::from(opts.quality())) };

	codec.encode(img, quality).map_err(Fallback)
}

/// # Encode (General).
pub(super) fn general(img: &Image, opts: &EncodeOptions) -> Result<Vec<u8>, Fallback> {
	if ! opts.lossless() {
		log::debug!(
			"The bundled WebP encoder is lossless-only; quality {} has no effect.",
			opts.quality(),
		);
	}

	let mut out = Vec::new();
	WebPEncoder::new_lossless(&mut out)
		.encode(img, img.width(), img.height(), ExtendedColorType::Rgba8)?;
	Ok(out)
}



#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug)]
	struct Echo;

	impl WebpCodec for Echo {
		fn encode(&self, _img: &Image, quality: Option<f32>) -> Result<Vec<u8>, String> {
			Ok(quality.map_or_else(|| b"lossless".to_vec(), |q| format!("{q}").into_bytes()))
		}
		fn decode(&self, _raw: &[u8]) -> Result<Image, String> {
			Err("encode only".to_owned())
		}
	}

	#[test]
	fn t_native_quality() {
		let img = Image::new(vec![0, 0, 0, 255], 1, 1).unwrap();
		let opts = EncodeOptions::default().with_quality(55);
		assert_eq!(native(&Echo, &img, &opts).unwrap(), b"55");

		let opts = opts.with_lossless(true);
		assert_eq!(native(&Echo, &img, &opts).unwrap(), b"lossless");
	}

	#[test]
	fn t_general_lossless() {
		let img = Image::new(
			(0..16_u8).flat_map(|v| [v * 16, 255 - v, v, 128 + v]).collect(),
			4,
			4,
		).unwrap();
		let raw = general(&img, &EncodeOptions::default()).unwrap();
		assert_eq!(&raw[..4], b"RIFF");
		assert_eq!(&raw[8..12], b"WEBP");

		let back = image::load_from_memory(&raw).unwrap().into_rgba8();
		assert_eq!(back.as_raw().as_slice(), &img[..]);
	}
}
