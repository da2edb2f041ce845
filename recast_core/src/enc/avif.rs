/*!
# `Recast`: AVIF Encoding

AVIF output comes from the bundled [`ravif`](https://crates.io/crates/ravif)
encoder, which is compiled in with the `avif` feature and can be switched off
per registry. A native `libavif` found on the system is reported, but is not
used for encoding.
*/

use crate::{
	Backends,
	EncodeOptions,
	Image,
	error::Fallback,
};



/// # Encoder Speed.
///
/// `ravif` runs from 1 (slowest) to 10 (fastest).
#[cfg(feature = "avif")]
const SPEED: u8 = 6;



/// # Encode.
pub(super) fn encode(img: &Image, opts: &EncodeOptions, backends: &Backends)
-> Result<Vec<u8>, Fallback> {
	if backends.has_avif_plugin() { encode_ravif(img, opts) }
	else { Err(Fallback::new("No AVIF encoder is available.")) }
}

#[cfg(not(feature = "avif"))]
/// # Encode (Unsupported).
fn encode_ravif(_img: &Image, _opts: &EncodeOptions) -> Result<Vec<u8>, Fallback> {
	Err(Fallback::new("No AVIF encoder is available."))
}

#[cfg(feature = "avif")]
/// # Encode With `ravif`.
///
/// Lossless requests are encoded at full quality in RGB rather than YUV.
fn encode_ravif(img: &Image, opts: &EncodeOptions) -> Result<Vec<u8>, Fallback> {
	use imgref::Img;
	use ravif::{
		ColorModel,
		Encoder,
	};
	use rgb::FromSlice;

	// ravif's scale starts at 1.
	let quality =
		if opts.lossless() { 100.0 }
		else { f32::from(opts.quality().max(1)) };

	let mut enc = Encoder::new()
		.with_quality(quality)
		.with_alpha_quality(quality)
		.with_speed(SPEED);
	if opts.lossless() {
		enc = enc.with_internal_color_model(ColorModel::RGB);
	}

	let width = usize::try_from(img.width()).map_err(|_| Fallback::new("Width overflow."))?;
	let height = usize::try_from(img.height()).map_err(|_| Fallback::new("Height overflow."))?;
	let src = Img::new(img.as_rgba(), width, height);

	enc.encode_rgba(src)
		.map(|res| res.avif_file)
		.map_err(|e| Fallback::new(format!("ravif: {e}")))
}
