/*!
# `Recast` - Encoding!

Each output format has an ordered plan of encoding strategies. The first
strategy that produces valid output wins; failures are logged and the next
strategy is tried. PNG output may then get an optimizer pass, which is
never allowed to lose the original bytes.
*/

pub(super) mod output;

mod avif;
mod bmp;
mod jpeg;
mod png;
mod webp;

use crate::{
	Backends,
	EncodeOptions,
	Image,
	ImageKind,
	Output,
	RecastError,
	error::Fallback,
};
use std::{
	fmt,
	io::Cursor,
};



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Encoding Strategy.
enum Strategy {
	WebpNative,
	WebpGeneral,
	Avif,
	JpegMozjpeg,
	JpegGeneral,
	PngGeneral,
	BmpGeneral,
}

impl fmt::Display for Strategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.encoder())
	}
}

impl Strategy {
	/// # Encoder Name.
	const fn encoder(self) -> &'static str {
		match self {
			Self::WebpNative => "libwebp",
			Self::Avif => "ravif",
			Self::JpegMozjpeg => "mozjpeg",
			Self::WebpGeneral | Self::JpegGeneral | Self::PngGeneral | Self::BmpGeneral => "image",
		}
	}

	/// # Run.
	fn run(self, job: &Job<'_>) -> Result<Vec<u8>, Fallback> {
		match self {
			Self::WebpNative => match job.backends.webp() {
				Some(codec) => webp::native(codec, job.img, &job.opts),
				None => Err(Fallback::new("Native WebP is not available.")),
			},
			Self::WebpGeneral => webp::general(job.img, &job.opts),
			Self::Avif => avif::encode(job.img, &job.opts, job.backends),
			Self::JpegMozjpeg => jpeg::mozjpeg(&job.rgb, job.size(), &job.opts, job.backends),
			Self::JpegGeneral => jpeg::general(&job.rgb, job.size(), &job.opts),
			Self::PngGeneral => png::general(job.img),
			Self::BmpGeneral => bmp::encode(&job.rgb, job.size()),
		}
	}
}



/// # Encoding Job.
///
/// The source image and everything the strategies need to work on it. The
/// three-channel rendition is built once up front for the formats that want
/// one.
struct Job<'a> {
	img: &'a Image,
	rgb: Vec<u8>,
	opts: EncodeOptions,
	backends: &'a Backends,
}

impl<'a> Job<'a> {
	/// # New.
	fn new(img: &'a Image, kind: ImageKind, opts: EncodeOptions, backends: &'a Backends) -> Self {
		let rgb = match kind {
			// Flattening an opaque image is the same as stripping it.
			ImageKind::Jpeg if img.has_alpha() => {
				log::debug!("Flattening transparency onto white for JPEG.");
				img.to_rgb_flattened()
			},
			ImageKind::Jpeg | ImageKind::Bmp => img.to_rgb_stripped(),
			_ => Vec::new(),
		};
		Self { img, rgb, opts, backends }
	}

	/// # Dimensions.
	const fn size(&self) -> (u32, u32) { (self.img.width(), self.img.height()) }
}



/// # Encode.
///
/// Encode a canonical image to the given format.
///
/// ## Errors
///
/// This will return an error if the format cannot be encoded (e.g. SVG, or
/// AVIF without an encoder), or if every strategy in the plan fails.
pub fn encode(img: &Image, kind: ImageKind, opts: EncodeOptions, backends: &Backends)
-> Result<Output, RecastError> {
	let steps = plan(kind, &opts, backends);
	if steps.is_empty() {
		return Err(RecastError::Encode(format!("No {kind} encoder is available.")));
	}

	let job = Job::new(img, kind, opts, backends);
	let mut reasons = Vec::new();
	for step in steps {
		match step.run(&job).and_then(|raw| verify(raw, kind)) {
			Ok(raw) => {
				log::debug!("Encoded {kind} with {step}.");
				let out = Output::new(raw, kind, job.size(), step.encoder());
				return Ok(post_optimize(out, &job.opts, backends));
			},
			Err(e) => {
				log::warn!("{kind} encoding with {step} failed: {e}");
				reasons.push(format!("{step}: {e}"));
			},
		}
	}

	Err(RecastError::Encode(reasons.join("; ")))
}

/// # Encode (Other Format).
///
/// Targets outside the first-class set are resolved by the `image` crate
/// from the name alone and saved with its defaults. The result must still
/// be a format this crate can identify.
///
/// ## Errors
///
/// This will return an error if the name is unknown to the `image` crate,
/// maps to a format this crate does not model, or does not encode.
pub fn encode_other(img: &Image, target: &str) -> Result<Output, RecastError> {
	let target = target.trim().to_ascii_lowercase();
	let unsupported = || RecastError::Encode(format!("Unsupported output format: {target}"));

	let format = image::ImageFormat::from_extension(&target).ok_or_else(unsupported)?;
	let kind = ImageKind::try_from(format).map_err(|_| unsupported())?;
	if ! kind.can_encode() { return Err(unsupported()); }

	let src = img.to_rgba_image().ok_or(RecastError::Overflow)?;
	let mut buf = Cursor::new(Vec::new());
	image::DynamicImage::ImageRgba8(src)
		.write_to(&mut buf, format)
		.map_err(|e| RecastError::Encode(e.to_string()))?;

	let raw = verify(buf.into_inner(), kind).map_err(|e| RecastError::Encode(e.0))?;
	Ok(Output::new(raw, kind, (img.width(), img.height()), "image").with_extension(&target))
}

/// # Plan.
///
/// The ordered strategies for a given output format. Unavailable backends
/// are left out.
fn plan(kind: ImageKind, opts: &EncodeOptions, backends: &Backends) -> Vec<Strategy> {
	match kind {
		ImageKind::Webp =>
			if backends.webp().is_some() { vec![Strategy::WebpNative, Strategy::WebpGeneral] }
			else { vec![Strategy::WebpGeneral] },
		ImageKind::Avif =>
			if backends.has_avif_plugin() { vec![Strategy::Avif] }
			else { Vec::new() },
		ImageKind::Jpeg =>
			if opts.optimize() && backends.tool(crate::Tool::Mozjpeg).is_some() {
				vec![Strategy::JpegMozjpeg, Strategy::JpegGeneral]
			}
			else { vec![Strategy::JpegGeneral] },
		ImageKind::Png => vec![Strategy::PngGeneral],
		ImageKind::Bmp => vec![Strategy::BmpGeneral],
		ImageKind::Svg => Vec::new(),
	}
}

/// # Verify.
///
/// Encoders must never release garbage: the output has to be non-empty and
/// carry the right magic.
fn verify(raw: Vec<u8>, kind: ImageKind) -> Result<Vec<u8>, Fallback> {
	if raw.is_empty() { Err(Fallback::new("The encoder produced no data.")) }
	else if ImageKind::try_from(raw.as_slice()) == Ok(kind) { Ok(raw) }
	else { Err(Fallback::new(format!("The encoder did not produce a valid {kind}."))) }
}

/// # Post Optimize.
///
/// Run the preferred PNG optimizer, when asked and available. Failure keeps
/// the pre-optimization bytes.
fn post_optimize(out: Output, opts: &EncodeOptions, backends: &Backends) -> Output {
	if out.kind() != ImageKind::Png || ! opts.optimize() { return out; }
	let Some(tool) = png::optimizer(backends) else { return out; };

	match png::optimize(&out, tool, backends) {
		Ok(raw) => {
			log::debug!("Optimized PNG with {tool}: {} -> {} bytes.", out.len(), raw.len());
			Output::new(raw, ImageKind::Png, (out.width(), out.height()), tool.as_str())
		},
		Err(e) => {
			log::warn!("PNG optimization with {tool} failed, keeping the original: {e}");
			out
		},
	}
}
