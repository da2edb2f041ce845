/*!
# `Recast`: PNG Encoding
*/

use crate::{
	Backends,
	Image,
	ImageKind,
	Tool,
	backend::tool,
	error::Fallback,
};
use image::{
	ExtendedColorType,
	ImageEncoder,
	codecs::png::{
		CompressionType,
		FilterType,
		PngEncoder,
	},
};
use std::{
	ffi::OsStr,
	io::Write,
};



/// # Optimizers.
///
/// In order of preference.
const OPTIMIZERS: [Tool; 2] = [Tool::Oxipng, Tool::Optipng];



/// # Encode (General).
///
/// PNG is always lossless, and alpha is preserved.
pub(super) fn general(img: &Image) -> Result<Vec<u8>, Fallback> {
	let mut out = Vec::new();
	PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive)
		.write_image(img, img.width(), img.height(), ExtendedColorType::Rgba8)?;
	Ok(out)
}

/// # Optimizer.
///
/// Return the preferred installed optimizer, if any.
pub(super) fn optimizer(backends: &Backends) -> Option<Tool> {
	OPTIMIZERS.into_iter().find(|&t| backends.tool(t).is_some())
}

/// # Optimize.
///
/// Rewrite an encoded PNG in place with an external optimizer. The result
/// must still be a non-empty PNG.
pub(super) fn optimize(raw: &[u8], which: Tool, backends: &Backends)
-> Result<Vec<u8>, Fallback> {
	let program = backends.tool(which)
		.ok_or_else(|| Fallback::new(format!("{which} is not available.")))?;

	let mut tmp = backends.tempfile(".png")?;
	tmp.write_all(raw)?;
	tmp.flush()?;
	let path = tmp.into_temp_path();

	let flags: &[&str] = match which {
		Tool::Oxipng => &["-o", "2", "-q"],
		Tool::Optipng => &["-quiet", "-o2"],
		Tool::Mozjpeg => return Err(Fallback::new("cjpeg cannot optimize PNGs.")),
	};
	let args: Vec<&OsStr> = flags.iter()
		.map(OsStr::new)
		.chain(std::iter::once(path.as_os_str()))
		.collect();
	tool::run(program, &args, backends.tool_timeout())?;

	let out = std::fs::read(&path)?;
	if ImageKind::try_from(out.as_slice()) == Ok(ImageKind::Png) { Ok(out) }
	else { Err(Fallback::new(format!("{which} did not produce a PNG."))) }
}
