/*!
# `Recast`: JPEG Encoding

JPEG has no alpha channel, so sources are flattened onto white before they
reach either encoder.

When optimization is requested and `cjpeg` (`MozJPEG`) is installed, the
pixels make a round trip through a pair of temporary files. The `image`
crate is the fallback; it has no equivalent of the optimize flag.
*/

use crate::{
	Backends,
	EncodeOptions,
	Tool,
	backend::tool,
	error::Fallback,
};
use image::{
	ExtendedColorType,
	ImageEncoder,
	codecs::{
		jpeg::JpegEncoder,
		pnm::{
			PnmEncoder,
			PnmSubtype,
			SampleEncoding,
		},
	},
};
use std::{
	ffi::OsStr,
	io::{
		BufWriter,
		Write,
	},
};



/// # Encode With `MozJPEG`.
///
/// The flattened RGB pixels are saved as a binary PPM, run through
/// `cjpeg -optimize`, and read back. Both temporary files are removed when
/// this returns, however it returns.
pub(super) fn mozjpeg(
	rgb: &[u8],
	(width, height): (u32, u32),
	opts: &EncodeOptions,
	backends: &Backends,
) -> Result<Vec<u8>, Fallback> {
	let program = backends.tool(Tool::Mozjpeg)
		.ok_or_else(|| Fallback::new("cjpeg is not available."))?;

	let src = backends.tempfile(".ppm")?;
	{
		let mut w = BufWriter::new(src.as_file());
		PnmEncoder::new(&mut w)
			.with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
			.write_image(rgb, width, height, ExtendedColorType::Rgb8)?;
		w.flush()?;
	}
	let src = src.into_temp_path();
	let dst = backends.tempfile(".jpg")?.into_temp_path();

	let quality = opts.quality().max(1).to_string();
	let args: [&OsStr; 6] = [
		OsStr::new("-quality"),
		OsStr::new(&quality),
		OsStr::new("-optimize"),
		OsStr::new("-outfile"),
		dst.as_os_str(),
		src.as_os_str(),
	];
	tool::run(program, &args, backends.tool_timeout())?;

	let out = std::fs::read(&dst)?;
	if out.is_empty() { Err(Fallback::new("cjpeg produced an empty file.")) }
	else { Ok(out) }
}

/// # Encode (General).
pub(super) fn general(rgb: &[u8], (width, height): (u32, u32), opts: &EncodeOptions)
-> Result<Vec<u8>, Fallback> {
	if opts.optimize() {
		log::debug!("The bundled JPEG encoder ignores the optimize flag.");
	}

	let mut out = Vec::new();
	JpegEncoder::new_with_quality(&mut out, opts.quality().max(1))
		.encode(rgb, width, height, ExtendedColorType::Rgb8)?;
	Ok(out)
}
