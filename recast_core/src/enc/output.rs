/*!
# `Recast` - Encoded Output.
*/

use crate::ImageKind;
use std::{
	borrow::Cow,
	io::Cursor,
	ops::Deref,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Output Image.
///
/// This holds the raw file data for a converted image along with a little
/// bookkeeping: the format it was encoded to, the format it came from, the
/// dimensions, and the name of the encoder that actually produced it.
///
/// Both `AsRef<[u8]>` and `Deref` traits are implemented to provide raw access
/// to the data.
pub struct Output {
	data: Vec<u8>,
	kind: ImageKind,
	source: Option<ImageKind>,
	width: u32,
	height: u32,
	encoder: &'static str,
	ext: Cow<'static, str>,
}

impl AsRef<[u8]> for Output {
	#[inline]
	fn as_ref(&self) -> &[u8] { self }
}

impl Deref for Output {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.data }
}

impl From<Output> for Vec<u8> {
	#[inline]
	fn from(src: Output) -> Self { src.data }
}

/// ## Instantiation.
impl Output {
	/// # New.
	pub(crate) fn new(
		data: Vec<u8>,
		kind: ImageKind,
		(width, height): (u32, u32),
		encoder: &'static str,
	) -> Self {
		Self {
			data,
			kind,
			source: None,
			width,
			height,
			encoder,
			ext: Cow::Borrowed(kind.extension()),
		}
	}

	#[must_use]
	/// # With Source Kind.
	pub(crate) const fn with_source(mut self, source: ImageKind) -> Self {
		self.source = Some(source);
		self
	}

	#[must_use]
	/// # With Requested Extension.
	///
	/// Remember the target exactly as it was asked for (lowercased), so e.g.
	/// a "jfif" request suggests an `image.jfif` file name.
	pub(crate) fn with_extension(mut self, ext: &str) -> Self {
		let ext = ext.trim().to_ascii_lowercase();
		if ! ext.is_empty() { self.ext = Cow::Owned(ext); }
		self
	}
}

/// ## Getters.
impl Output {
	#[must_use]
	/// # Encoded Kind.
	pub const fn kind(&self) -> ImageKind { self.kind }

	#[must_use]
	/// # Source Kind.
	///
	/// This is `None` when the image was encoded directly rather than
	/// converted from a file.
	pub const fn source_kind(&self) -> Option<ImageKind> { self.source }

	#[must_use]
	/// # Width.
	pub const fn width(&self) -> u32 { self.width }

	#[must_use]
	/// # Height.
	pub const fn height(&self) -> u32 { self.height }

	#[must_use]
	/// # Encoder.
	///
	/// The name of the backend that produced the data, e.g. "libwebp" or
	/// "image".
	pub const fn encoder(&self) -> &'static str { self.encoder }

	#[must_use]
	/// # MIME Type.
	pub const fn mime(&self) -> &'static str { self.kind.mime() }

	#[must_use]
	/// # Suggested File Name.
	pub fn file_name(&self) -> String { format!("image.{}", self.ext) }
}

/// ## Conversion.
impl Output {
	#[must_use]
	/// # Into Cursor.
	///
	/// Wrap the data in a readable stream positioned at its start.
	pub fn into_cursor(self) -> Cursor<Vec<u8>> { Cursor::new(self.data) }
}



#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Read;

	#[test]
	fn t_getters() {
		let out = Output::new(vec![1, 2, 3], ImageKind::Jpeg, (4, 5), "image");
		assert_eq!(out.kind(), ImageKind::Jpeg);
		assert_eq!(out.source_kind(), None);
		assert_eq!((out.width(), out.height()), (4, 5));
		assert_eq!(out.mime(), "image/jpeg");
		assert_eq!(out.file_name(), "image.jpg");
		assert_eq!(&*out, &[1, 2, 3]);

		let out = out.with_source(ImageKind::Png).with_extension(" JFIF ");
		assert_eq!(out.source_kind(), Some(ImageKind::Png));
		assert_eq!(out.file_name(), "image.jfif");
	}

	#[test]
	fn t_cursor() {
		let out = Output::new(b"RIFF".to_vec(), ImageKind::Webp, (1, 1), "image");
		let mut buf = Vec::new();
		out.clone().into_cursor().read_to_end(&mut buf).unwrap();
		assert_eq!(buf, b"RIFF");
		assert_eq!(Vec::from(out), buf);
	}
}
