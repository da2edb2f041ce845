/*!
# `Recast` - Image Business
*/

pub(super) mod alpha;

use crate::RecastError;
use std::{
	num::NonZeroU32,
	ops::Deref,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Image.
///
/// This is the canonical decoded image: a contiguous, row-major RGBA buffer,
/// 4 bytes per pixel, no padding. The length always equals
/// `width * height * 4`.
///
/// Transforms never touch the buffer in place; they return new buffers.
///
/// The underlying buffer can be accessed through `Deref` as an `&[u8]`.
pub struct Image {
	pixels: Vec<u8>,
	width: NonZeroU32,
	height: NonZeroU32,
}

impl Deref for Image {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { &self.pixels }
}

impl AsRef<[u8]> for Image {
	#[inline]
	fn as_ref(&self) -> &[u8] { self }
}

impl TryFrom<image::RgbaImage> for Image {
	type Error = RecastError;

	#[inline]
	fn try_from(src: image::RgbaImage) -> Result<Self, Self::Error> {
		let (width, height) = src.dimensions();
		Self::new(src.into_raw(), width, height)
	}
}

impl Image {
	/// # New.
	///
	/// Wrap an RGBA buffer.
	///
	/// ## Errors
	///
	/// This will return an error if either dimension is zero or the buffer
	/// length does not match the dimensions.
	pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self, RecastError> {
		let width = NonZeroU32::new(width).ok_or(RecastError::Overflow)?;
		let height = NonZeroU32::new(height).ok_or(RecastError::Overflow)?;
		let expected = (width.get() as usize)
			.checked_mul(height.get() as usize)
			.and_then(|n| n.checked_mul(4))
			.ok_or(RecastError::Overflow)?;

		if pixels.len() == expected { Ok(Self { pixels, width, height }) }
		else { Err(RecastError::Overflow) }
	}
}

/// ## Getters.
impl Image {
	#[must_use]
	/// # Width.
	pub const fn width(&self) -> u32 { self.width.get() }

	#[must_use]
	/// # Height.
	pub const fn height(&self) -> u32 { self.height.get() }

	#[must_use]
	/// # Stride.
	///
	/// The number of bytes in a row.
	pub const fn stride(&self) -> usize { self.width.get() as usize * 4 }

	#[must_use]
	/// # Has Alpha?
	///
	/// True if any pixel is less than fully opaque.
	pub fn has_alpha(&self) -> bool {
		self.pixels.chunks_exact(4).any(|px| px[3] != 255)
	}
}

/// ## Conversion.
impl Image {
	#[must_use]
	/// # RGB, Flattened.
	///
	/// Composite the image onto an opaque white background, using alpha as
	/// the blend weight, and return the resulting 3-byte RGB buffer.
	pub fn to_rgb_flattened(&self) -> Vec<u8> {
		alpha::flatten(&self.pixels, alpha::WHITE)
	}

	#[must_use]
	/// # RGB, Stripped.
	///
	/// Drop the alpha channel without blending.
	pub fn to_rgb_stripped(&self) -> Vec<u8> {
		self.pixels.chunks_exact(4)
			.flat_map(|px| [px[0], px[1], px[2]])
			.collect()
	}

	#[must_use]
	/// # As Image Crate Buffer.
	pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
		image::RgbaImage::from_raw(self.width(), self.height(), self.pixels.clone())
	}
}
