/*!
# `Recast` - Encoding Options
*/



/// # Default Quality.
pub const DEFAULT_QUALITY: u8 = 80;



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Encoding Options.
///
/// `quality` is a lossy fidelity from `0..=100`; higher means bigger and
/// better. `lossless` only means something to WebP and AVIF, and `optimize`
/// only means something to JPEG and PNG. Irrelevant settings are ignored.
pub struct EncodeOptions {
	quality: u8,
	lossless: bool,
	optimize: bool,
}

impl Default for EncodeOptions {
	#[inline]
	fn default() -> Self {
		Self {
			quality: DEFAULT_QUALITY,
			lossless: false,
			optimize: false,
		}
	}
}

/// ## Setters.
impl EncodeOptions {
	#[must_use]
	/// # With Quality.
	///
	/// Values above `100` are clamped.
	pub fn with_quality(mut self, quality: u8) -> Self {
		self.quality = quality.min(100);
		self
	}

	#[must_use]
	/// # With Lossless.
	pub const fn with_lossless(mut self, lossless: bool) -> Self {
		self.lossless = lossless;
		self
	}

	#[must_use]
	/// # With Optimize.
	pub const fn with_optimize(mut self, optimize: bool) -> Self {
		self.optimize = optimize;
		self
	}
}

/// ## Getters.
impl EncodeOptions {
	#[must_use]
	/// # Quality.
	pub const fn quality(&self) -> u8 { self.quality }

	#[must_use]
	/// # Lossless?
	pub const fn lossless(&self) -> bool { self.lossless }

	#[must_use]
	/// # Optimize?
	pub const fn optimize(&self) -> bool { self.optimize }
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_defaults() {
		let opts = EncodeOptions::default();
		assert_eq!(opts.quality(), 80);
		assert!(! opts.lossless());
		assert!(! opts.optimize());
	}

	#[test]
	fn t_clamp() {
		assert_eq!(EncodeOptions::default().with_quality(250).quality(), 100);
		assert_eq!(EncodeOptions::default().with_quality(0).quality(), 0);
	}
}
