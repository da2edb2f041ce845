/*!
# `Recast`: Native Libraries

The system `libwebp` and `libavif` are optional. They are located at runtime
rather than linked, so a missing library degrades to the bundled encoders
instead of a startup failure.
*/

use crate::Image;
use libloading::Library;
use std::{
	env,
	ffi::{
		c_float,
		c_int,
		c_void,
		OsString,
	},
	fmt,
	path::PathBuf,
};



/// # Max Dimension.
///
/// This matches libwebp's `WEBP_MAX_DIMENSION`.
const WEBP_MAX_DIMENSION: u32 = 16_383;

#[cfg(windows)] const WEBP_FILES: &[&str] = &["libwebp.dll", "webp.dll"];
#[cfg(windows)] const WEBP_SYSTEM: &[&str] = &[
	"C:\\Windows\\System32\\libwebp.dll",
	"C:\\Program Files\\libwebp\\bin\\libwebp.dll",
];
#[cfg(not(windows))] const WEBP_FILES: &[&str] = &[
	"libwebp.so",
	"libwebp.so.7",
	"libwebp.so.8",
	"libwebp.dylib",
];
#[cfg(not(windows))] const WEBP_SYSTEM: &[&str] = &[
	"/usr/lib/libwebp.so",
	"/usr/local/lib/libwebp.so",
	"/usr/lib/x86_64-linux-gnu/libwebp.so.7",
	"/opt/homebrew/lib/libwebp.dylib",
];

#[cfg(windows)] const AVIF_FILES: &[&str] = &["avif.dll", "libavif.dll"];
#[cfg(windows)] const AVIF_SYSTEM: &[&str] = &[
	"C:\\Windows\\System32\\avif.dll",
	"C:\\Program Files\\libavif\\bin\\avif.dll",
];
#[cfg(not(windows))] const AVIF_FILES: &[&str] = &[
	"libavif.so",
	"libavif.so.16",
	"libavif.so.15",
	"libavif.dylib",
];
#[cfg(not(windows))] const AVIF_SYSTEM: &[&str] = &[
	"/usr/lib/libavif.so",
	"/usr/local/lib/libavif.so",
	"/opt/homebrew/lib/libavif.dylib",
];



type EncodeRgbaFn = unsafe extern "C" fn(*const u8, c_int, c_int, c_int, c_float, *mut *mut u8) -> usize;
type EncodeLosslessRgbaFn = unsafe extern "C" fn(*const u8, c_int, c_int, c_int, *mut *mut u8) -> usize;
type DecodeRgbaFn = unsafe extern "C" fn(*const u8, usize, *mut c_int, *mut c_int) -> *mut u8;
type GetInfoFn = unsafe extern "C" fn(*const u8, usize, *mut c_int, *mut c_int) -> c_int;
type FreeFn = unsafe extern "C" fn(*mut c_void);



/// # WebP Codec.
///
/// The narrow interface the dispatcher and decoder use to reach a WebP
/// implementation other than the `image` crate's. The process-wide registry
/// fills this with the system `libwebp`, if found; tests can plug in their
/// own.
///
/// Failures are plain reason strings: they are only ever logged.
pub trait WebpCodec: fmt::Debug + Send + Sync {
	/// # Encode.
	///
	/// Encode an RGBA image, lossy at the given quality factor, or lossless
	/// if `quality` is `None`.
	///
	/// ## Errors
	///
	/// Return the reason if encoding fails or produces nothing.
	fn encode(&self, img: &Image, quality: Option<f32>) -> Result<Vec<u8>, String>;

	/// # Decode.
	///
	/// Decode a WebP file to RGBA.
	///
	/// ## Errors
	///
	/// Return the reason if the data is invalid or decoding fails.
	fn decode(&self, raw: &[u8]) -> Result<Image, String>;
}



/// # Native `libwebp`.
///
/// This holds the library handle along with the handful of "simple API"
/// entry points we use. The function pointers are only valid while the
/// handle lives, so neither is ever handed out.
pub(crate) struct NativeWebp {
	encode_rgba: EncodeRgbaFn,
	encode_lossless_rgba: EncodeLosslessRgbaFn,
	decode_rgba: DecodeRgbaFn,
	get_info: GetInfoFn,
	free: FreeFn,
	path: String,
	_lib: Library,
}

impl fmt::Debug for NativeWebp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeWebp")
			.field("path", &self.path)
			.finish_non_exhaustive()
	}
}

impl NativeWebp {
	/// # Bind.
	///
	/// Resolve the required symbols from an opened library.
	fn bind(lib: Library, path: String) -> Result<Self, (Library, libloading::Error)> {
		// Safety: the signatures match libwebp's public `encode.h`/`decode.h`.
		let syms = unsafe { webp_symbols(&lib) };

		match syms {
			Ok((encode_rgba, encode_lossless_rgba, decode_rgba, get_info, free)) => Ok(Self {
				encode_rgba,
				encode_lossless_rgba,
				decode_rgba,
				get_info,
				free,
				path,
				_lib: lib,
			}),
			Err(e) => Err((lib, e)),
		}
	}
}

impl WebpCodec for NativeWebp {
	fn encode(&self, img: &Image, quality: Option<f32>) -> Result<Vec<u8>, String> {
		if WEBP_MAX_DIMENSION < img.width() || WEBP_MAX_DIMENSION < img.height() {
			return Err(format!("{}x{} exceeds the WebP size limit", img.width(), img.height()));
		}

		let width = c_int::try_from(img.width()).map_err(|e| e.to_string())?;
		let height = c_int::try_from(img.height()).map_err(|e| e.to_string())?;
		let stride = c_int::try_from(img.stride()).map_err(|e| e.to_string())?;
		if img.len() != img.stride() * img.height() as usize {
			return Err("pixel buffer does not match its dimensions".to_owned());
		}

		let mut out: *mut u8 = std::ptr::null_mut();
		// Safety: the buffer is exactly `stride * height` bytes and outlives
		// the call; `out` is written by libwebp alone.
		let size = unsafe {
			match quality {
				Some(q) => (self.encode_rgba)(img.as_ptr(), width, height, stride, q, &mut out),
				None => (self.encode_lossless_rgba)(img.as_ptr(), width, height, stride, &mut out),
			}
		};

		let buf = NativeBuf::new(out, size, self.free).ok_or("libwebp returned no output")?;
		Ok(buf.to_vec())
	}

	fn decode(&self, raw: &[u8]) -> Result<Image, String> {
		let mut width: c_int = 0;
		let mut height: c_int = 0;

		// Safety: `raw` is valid for `raw.len()` bytes.
		if 0 == unsafe { (self.get_info)(raw.as_ptr(), raw.len(), &mut width, &mut height) } {
			return Err("invalid WebP data".to_owned());
		}

		// Safety: as above.
		let ptr = unsafe { (self.decode_rgba)(raw.as_ptr(), raw.len(), &mut width, &mut height) };
		let width = u32::try_from(width).map_err(|e| e.to_string())?;
		let height = u32::try_from(height).map_err(|e| e.to_string())?;
		let size = (width as usize)
			.checked_mul(height as usize)
			.and_then(|n| n.checked_mul(4))
			.unwrap_or(0);

		let buf = NativeBuf::new(ptr, size, self.free).ok_or("libwebp decoding failed")?;
		Image::new(buf.to_vec(), width, height).map_err(|e| e.to_string())
	}
}



/// # Native Buffer.
///
/// A libwebp-allocated buffer that is released with `WebPFree` exactly once,
/// when this drops. Callers copy out what they need first.
struct NativeBuf {
	ptr: *mut u8,
	len: usize,
	free: FreeFn,
}

impl NativeBuf {
	/// # New.
	///
	/// Take ownership of a native buffer. A null pointer yields `None`; a
	/// zero length also yields `None`, but the pointer is still freed.
	fn new(ptr: *mut u8, len: usize, free: FreeFn) -> Option<Self> {
		if ptr.is_null() { return None; }
		let out = Self { ptr, len, free };
		if len == 0 { None }
		else { Some(out) }
	}

	/// # Copy.
	fn to_vec(&self) -> Vec<u8> {
		// Safety: libwebp guarantees `len` readable bytes at `ptr`.
		unsafe { std::slice::from_raw_parts(self.ptr, self.len) }.to_vec()
	}
}

impl Drop for NativeBuf {
	#[inline]
	fn drop(&mut self) { unsafe { (self.free)(self.ptr.cast::<c_void>()) } }
}



/// # Load Native `libwebp`.
///
/// Walk the candidate list, recording every attempt to `trail`. The first
/// library that opens _and_ exports the needed symbols wins.
pub(crate) fn load_webp(trail: &mut Vec<String>) -> Option<NativeWebp> {
	for candidate in candidates("webp", WEBP_FILES, WEBP_SYSTEM) {
		let name = candidate.to_string_lossy().into_owned();
		log::debug!("Probing libwebp: {name}");

		// Safety: loading runs the library's initializers; libwebp has none
		// of consequence.
		match unsafe { Library::new(&candidate) } {
			Ok(lib) => match NativeWebp::bind(lib, name.clone()) {
				Ok(webp) => {
					trail.push(format!("Loaded: {name}"));
					return Some(webp);
				},
				Err((_lib, e)) => { trail.push(format!("Missing symbol in {name}: {e}")); },
			},
			Err(e) => { trail.push(format!("Failed to load {name}: {e}")); },
		}
	}

	None
}

/// # Load Native `libavif`.
///
/// Same as [`load_webp`], except the handle is only held as proof of
/// presence; encoding goes through the `ravif` encoder either way.
pub(crate) fn load_avif(trail: &mut Vec<String>) -> Option<Library> {
	for candidate in candidates("avif", AVIF_FILES, AVIF_SYSTEM) {
		let name = candidate.to_string_lossy().into_owned();
		log::debug!("Probing libavif: {name}");

		// Safety: see above.
		match unsafe { Library::new(&candidate) } {
			Ok(lib) => match unsafe { symbol::<unsafe extern "C" fn() -> *const u8>(&lib, b"avifVersion\0") } {
				Ok(_) => {
					trail.push(format!("Loaded: {name}"));
					return Some(lib);
				},
				Err(e) => { trail.push(format!("Missing symbol in {name}: {e}")); },
			},
			Err(e) => { trail.push(format!("Failed to load {name}: {e}")); },
		}
	}

	None
}

/// # WebP Symbols.
///
/// ## Safety
///
/// The pointers must not outlive `lib`.
unsafe fn webp_symbols(lib: &Library)
-> Result<(EncodeRgbaFn, EncodeLosslessRgbaFn, DecodeRgbaFn, GetInfoFn, FreeFn), libloading::Error> {
	Ok((
		symbol(lib, b"WebPEncodeRGBA\0")?,
		symbol(lib, b"WebPEncodeLosslessRGBA\0")?,
		symbol(lib, b"WebPDecodeRGBA\0")?,
		symbol(lib, b"WebPGetInfo\0")?,
		symbol(lib, b"WebPFree\0")?,
	))
}

/// # Symbol.
///
/// Copy a function pointer out of a library.
///
/// ## Safety
///
/// `T` must match the symbol's real signature, and the result must not
/// outlive `lib`.
unsafe fn symbol<T: Copy>(lib: &Library, name: &[u8]) -> Result<T, libloading::Error> {
	lib.get::<T>(name).map(|s| *s)
}

/// # Candidates.
///
/// Build the ordered search list for a library: the platform's canonical
/// name first (resolved by the system loader), then bare file names, then
/// copies sitting next to the working directory or executable, then
/// well-known absolute paths. Duplicates are dropped.
fn candidates(stem: &str, files: &[&str], system: &[&str]) -> Vec<PathBuf> {
	let mut out: Vec<PathBuf> = Vec::new();
	let mut push = |p: PathBuf| if ! out.contains(&p) { out.push(p); };

	push(PathBuf::from(libloading::library_filename(stem)));
	push(PathBuf::from(libloading::library_filename(OsString::from(format!("lib{stem}")))));
	for f in files { push(PathBuf::from(f)); }

	let local = [
		env::current_dir().ok(),
		env::current_exe().ok().and_then(|p| p.parent().map(PathBuf::from)),
	];
	for dir in local.into_iter().flatten() {
		for f in files { push(dir.join(f)); }
	}

	for p in system { push(PathBuf::from(p)); }

	out
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_candidates() {
		let list = candidates("webp", WEBP_FILES, WEBP_SYSTEM);
		assert_eq!(list[0], PathBuf::from(libloading::library_filename("webp")));

		// No duplicates.
		for (idx, p) in list.iter().enumerate() {
			assert!(! list[idx + 1..].contains(p), "Duplicate candidate {p:?}");
		}

		// Bare names precede the absolute system paths.
		let first_abs = list.iter().position(|p| p.is_absolute()).unwrap();
		for f in WEBP_FILES {
			let pos = list.iter().position(|p| p == &PathBuf::from(f)).unwrap();
			assert!(pos < first_abs);
		}
		for s in WEBP_SYSTEM {
			assert!(list.contains(&PathBuf::from(s)));
		}
	}

	#[test]
	fn t_trail() {
		// Whatever the machine has installed, every attempt is recorded and
		// the trail ends with the winner if there was one.
		let mut trail = Vec::new();
		let found = load_webp(&mut trail);
		assert!(! trail.is_empty());
		match found {
			Some(_) => assert!(trail.last().unwrap().starts_with("Loaded: ")),
			None => assert!(trail.iter().all(|t| ! t.starts_with("Loaded: "))),
		}
	}

	#[test]
	fn t_native_buf() {
		use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};
		static FREED: AtomicUsize = AtomicUsize::new(0);
		unsafe extern "C" fn fake_free(_ptr: *mut c_void) { FREED.fetch_add(1, SeqCst); }

		let mut raw = [1_u8, 2, 3];

		// Null is never freed.
		assert!(NativeBuf::new(std::ptr::null_mut(), 3, fake_free).is_none());
		assert_eq!(FREED.load(SeqCst), 0);

		// Empty output is still freed.
		assert!(NativeBuf::new(raw.as_mut_ptr(), 0, fake_free).is_none());
		assert_eq!(FREED.load(SeqCst), 1);

		// Normal output is copied, then freed once.
		let buf = NativeBuf::new(raw.as_mut_ptr(), 3, fake_free).unwrap();
		assert_eq!(buf.to_vec(), vec![1, 2, 3]);
		drop(buf);
		assert_eq!(FREED.load(SeqCst), 2);
	}
}
