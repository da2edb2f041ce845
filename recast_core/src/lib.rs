/*!
# `Recast` - Library

This crate converts images between PNG, JPEG, BMP, WebP, and AVIF, and
rasterizes SVG sources to any of them.

Work is routed through the best backend available at runtime: a native
`libwebp` when one can be loaded, `cjpeg` (`MozJPEG`) and `oxipng`/`optipng`
when installed and optimization is requested. Whenever a preferred backend
is missing or fails, the bundled `image` crate picks up the slack, so
conversions keep working, just less optimally.

Backend availability is probed once per process by [`Backends::global`].
Callers that want control over probing (or test isolation) can build their
own registry with [`Backends::builder`] and pass it to a [`Converter`].

## Examples

```no_run
use recast_core::EncodeOptions;

let raw = std::fs::read("logo.svg").unwrap();
let out = recast_core::convert_slice(
    &raw,
    None,
    "png",
    EncodeOptions::default().with_optimize(true),
).unwrap();

std::fs::write(out.file_name(), &*out).unwrap();
```
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod backend;
mod convert;
mod dec;
mod enc;
mod error;
mod image;
mod kind;
mod options;
mod sniff;
mod svg;

pub use backend::{
	Backends,
	BackendsBuilder,
	native::WebpCodec,
	PROBE_TIMEOUT,
	tool::Tool,
	TOOL_TIMEOUT,
};
pub use convert::{
	convert,
	convert_slice,
	Converter,
};
pub use dec::decode;
pub use enc::{
	encode,
	encode_other,
	output::Output,
};
pub use error::RecastError;
pub use self::image::Image;
pub use kind::ImageKind;
pub use options::{
	DEFAULT_QUALITY,
	EncodeOptions,
};
pub use sniff::{
	sniff,
	Sniff,
};
pub use svg::{
	DEFAULT_DPI,
	rasterize,
};

use std::collections::BTreeMap;



#[must_use]
/// # Native WebP Available?
///
/// This and the other free diagnostic functions query
/// [`Backends::global`].
pub fn is_webp_native_available() -> bool {
	Backends::global().is_webp_native_available()
}

#[must_use]
/// # Native WebP Load Trail.
pub fn webp_diagnostics() -> Vec<String> { Backends::global().webp_diagnostics() }

#[must_use]
/// # AVIF Available?
pub fn is_avif_available() -> bool { Backends::global().is_avif_available() }

#[must_use]
/// # Native AVIF Load Trail.
pub fn avif_diagnostics() -> Vec<String> { Backends::global().avif_diagnostics() }

#[must_use]
/// # Optimizer Tools.
///
/// Map each external tool name to whether it was found.
pub fn optimizer_tool_map() -> BTreeMap<&'static str, bool> {
	Backends::global().optimizer_tool_map()
}
