/*!
# `Recast`
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



mod error;
mod settings;

pub(self) use error::CliError;

use dactyl::NiceU64;
use recast_core::{
	Backends,
	Converter,
};
use settings::{
	Mode,
	Settings,
};



/// # Main.
///
/// This lets us bubble up startup errors so they can be pretty-printed.
fn main() {
	match _main() {
		Ok(()) => {},
		Err(e @ (CliError::PrintHelp | CliError::PrintVersion)) => { println!("{e}"); },
		Err(e) => {
			eprintln!("Error: {e}");
			std::process::exit(1);
		},
	}
}

#[inline]
/// # Actual Main.
///
/// Parse the arguments, set up logging, and do the one thing asked of us.
fn _main() -> Result<(), CliError> {
	let settings = Settings::new()?;
	init_logger(settings.verbose);

	let backends = Backends::global();
	match settings.mode {
		Mode::Diagnostics => {
			for line in backends.report() { println!("{line}"); }
			Ok(())
		},
		Mode::Convert { src, dst } => {
			log::debug!("Converting {} to {}.", src.display(), settings.format);
			let raw = std::fs::read(&src).map_err(|e| CliError::read(&src, &e))?;
			let out = Converter::new(backends)
				.convert_slice(&raw, Some(&src), &settings.format, settings.opts)?;

			let dst = dst.unwrap_or_else(|| settings::default_dst(&src, &settings.format));
			write_atomic::write_file(&dst, &out).map_err(|e| CliError::write(&dst, &e))?;

			println!(
				"{} -> {} ({}x{} {}, {} bytes, {})",
				src.display(),
				dst.display(),
				out.width(),
				out.height(),
				out.kind(),
				NiceU64::from(out.len()).as_str(),
				out.encoder(),
			);
			Ok(())
		},
	}
}

/// # Initialize Logger.
///
/// `RUST_LOG` wins if set; otherwise only warnings are shown unless
/// `--verbose` was passed.
fn init_logger(verbose: bool) {
	let level = if verbose { "debug" } else { "warn" };
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
		.format_timestamp(None)
		.init();
}
