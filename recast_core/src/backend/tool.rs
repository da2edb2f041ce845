/*!
# `Recast`: External Optimizers

MozJPEG's `cjpeg`, `oxipng`, and `optipng` are separate programs. They are
found on `PATH` once, at probe time, and every invocation is bounded by a
timeout so a wedged tool can't hang a conversion.
*/

use crate::error::Fallback;
use std::{
	ffi::OsStr,
	fmt,
	path::{
		Path,
		PathBuf,
	},
	process::{
		Command,
		Stdio,
	},
	thread,
	time::{
		Duration,
		Instant,
	},
};



/// # Poll Interval.
const POLL: Duration = Duration::from_millis(10);



#[derive(Debug, Copy, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # External Tool.
pub enum Tool {
	/// # MozJPEG (`cjpeg`).
	Mozjpeg,
	/// # `oxipng`.
	Oxipng,
	/// # `optipng`.
	Optipng,
}

impl fmt::Display for Tool {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Tool {
	/// # All Tools.
	pub const ALL: [Self; 3] = [Self::Mozjpeg, Self::Oxipng, Self::Optipng];

	#[must_use]
	/// # Name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Mozjpeg => "mozjpeg",
			Self::Oxipng => "oxipng",
			Self::Optipng => "optipng",
		}
	}

	#[must_use]
	/// # Program.
	///
	/// The executable name searched for on `PATH`.
	pub const fn program(self) -> &'static str {
		match self {
			Self::Mozjpeg => "cjpeg",
			Self::Oxipng => "oxipng",
			Self::Optipng => "optipng",
		}
	}

	/// # Version Arguments.
	///
	/// Each of these prints something and exits cleanly.
	const fn probe_args(self) -> &'static [&'static str] {
		match self {
			Self::Mozjpeg => &["-version"],
			Self::Oxipng => &["--version"],
			Self::Optipng => &["-v"],
		}
	}
}



/// # Probe.
///
/// Resolve the tool on `PATH` and ask for its version. Anything other than
/// a clean exit within `timeout` means the tool is unavailable.
pub(crate) fn probe(tool: Tool, timeout: Duration) -> Option<PathBuf> {
	let path = which::which(tool.program()).ok()?;
	match run(&path, tool.probe_args(), timeout) {
		Ok(()) => {
			log::debug!("Found {tool}: {}", path.display());
			Some(path)
		},
		Err(e) => {
			log::debug!("Ignoring {tool}: {e}");
			None
		},
	}
}

/// # Run.
///
/// Execute a program with the given arguments, waiting at most `timeout`
/// for it to finish. Output is discarded; the tools all work on files.
///
/// ## Errors
///
/// Spawn failures, non-zero exit statuses, and timeouts are all returned
/// as a [`Fallback`]. A timed-out process is killed and reaped.
pub(crate) fn run<S: AsRef<OsStr>>(program: &Path, args: &[S], timeout: Duration)
-> Result<(), Fallback> {
	let name = program.file_name()
		.map_or_else(|| program.to_string_lossy(), OsStr::to_string_lossy)
		.into_owned();

	let mut child = Command::new(program)
		.args(args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::null())
		.spawn()
		.map_err(|e| Fallback::new(format!("Unable to run {name}: {e}")))?;

	let start = Instant::now();
	loop {
		match child.try_wait() {
			Ok(Some(status)) =>
				return
					if status.success() { Ok(()) }
					else { Err(Fallback::new(format!("{name} failed ({status})."))) },
			Ok(None) => {},
			Err(e) => return Err(Fallback::new(format!("Unable to wait for {name}: {e}"))),
		}

		if timeout <= start.elapsed() {
			let _res = child.kill();
			let _res = child.wait();
			return Err(Fallback::new(format!(
				"{name} timed out after {}s.",
				timeout.as_secs_f32(),
			)));
		}

		thread::sleep(POLL);
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_names() {
		assert_eq!(Tool::Mozjpeg.program(), "cjpeg");
		assert_eq!(Tool::Oxipng.to_string(), "oxipng");
		assert_eq!(Tool::ALL.len(), 3);
	}

	#[test]
	fn t_missing() {
		let res = run(
			Path::new("/nonexistent/recast-no-such-tool"),
			&["--version"],
			Duration::from_secs(1),
		);
		assert!(res.is_err());
	}

	#[cfg(unix)]
	#[test]
	fn t_status() {
		let t = which::which("true").expect("Missing true.");
		assert_eq!(run(&t, &[] as &[&str], Duration::from_secs(5)), Ok(()));

		let f = which::which("false").expect("Missing false.");
		let err = run(&f, &[] as &[&str], Duration::from_secs(5)).unwrap_err();
		assert!(err.0.starts_with("false failed"), "{err}");
	}

	#[cfg(unix)]
	#[test]
	fn t_timeout() {
		let sleep = which::which("sleep").expect("Missing sleep.");
		let start = Instant::now();
		let err = run(&sleep, &["5"], Duration::from_millis(100)).unwrap_err();
		assert!(err.0.contains("timed out"), "{err}");
		assert!(start.elapsed() < Duration::from_secs(4));
	}
}
