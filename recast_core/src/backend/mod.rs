/*!
# `Recast` - Backends

Which optional codecs and optimizers this process can actually use.
*/

pub(super) mod native;
pub(super) mod tool;

use libloading::Library;
use native::WebpCodec;
use std::{
	collections::BTreeMap,
	path::{
		Path,
		PathBuf,
	},
	sync::{
		Arc,
		OnceLock,
	},
	time::Duration,
};
use tool::Tool;



/// # Default Probe Timeout.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// # Default Tool Timeout.
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// # Process-Wide Registry.
static GLOBAL: OnceLock<Backends> = OnceLock::new();



#[derive(Debug)]
/// # Backend Registry.
///
/// This records which optional backends were found: the system `libwebp`
/// and `libavif`, the bundled AVIF and SVG stacks, and the external JPEG/PNG
/// optimizers.
///
/// Probing happens exactly once per instance, at construction; nothing is
/// re-checked afterwards. Most callers want [`Backends::global`], which is
/// lazily probed on first use and shared by the whole process. Tests and
/// embedders can build their own with [`Backends::builder`].
pub struct Backends {
	webp: Option<Arc<dyn WebpCodec>>,
	webp_trail: Vec<String>,

	avif_native: Option<Library>,
	avif_plugin: bool,
	avif_trail: Vec<String>,

	svg: bool,

	tools: BTreeMap<Tool, PathBuf>,
	tool_timeout: Duration,
	tmp_dir: Option<PathBuf>,
}

/// ## Instantiation.
impl Backends {
	#[must_use]
	/// # Global.
	///
	/// Return the process-wide registry, probing the system the first time
	/// this is called. Concurrent first calls block until the one probe
	/// finishes.
	pub fn global() -> &'static Self { GLOBAL.get_or_init(Self::probe) }

	#[must_use]
	/// # Probe.
	///
	/// Build a fresh registry with the default settings.
	pub fn probe() -> Self { Self::builder().build() }

	#[must_use]
	/// # Builder.
	pub fn builder() -> BackendsBuilder { BackendsBuilder::default() }
}

/// ## Availability.
impl Backends {
	#[must_use]
	/// # Native WebP Available?
	pub fn is_webp_native_available(&self) -> bool { self.webp.is_some() }

	#[must_use]
	/// # WebP Diagnostics.
	///
	/// A copy of the ordered list of load attempts.
	pub fn webp_diagnostics(&self) -> Vec<String> { self.webp_trail.clone() }

	#[must_use]
	/// # AVIF Available?
	///
	/// True if either the system `libavif` loaded or the bundled encoder is
	/// compiled in.
	pub const fn is_avif_available(&self) -> bool {
		self.avif_native.is_some() || self.avif_plugin
	}

	#[must_use]
	/// # AVIF Diagnostics.
	pub fn avif_diagnostics(&self) -> Vec<String> { self.avif_trail.clone() }

	#[must_use]
	/// # SVG Available?
	pub const fn has_svg(&self) -> bool { self.svg }

	#[must_use]
	/// # Optimizer Tools.
	///
	/// Map each optimizer's name to its availability.
	pub fn optimizer_tool_map(&self) -> BTreeMap<&'static str, bool> {
		Tool::ALL.iter()
			.map(|t| (t.as_str(), self.tools.contains_key(t)))
			.collect()
	}

	#[must_use]
	/// # Report.
	///
	/// Summarize everything above as human-readable lines, suitable for a
	/// diagnostics panel.
	pub fn report(&self) -> Vec<String> {
		let yn = |b: bool| if b { "available" } else { "not found" };
		let mut out = Vec::new();

		out.push(format!("Native WebP: {}", yn(self.is_webp_native_available())));
		out.extend(self.webp_trail.iter().map(|t| format!("  {t}")));

		out.push(format!(
			"AVIF: {} (native: {}, bundled: {})",
			yn(self.is_avif_available()),
			yn(self.avif_native.is_some()),
			yn(self.avif_plugin),
		));
		out.extend(self.avif_trail.iter().map(|t| format!("  {t}")));

		out.push(format!("SVG: {}", yn(self.svg)));

		for (name, found) in self.optimizer_tool_map() {
			out.push(format!("Optimizer {name}: {}", yn(found)));
		}

		out
	}
}

/// ## Internal Getters.
impl Backends {
	/// # WebP Codec.
	pub(crate) fn webp(&self) -> Option<&dyn WebpCodec> { self.webp.as_deref() }

	/// # AVIF Encoder Compiled In (and Enabled)?
	pub(crate) const fn has_avif_plugin(&self) -> bool { self.avif_plugin }

	/// # Tool Path.
	pub(crate) fn tool(&self, tool: Tool) -> Option<&Path> {
		self.tools.get(&tool).map(PathBuf::as_path)
	}

	/// # Tool Timeout.
	pub(crate) const fn tool_timeout(&self) -> Duration { self.tool_timeout }

	/// # Temporary File Builder.
	///
	/// Create a named temporary file for an external-tool round trip. It is
	/// deleted when dropped.
	pub(crate) fn tempfile(&self, suffix: &str) -> std::io::Result<tempfile::NamedTempFile> {
		let mut builder = tempfile::Builder::new();
		builder.prefix("recast-").suffix(suffix);
		match self.tmp_dir.as_deref() {
			Some(dir) => builder.tempfile_in(dir),
			None => builder.tempfile(),
		}
	}
}



#[derive(Debug)]
/// # Registry Builder.
///
/// By default, everything is probed. The `without_*` methods force a
/// backend to be absent without touching the environment, and the `with_*`
/// methods supply one directly.
pub struct BackendsBuilder {
	native: bool,
	tools: bool,
	plugins: bool,
	webp: Option<Arc<dyn WebpCodec>>,
	tool_paths: BTreeMap<Tool, PathBuf>,
	probe_timeout: Duration,
	tool_timeout: Duration,
	tmp_dir: Option<PathBuf>,
}

impl Default for BackendsBuilder {
	fn default() -> Self {
		Self {
			native: true,
			tools: true,
			plugins: true,
			webp: None,
			tool_paths: BTreeMap::new(),
			probe_timeout: PROBE_TIMEOUT,
			tool_timeout: TOOL_TIMEOUT,
			tmp_dir: None,
		}
	}
}

impl BackendsBuilder {
	#[must_use]
	/// # Skip Native Libraries.
	pub const fn without_native(mut self) -> Self {
		self.native = false;
		self
	}

	#[must_use]
	/// # Skip Tool Probes.
	///
	/// Tools registered with [`BackendsBuilder::with_tool`] are kept.
	pub const fn without_tools(mut self) -> Self {
		self.tools = false;
		self
	}

	#[must_use]
	/// # Disable Bundled Plugins.
	///
	/// Pretend the bundled AVIF encoder and SVG stack were not compiled in.
	pub const fn without_plugins(mut self) -> Self {
		self.plugins = false;
		self
	}

	#[must_use]
	/// # With WebP Codec.
	///
	/// Use this instead of probing for the system `libwebp`.
	pub fn with_webp(mut self, codec: Arc<dyn WebpCodec>) -> Self {
		self.webp = Some(codec);
		self
	}

	#[must_use]
	/// # With Tool.
	///
	/// Register a program for a tool as-is, without running its version
	/// probe.
	pub fn with_tool<P: Into<PathBuf>>(mut self, tool: Tool, program: P) -> Self {
		self.tool_paths.insert(tool, program.into());
		self
	}

	#[must_use]
	/// # With Probe Timeout.
	pub const fn with_probe_timeout(mut self, timeout: Duration) -> Self {
		self.probe_timeout = timeout;
		self
	}

	#[must_use]
	/// # With Tool Timeout.
	///
	/// This bounds actual optimization runs.
	pub const fn with_tool_timeout(mut self, timeout: Duration) -> Self {
		self.tool_timeout = timeout;
		self
	}

	#[must_use]
	/// # With Temporary Directory.
	///
	/// Where external-tool round trips stage their files. Defaults to the
	/// system temporary directory.
	pub fn with_tmp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
		self.tmp_dir = Some(dir.into());
		self
	}

	#[must_use]
	/// # Build (Probe).
	pub fn build(self) -> Backends {
		let mut webp_trail = Vec::new();
		let webp = match self.webp {
			Some(codec) => {
				webp_trail.push(format!("Using provided codec: {codec:?}"));
				Some(codec)
			},
			None if self.native => native::load_webp(&mut webp_trail)
				.map(|w| Arc::new(w) as Arc<dyn WebpCodec>),
			None => None,
		};

		let mut avif_trail = Vec::new();
		let avif_native =
			if self.native { native::load_avif(&mut avif_trail) }
			else { None };

		let mut tools = self.tool_paths;
		if self.tools {
			for t in Tool::ALL {
				if tools.contains_key(&t) { continue; }
				if let Some(path) = tool::probe(t, self.probe_timeout) {
					tools.insert(t, path);
				}
			}
		}

		let out = Backends {
			webp,
			webp_trail,
			avif_native,
			avif_plugin: self.plugins && cfg!(feature = "avif"),
			avif_trail,
			svg: self.plugins && cfg!(feature = "svg"),
			tools,
			tool_timeout: self.tool_timeout,
			tmp_dir: self.tmp_dir,
		};

		log::info!(
			"Backends: native WebP {}, AVIF {}, SVG {}, optimizers [{}].",
			out.is_webp_native_available(),
			out.is_avif_available(),
			out.svg,
			out.tools.keys().map(|t| t.as_str()).collect::<Vec<_>>().join(", "),
		);

		out
	}
}
