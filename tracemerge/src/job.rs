//! Merge jobs

// Imports
use {
	crate::{
		error::{ConfigError, MergeError},
		span::TraceSpan,
	},
	itertools::Itertools,
	std::path::{Path, PathBuf},
};

/// A single declaration of a merge job, in the order it was given
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum JobDecl {
	/// Include a trace
	Trace(PathBuf),

	/// Repeat the previously declared trace
	Times(usize),
}

/// Merge job entry
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MergeJobEntry {
	/// Trace path
	pub path: PathBuf,

	/// Number of times to repeat the trace
	#[serde(default = "MergeJobEntry::default_times")]
	pub times: usize,
}

impl MergeJobEntry {
	/// Creates a new entry
	pub fn new(path: impl Into<PathBuf>, times: usize) -> Self {
		Self {
			path: path.into(),
			times,
		}
	}

	fn default_times() -> usize {
		1
	}
}

/// Merge job.
///
/// An ordered, validated, list of traces to merge, and how many times each is repeated.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct MergeJob {
	/// Entries
	entries: Vec<MergeJobEntry>,
}

impl MergeJob {
	/// Creates a merge job from its entries.
	///
	/// Returns an error if there are no entries, or any is repeated 0 times.
	pub fn new(entries: Vec<MergeJobEntry>) -> Result<Self, ConfigError> {
		if entries.is_empty() {
			return Err(ConfigError::NoTraces);
		}

		if let Some(entry) = entries.iter().find(|entry| entry.times == 0) {
			return Err(ConfigError::ZeroTimes {
				path: entry.path.clone(),
			});
		}

		Ok(Self { entries })
	}

	/// Creates a merge job from its declarations.
	///
	/// Each [`JobDecl::Times`] applies to the [`JobDecl::Trace`] right before it.
	/// Traces without one are included once.
	pub fn from_decls(decls: impl IntoIterator<Item = JobDecl>) -> Result<Self, ConfigError> {
		let mut entries = vec![];
		let mut cur_times_declared = false;
		for decl in decls {
			match decl {
				JobDecl::Trace(path) => {
					entries.push(MergeJobEntry::new(path, 1));
					cur_times_declared = false;
				},
				JobDecl::Times(times) => {
					let entry = entries.last_mut().ok_or(ConfigError::TimesWithoutTrace)?;
					if cur_times_declared {
						return Err(ConfigError::DuplicateTimes {
							path: entry.path.clone(),
						});
					}

					entry.times = times;
					cur_times_declared = true;
				},
			}
		}

		Self::new(entries)
	}

	/// Resolves all relative trace paths against `base_dir`
	#[must_use]
	pub fn with_base_dir(mut self, base_dir: &Path) -> Self {
		for entry in &mut self.entries {
			entry.path = base_dir.join(&entry.path);
		}

		self
	}

	/// Returns all entries
	pub fn entries(&self) -> &[MergeJobEntry] {
		&self.entries
	}

	/// Returns all file instances, in merge order.
	///
	/// Each entry is expanded to `times` consecutive instances of its path.
	pub fn instances(&self) -> impl Iterator<Item = FileInstance<'_>> {
		self.entries
			.iter()
			.flat_map(|entry| (0..entry.times).map(move |repetition| (entry, repetition)))
			.enumerate()
			.map(|(idx, (entry, repetition))| FileInstance {
				idx,
				path: &entry.path,
				repetition,
			})
	}

	/// Returns the total number of file instances
	pub fn instances_len(&self) -> usize {
		self.entries.iter().map(|entry| entry.times).sum()
	}

	/// Locates the span of every distinct trace, in order of first appearance
	pub fn locate_spans(&self) -> Result<Vec<TraceSpan>, MergeError> {
		self.paths().into_iter().map(TraceSpan::locate).collect()
	}

	/// Returns the output file name for this job.
	///
	/// Formatted as `<prefix>-<name>-...-<name>.trace`, with one name per file instance.
	pub fn output_file_name(&self, prefix: &str) -> String {
		let name_regex = regex::Regex::new(r"trace0[0-9]{2}").expect("Trace name regex should be valid");
		let names = self.instances().map(|instance| self::trace_name(&name_regex, instance.path));

		format!("{prefix}-{}.trace", names.format("-"))
	}

	/// Returns all distinct paths, in order of first appearance
	pub fn paths(&self) -> Vec<&Path> {
		self.entries.iter().map(|entry| entry.path.as_path()).unique().collect()
	}
}

/// A single instance of a trace file within a merge job
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct FileInstance<'a> {
	/// Index across the whole job
	pub idx: usize,

	/// Trace path
	pub path: &'a Path,

	/// Repetition of this path within its entry, starting at 0
	pub repetition: usize,
}

/// Returns the short name of a trace.
///
/// This is the first match of `name_regex` in the lower-cased file name,
/// or the lower-cased file stem, if none match.
fn trace_name(name_regex: &regex::Regex, path: &Path) -> String {
	let file_name = path
		.file_name()
		.map(|file_name| file_name.to_string_lossy().to_lowercase())
		.unwrap_or_default();

	match name_regex.find(&file_name) {
		Some(name) => name.as_str().to_owned(),
		None => path
			.file_stem()
			.map(|stem| stem.to_string_lossy().to_lowercase())
			.unwrap_or_default(),
	}
}
