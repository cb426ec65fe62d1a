//! Trace spans

// Imports
use {
	crate::{error::MergeError, record},
	std::{
		fs,
		io::{self, BufRead},
		path::{Path, PathBuf},
	},
	tracemerge_util::ReadLastLine,
};

/// Time span of a trace file, from its first and last record.
///
/// Assumes the file's records are ordered by timestamp. Only the
/// first and last lines are ever read, so this isn't checked.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct TraceSpan {
	/// Path
	pub path: PathBuf,

	/// Timestamp of the first record
	pub start: u64,

	/// Timestamp of the last record
	pub end: u64,
}

impl TraceSpan {
	/// Locates the span of the trace file at `path`
	pub fn locate(path: &Path) -> Result<Self, MergeError> {
		let file = fs::File::open(path).map_err(MergeError::io(path))?;
		Self::from_reader(path, file)
	}

	/// Locates the span of a trace in `reader`.
	///
	/// `path` is only used for reporting.
	// Note: `reader` is taken unbuffered, since the backwards scan seeks
	//       before every byte, which would discard any buffer.
	pub fn from_reader<R: io::Read + io::Seek>(path: &Path, mut reader: R) -> Result<Self, MergeError> {
		// Read the first line from the start
		reader.rewind().map_err(MergeError::io(path))?;
		let mut first_line = String::new();
		io::BufReader::new(&mut reader)
			.read_line(&mut first_line)
			.map_err(MergeError::io(path))?;
		let start = record::parse_time(&first_line).map_err(|source| MergeError::Boundary {
			path: path.to_path_buf(),
			boundary: "first",
			source,
		})?;

		// Then scan backwards from the end for the last line
		let last_line = reader.read_last_line().map_err(MergeError::io(path))?;
		let last_line = String::from_utf8_lossy(&last_line);
		let end = record::parse_time(&last_line).map_err(|source| MergeError::Boundary {
			path: path.to_path_buf(),
			boundary: "last",
			source,
		})?;

		if end < start {
			return Err(MergeError::UnorderedSpan {
				path: path.to_path_buf(),
				start,
				end,
			});
		}

		Ok(Self {
			path: path.to_path_buf(),
			start,
			end,
		})
	}

	/// Returns the duration of this span
	pub fn duration(&self) -> u64 {
		self.end - self.start
	}
}
