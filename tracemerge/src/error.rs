//! Errors

// Imports
use std::{io, num, path::PathBuf, str};

/// Error parsing a single trace line
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("Line is empty")]
	Empty,

	#[error("Line is not valid UTF-8")]
	InvalidUtf8(#[source] str::Utf8Error),

	#[error("Expected {expected} fields, found {found}")]
	FieldCount { expected: usize, found: usize },

	#[error("Unable to parse {field} {value:?} as an integer")]
	Int {
		field:  &'static str,
		value:  String,
		#[source]
		source: num::ParseIntError,
	},

	#[error("Unable to parse {field} {value:?} as a float")]
	Float {
		field:  &'static str,
		value:  String,
		#[source]
		source: num::ParseFloatError,
	},
}

/// Error mapping a timestamp to the global timeline
#[derive(PartialEq, Eq, Clone, Copy, Debug, thiserror::Error)]
pub enum NormalizeError {
	#[error("Timestamp is before the trace start")]
	BeforeStart,

	#[error("Global timestamp overflowed")]
	Overflow,
}

/// Error in the merge job or configuration.
///
/// These are always detected before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("A repetition count must follow a trace declaration")]
	TimesWithoutTrace,

	#[error("Repetition count for {path:?} was declared more than once")]
	DuplicateTimes { path: PathBuf },

	#[error("Repetition count for {path:?} must be at least 1")]
	ZeroTimes { path: PathBuf },

	#[error("At least one trace must be specified")]
	NoTraces,

	#[error("Batch size must be at least 1")]
	ZeroBatchSize,

	#[error("Debug output period must be a non-negative number of seconds, found {secs}")]
	InvalidDebugOutputPeriod { secs: f64 },
}

/// Error while merging
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
	#[error("I/O error on {path:?}")]
	Io {
		path:   PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("Malformed record in {path:?} at line {line}")]
	Parse {
		path:   PathBuf,
		line:   u64,
		#[source]
		source: ParseError,
	},

	#[error("Malformed {boundary} line in {path:?}")]
	Boundary {
		path:     PathBuf,
		boundary: &'static str,
		#[source]
		source:   ParseError,
	},

	#[error("Trace {path:?} ends ({end}) before it starts ({start})")]
	UnorderedSpan { path: PathBuf, start: u64, end: u64 },

	#[error("Global timeline overflowed in {path:?} at line {line}, with offset {offset}")]
	TimestampOverflow { path: PathBuf, line: u64, offset: u64 },

	#[error("Record in {path:?} at line {line} has timestamp {time}, before the trace start {start}")]
	TimestampBeforeStart {
		path:  PathBuf,
		line:  u64,
		time:  u64,
		start: u64,
	},
}

impl MergeError {
	/// Returns a closure wrapping an I/O error on `path`, for use with `map_err`
	pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(io::Error) -> Self + '_ {
		move |source| Self::Io {
			path: path.to_path_buf(),
			source,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_error_display() {
		let err = ParseError::FieldCount { expected: 4, found: 3 };
		assert_eq!(err.to_string(), "Expected 4 fields, found 3");
	}

	#[test]
	fn merge_error_mentions_file_and_line() {
		let err = MergeError::Parse {
			path:   PathBuf::from("a.trace"),
			line:   7,
			source: ParseError::FieldCount { expected: 4, found: 3 },
		};
		assert_eq!(err.to_string(), r#"Malformed record in "a.trace" at line 7"#);
		assert!(std::error::Error::source(&err).is_some());
	}

	#[test]
	fn config_error_display() {
		assert_eq!(
			ConfigError::TimesWithoutTrace.to_string(),
			"A repetition count must follow a trace declaration"
		);
	}
}
