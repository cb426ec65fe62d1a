//! Timestamp normalization.
//!
//! Each trace file instance is shifted so that it starts right where the
//! previous one ended. The first record of the whole merge lands on `1`, and
//! the last record of each instance shares its timestamp with the first record
//! of the next one: boundaries touch rather than strictly increase.

// Imports
use crate::{error::NormalizeError, span::TraceSpan};

/// Maps a file-local timestamp to the global timeline
pub fn normalize(time: u64, start: u64, cumulative_offset: u64) -> Result<u64, NormalizeError> {
	time.checked_sub(start)
		.ok_or(NormalizeError::BeforeStart)?
		.checked_add(cumulative_offset)
		.and_then(|time| time.checked_add(1))
		.ok_or(NormalizeError::Overflow)
}

/// Merge state.
///
/// Created at the start of a merge and advanced once per finished file instance.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct MergeState {
	/// Total duration of all file instances merged so far
	cumulative_offset: u64,
}

impl MergeState {
	/// Creates a new state, with no offset
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cumulative offset
	pub fn cumulative_offset(&self) -> u64 {
		self.cumulative_offset
	}

	/// Normalizes `time` from a file instance with span `span`
	pub fn normalize(&self, time: u64, span: &TraceSpan) -> Result<u64, NormalizeError> {
		self::normalize(time, span.start, self.cumulative_offset)
	}

	/// Advances past a finished file instance with span `span`
	pub fn advance(&mut self, span: &TraceSpan) -> Result<(), NormalizeError> {
		self.cumulative_offset = self
			.cumulative_offset
			.checked_add(span.duration())
			.ok_or(NormalizeError::Overflow)?;

		Ok(())
	}
}
