//! Merge summary

// Imports
use std::{fmt, path::PathBuf};

/// Summary of a finished merge
#[derive(PartialEq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct MergeSummary {
	/// All file instances, in merge order
	pub instances: Vec<InstanceSummary>,
}

impl MergeSummary {
	/// Returns the total number of records written
	pub fn total_records(&self) -> u64 {
		self.instances.iter().map(|instance| instance.records).sum()
	}

	/// Returns the cumulative offset after the last instance
	pub fn final_offset(&self) -> u64 {
		self.instances.last().map_or(0, |instance| instance.cumulative_offset)
	}
}

impl fmt::Display for MergeSummary {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for instance in &self.instances {
			writeln!(
				f,
				"{}: {}..={} (offset {}, {} records)",
				instance.path.display(),
				instance.start,
				instance.end,
				instance.cumulative_offset,
				instance.records
			)?;
		}

		write!(
			f,
			"Total: {} records, final offset {}",
			self.total_records(),
			self.final_offset()
		)
	}
}

/// Summary of a single merged file instance
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct InstanceSummary {
	/// Trace path
	pub path: PathBuf,

	/// Start of the trace's span
	pub start: u64,

	/// End of the trace's span
	pub end: u64,

	/// Cumulative offset after this instance
	pub cumulative_offset: u64,

	/// Records written
	pub records: u64,
}
