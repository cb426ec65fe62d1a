//! Key-range bucketing of simulator results.
//!
//! Results are lines of `<timestamp> <key> <result>`, split by which
//! key range their key falls in.

// Imports
use {
	anyhow::Context,
	std::{io, ops::Range},
};

/// Key range sizes.
///
/// Ranges are laid out contiguously, starting at `0`, in the order
/// recency, frequency, burstiness.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct KeyRanges {
	/// Number of recency keys
	pub recency: u64,

	/// Number of frequency keys
	pub frequency: u64,

	/// Number of burstiness keys
	pub burstiness: u64,
}

impl KeyRanges {
	/// Returns the key range of `bucket`, if it has one
	pub fn range(&self, bucket: Bucket) -> Option<Range<u64>> {
		let recency_end = self.recency;
		let frequency_end = recency_end.saturating_add(self.frequency);
		let burstiness_end = frequency_end.saturating_add(self.burstiness);

		match bucket {
			Bucket::Recency => Some(0..recency_end),
			Bucket::Frequency => Some(recency_end..frequency_end),
			Bucket::Burstiness => Some(frequency_end..burstiness_end),
			Bucket::Other => None,
		}
	}

	/// Classifies a key.
	///
	/// Ranges include their lower bound, so a key equal to a range's
	/// start belongs to that range.
	pub fn classify(&self, key: i64) -> Bucket {
		let Ok(key) = u64::try_from(key) else {
			return Bucket::Other;
		};

		Bucket::SPLIT
			.into_iter()
			.find(|&bucket| self.range(bucket).is_some_and(|range| range.contains(&key)))
			.unwrap_or(Bucket::Other)
	}
}

/// Bucket
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Bucket {
	Recency,
	Frequency,
	Burstiness,
	Other,
}

impl Bucket {
	/// All buckets that are written out
	pub const SPLIT: [Self; 3] = [Self::Recency, Self::Frequency, Self::Burstiness];

	/// Returns the name of this bucket
	pub fn name(self) -> &'static str {
		match self {
			Self::Recency => "recency",
			Self::Frequency => "frequency",
			Self::Burstiness => "burstiness",
			Self::Other => "other",
		}
	}
}

/// Line counts of a split
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct SplitCounts {
	pub recency:    u64,
	pub frequency:  u64,
	pub burstiness: u64,
	pub other:      u64,

	/// Lines without exactly 3 fields
	pub skipped: u64,
}

impl SplitCounts {
	/// Returns the count of `bucket`
	pub fn get(&self, bucket: Bucket) -> u64 {
		match bucket {
			Bucket::Recency => self.recency,
			Bucket::Frequency => self.frequency,
			Bucket::Burstiness => self.burstiness,
			Bucket::Other => self.other,
		}
	}

	fn get_mut(&mut self, bucket: Bucket) -> &mut u64 {
		match bucket {
			Bucket::Recency => &mut self.recency,
			Bucket::Frequency => &mut self.frequency,
			Bucket::Burstiness => &mut self.burstiness,
			Bucket::Other => &mut self.other,
		}
	}
}

/// Splits all results from `reader` by key range.
///
/// Calls `write_line` with every line (including its terminator) not in [`Bucket::Other`].
/// Lines without exactly 3 fields are skipped.
pub fn split<R: io::BufRead>(
	mut reader: R,
	ranges: &KeyRanges,
	mut write_line: impl FnMut(Bucket, &str) -> Result<(), anyhow::Error>,
) -> Result<SplitCounts, anyhow::Error> {
	let mut counts = SplitCounts::default();
	let mut line = String::new();
	let mut line_idx = 0;
	while {
		line.clear();
		reader.read_line(&mut line).context("Unable to read line")?
	} != 0
	{
		line_idx += 1;

		let mut fields = line.split_ascii_whitespace();
		let (Some(_time), Some(key), Some(_result), None) = (fields.next(), fields.next(), fields.next(), fields.next())
		else {
			counts.skipped += 1;
			continue;
		};

		let key = key
			.parse::<i64>()
			.with_context(|| format!("Unable to parse key {key:?} at line {line_idx}"))?;
		let bucket = ranges.classify(key);
		*counts.get_mut(bucket) += 1;
		if bucket != Bucket::Other {
			write_line(bucket, &line).with_context(|| format!("Unable to write {} line", bucket.name()))?;
		}
	}

	Ok(counts)
}
