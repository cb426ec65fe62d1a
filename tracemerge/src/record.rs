//! Trace records.
//!
//! Each record is a single line of four whitespace-separated fields:
//! `<timestamp> <key> <hit_penalty> <miss_penalty>`.

// Imports
use {
	crate::error::ParseError,
	std::{fmt, str::FromStr},
};

/// Record
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Record {
	/// Timestamp
	pub time: u64,

	/// Key
	pub key: i64,

	/// Hit penalty
	pub hit_penalty: i64,

	/// Miss penalty
	pub miss_penalty: f64,
}

impl Record {
	/// Number of fields in each line
	pub const FIELDS: usize = 4;

	/// Parses a record from a line.
	///
	/// Surrounding whitespace, including the line terminator, is ignored.
	pub fn parse(line: &str) -> Result<Self, ParseError> {
		let mut fields = line.split_ascii_whitespace();
		let (Some(time), Some(key), Some(hit_penalty), Some(miss_penalty), None) =
			(fields.next(), fields.next(), fields.next(), fields.next(), fields.next())
		else {
			return Err(ParseError::FieldCount {
				expected: Self::FIELDS,
				found:    line.split_ascii_whitespace().count(),
			});
		};

		Ok(Self {
			time:         self::parse_int("timestamp", time)?,
			key:          self::parse_int("key", key)?,
			hit_penalty:  self::parse_int("hit penalty", hit_penalty)?,
			miss_penalty: miss_penalty.parse().map_err(|source| ParseError::Float {
				field: "miss penalty",
				value: miss_penalty.to_owned(),
				source,
			})?,
		})
	}

	/// Returns this record with its timestamp replaced
	#[must_use]
	pub fn with_time(self, time: u64) -> Self {
		Self { time, ..self }
	}
}

/// Formats the record as a line, without the line terminator.
///
/// The miss penalty always keeps a fractional part (`2` is written as `2.0`)
/// so it stays distinguishable from the integer fields.
impl fmt::Display for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} {} {} {:?}",
			self.time, self.key, self.hit_penalty, self.miss_penalty
		)
	}
}

impl FromStr for Record {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Parses the timestamp of a line, ignoring any fields after it
pub fn parse_time(line: &str) -> Result<u64, ParseError> {
	let time = line.split_ascii_whitespace().next().ok_or(ParseError::Empty)?;
	self::parse_int("timestamp", time)
}

/// Parses an integer field
fn parse_int<T: FromStr<Err = std::num::ParseIntError>>(field: &'static str, value: &str) -> Result<T, ParseError> {
	value.parse().map_err(|source| ParseError::Int {
		field,
		value: value.to_owned(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_line() {
		let record = Record::parse("100 42 3 12.5\n").unwrap();
		assert_eq!(record, Record {
			time:         100,
			key:          42,
			hit_penalty:  3,
			miss_penalty: 12.5,
		});
	}

	#[test]
	fn parse_crlf_and_extra_spaces() {
		let record = Record::parse("  7\t-1  0 1e3 \r\n").unwrap();
		assert_eq!(record.time, 7);
		assert_eq!(record.key, -1);
		assert_eq!(record.hit_penalty, 0);
		assert_eq!(record.miss_penalty, 1000.0);
	}

	#[test]
	fn format_keeps_float_distinction() {
		let record = Record::parse("5 6 7 8\n").unwrap();
		assert_eq!(record.to_string(), "5 6 7 8.0");

		let record = Record::parse("5 6 7 0.25").unwrap();
		assert_eq!(record.to_string(), "5 6 7 0.25");
	}

	#[test]
	fn wrong_field_count() {
		assert!(matches!(
			Record::parse("1 2 3\n"),
			Err(ParseError::FieldCount { expected: 4, found: 3 })
		));
		assert!(matches!(
			Record::parse("1 2 3 4 5\n"),
			Err(ParseError::FieldCount { expected: 4, found: 5 })
		));
		assert!(matches!(
			Record::parse("\n"),
			Err(ParseError::FieldCount { expected: 4, found: 0 })
		));
	}

	#[test]
	fn non_numeric_fields() {
		assert!(matches!(
			Record::parse("x 2 3 4.0"),
			Err(ParseError::Int { field: "timestamp", .. })
		));
		assert!(matches!(
			Record::parse("-1 2 3 4.0"),
			Err(ParseError::Int { field: "timestamp", .. })
		));
		assert!(matches!(
			Record::parse("1 2 3.5 4.0"),
			Err(ParseError::Int { field: "hit penalty", .. })
		));
		assert!(matches!(
			Record::parse("1 2 3 abc"),
			Err(ParseError::Float { field: "miss penalty", .. })
		));
	}

	#[test]
	fn time_only() {
		assert_eq!(parse_time("123 anything else").unwrap(), 123);
		assert_eq!(parse_time("123\n").unwrap(), 123);
		assert!(matches!(parse_time(" \n"), Err(ParseError::Empty)));
		assert!(matches!(parse_time("abc 1 2 3"), Err(ParseError::Int { .. })));
	}
}
