//! Utilities

// Modules
pub mod logger;

// Imports
use std::{cell::RefCell, fmt, io};

/// Extension trait for `R: io::Read` types to read a byte array
#[extend::ext(name = ReadByteArray)]
pub impl<R: io::Read> R {
	/// Reads a byte array `[u8; N]` from this reader.
	///
	/// Returns `Err` if unable to read exactly `N` bytes.
	fn read_byte_array<const N: usize>(&mut self) -> Result<[u8; N], io::Error> {
		let mut array = [0u8; N];
		self.read_exact(&mut array)?;
		Ok(array)
	}
}

/// Extension trait for `R: io::Read + io::Seek` types to read their last line
#[extend::ext(name = ReadLastLine)]
pub impl<R: io::Read + io::Seek> R {
	/// Reads the last line of this reader, including any trailing newline.
	///
	/// Scans backwards one byte at a time from the end for the newline that
	/// precedes the last line, so only the last line itself is ever read.
	/// The final byte is never checked, since a trailing newline ends the
	/// last line instead of starting a new one.
	///
	/// Leaves the reader positioned at its end.
	fn read_last_line(&mut self) -> Result<Vec<u8>, io::Error> {
		let len = self.seek(io::SeekFrom::End(0))?;

		// Note: If no newline is found (single line, or a file shorter than
		//       2 bytes), the last line starts at the beginning.
		let mut line_start = 0;
		let mut pos = len.checked_sub(2);
		while let Some(cur_pos) = pos {
			self.seek(io::SeekFrom::Start(cur_pos))?;
			let [byte] = self.read_byte_array::<1>()?;
			if byte == b'\n' {
				line_start = cur_pos + 1;
				break;
			}

			pos = cur_pos.checked_sub(1);
		}

		self.seek(io::SeekFrom::Start(line_start))?;
		let mut line = Vec::with_capacity((len - line_start) as usize);
		self.read_to_end(&mut line)?;

		Ok(line)
	}
}

/// Extension trait for `R: io::BufRead` types to read lines in batches
#[extend::ext(name = ReadLineBatch)]
pub impl<R: io::BufRead> R {
	/// Reads up to `max_lines` lines into `batch`, replacing its contents.
	///
	/// Lines are read as raw bytes and keep their line terminator. Returns the
	/// number of lines read, which is only `0` once the reader is exhausted.
	fn read_line_batch(&mut self, batch: &mut Vec<Vec<u8>>, max_lines: usize) -> Result<usize, io::Error> {
		batch.clear();
		while batch.len() < max_lines {
			let mut line = vec![];
			if self.read_until(b'\n', &mut line)? == 0 {
				break;
			}
			batch.push(line);
		}

		Ok(batch.len())
	}
}

/// [`fmt::Display`] helper to display using a `FnMut(&mut fmt::Formatter)`
pub struct DisplayWrapper<F: FnMut(&mut fmt::Formatter) -> fmt::Result>(RefCell<F>);

impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> DisplayWrapper<F> {
	/// Creates a new display wrapper
	#[must_use]
	pub const fn new(func: F) -> Self {
		Self(RefCell::new(func))
	}
}


impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> fmt::Display for DisplayWrapper<F> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Note: `f` cannot be re-entrant, so this cannot fail
		self.0.borrow_mut()(f)
	}
}
