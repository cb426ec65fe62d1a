//! Trace merger

// Imports
use {
	crate::{
		config::Config,
		error::{ConfigError, MergeError, NormalizeError, ParseError},
		job::MergeJob,
		normalize::MergeState,
		record::Record,
		span::TraceSpan,
		summary::{InstanceSummary, MergeSummary},
	},
	std::{
		collections::{hash_map, HashMap},
		fs,
		io::{self, Write},
		path::{Path, PathBuf},
		str,
		time::{Duration, Instant},
	},
	tracemerge_util::ReadLineBatch,
};

/// Trace merger
#[derive(Debug)]
pub struct Merger {
	/// Batch size
	///
	/// Maximum number of lines held in memory at once for each trace.
	batch_size: usize,

	/// Debug output period
	///
	/// Interval in which to output progress
	debug_output_period: Duration,

	/// Spans already located, by path
	known_spans: HashMap<PathBuf, TraceSpan>,
}

impl Merger {
	/// Creates a new merger
	pub fn new(batch_size: usize, debug_output_period: Duration) -> Result<Self, ConfigError> {
		if batch_size == 0 {
			return Err(ConfigError::ZeroBatchSize);
		}

		Ok(Self {
			batch_size,
			debug_output_period,
			known_spans: HashMap::new(),
		})
	}

	/// Creates a new merger from a configuration
	pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
		Self::new(config.batch_size, config.debug_output_period()?)
	}

	/// Adds already located spans.
	///
	/// Traces with a known span aren't scanned again when merging.
	#[must_use]
	pub fn with_spans(mut self, spans: impl IntoIterator<Item = TraceSpan>) -> Self {
		self.known_spans
			.extend(spans.into_iter().map(|span| (span.path.clone(), span)));
		self
	}

	/// Merges all traces in `job` into a new file at `output_path`.
	///
	/// Any existing file at `output_path` is overwritten. If the merge fails,
	/// the partially written output is removed.
	pub fn merge(&mut self, job: &MergeJob, output_path: &Path) -> Result<MergeSummary, MergeError> {
		let output_file = fs::OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(output_path)
			.map_err(MergeError::io(output_path))?;

		let res = self.merge_into(job, io::BufWriter::new(output_file), output_path);
		if res.is_err() {
			match fs::remove_file(output_path) {
				Ok(()) => tracing::debug!(?output_path, "Removed incomplete output"),
				Err(err) => tracing::warn!(?output_path, ?err, "Unable to remove incomplete output, it must be discarded"),
			}
		}

		res
	}

	/// Merges all traces in `job` into `writer`.
	///
	/// `output_path` is only used for reporting errors on `writer`.
	pub fn merge_into<W: Write>(
		&mut self,
		job: &MergeJob,
		mut writer: W,
		output_path: &Path,
	) -> Result<MergeSummary, MergeError> {
		// Note: We start in the past so that we output right away at the start
		let mut last_debug_time = Instant::now()
			.checked_sub(self.debug_output_period)
			.unwrap_or_else(Instant::now);

		let total_instances = job.instances_len();
		let mut state = MergeState::new();
		let mut spans = self.known_spans.clone();
		let mut summary = MergeSummary::default();
		let mut batch = Vec::with_capacity(self.batch_size);
		for instance in job.instances() {
			let path = instance.path;

			// Note: Repeated traces re-use the span of their first instance
			let span = match spans.entry(path.to_path_buf()) {
				hash_map::Entry::Occupied(entry) => entry.into_mut(),
				hash_map::Entry::Vacant(entry) => entry.insert(TraceSpan::locate(path)?),
			};
			tracing::debug!(
				instance = instance.idx,
				?path,
				start = span.start,
				end = span.end,
				offset = state.cumulative_offset(),
				"Merging trace"
			);

			let file = fs::File::open(path).map_err(MergeError::io(path))?;
			let file_len = file.metadata().map_err(MergeError::io(path))?.len();
			let mut reader = io::BufReader::new(file);

			// Go through all lines in batches
			let mut records = 0;
			let mut bytes_read = 0;
			loop {
				let batch_len = reader
					.read_line_batch(&mut batch, self.batch_size)
					.map_err(MergeError::io(path))?;
				if batch_len == 0 {
					break;
				}

				for line in &batch {
					records += 1;
					bytes_read += line.len() as u64;

					let record = str::from_utf8(line)
						.map_err(ParseError::InvalidUtf8)
						.and_then(Record::parse)
						.map_err(|source| MergeError::Parse {
							path: path.to_path_buf(),
							line: records,
							source,
						})?;
					let time = state.normalize(record.time, span).map_err(|err| match err {
						NormalizeError::BeforeStart => MergeError::TimestampBeforeStart {
							path:  path.to_path_buf(),
							line:  records,
							time:  record.time,
							start: span.start,
						},
						NormalizeError::Overflow => MergeError::TimestampOverflow {
							path:   path.to_path_buf(),
							line:   records,
							offset: state.cumulative_offset(),
						},
					})?;

					writeln!(writer, "{}", record.with_time(time)).map_err(MergeError::io(output_path))?;
				}
				tracing::trace!(?path, batch_len, records, "Processed batch");

				// Then show debug output, if it's been long enough
				let cur_time = Instant::now();
				if cur_time.duration_since(last_debug_time) >= self.debug_output_period {
					let bytes_read_percentage = 100.0 * (bytes_read as f64 / file_len.max(1) as f64);
					tracing::info!(
						"[{}/{total_instances}] [{bytes_read_percentage:.2}%] {}: {records} records",
						instance.idx + 1,
						path.display()
					);
					last_debug_time = cur_time;
				}
			}

			state.advance(span).map_err(|_| MergeError::TimestampOverflow {
				path:   path.to_path_buf(),
				line:   records,
				offset: state.cumulative_offset(),
			})?;
			tracing::info!(
				?path,
				records,
				offset = state.cumulative_offset(),
				"Finished trace instance {}/{total_instances}",
				instance.idx + 1
			);
			summary.instances.push(InstanceSummary {
				path: path.to_path_buf(),
				start: span.start,
				end: span.end,
				cumulative_offset: state.cumulative_offset(),
				records,
			});
		}

		writer.flush().map_err(MergeError::io(output_path))?;

		Ok(summary)
	}
}
