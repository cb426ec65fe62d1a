//! Arguments

// Imports
use {
	clap::{ArgMatches, CommandFactory, FromArgMatches},
	itertools::Itertools,
	std::path::PathBuf,
	tracemerge::JobDecl,
};

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
pub struct Args {
	/// Log file
	///
	/// Specifies a file to perform verbose logging to.
	/// You can use `RUST_LOG_FILE` to set filtering options
	#[clap(long = "log-file")]
	pub log_file: Option<PathBuf>,

	/// Whether to append to the log file
	#[clap(long = "log-file-append")]
	pub log_file_append: bool,

	/// Directory containing the traces
	#[clap(long = "input-dir")]
	pub input_dir: PathBuf,

	/// Trace to merge.
	///
	/// May be given multiple times. Traces are merged in the order given.
	#[clap(long = "trace", action = clap::ArgAction::Append)]
	pub traces: Vec<PathBuf>,

	/// Number of times to repeat the previous trace
	#[clap(long = "times", action = clap::ArgAction::Append)]
	pub times: Vec<usize>,

	/// Job file
	///
	/// A json array of `{ "path": ..., "times": ... }` entries, used instead of `--trace`
	#[clap(long = "job", conflicts_with_all = ["traces", "times"])]
	pub job_file: Option<PathBuf>,

	/// Config file
	#[clap(long = "config")]
	pub config_file: Option<PathBuf>,

	/// Output file
	///
	/// Defaults to a file under `<input-dir>/merged`, named after the merged traces
	#[clap(long = "output")]
	pub output_file: Option<PathBuf>,

	/// Summary output file
	#[clap(long = "summary")]
	pub summary_file: Option<PathBuf>,

	/// Only locate the trace spans, without merging
	#[clap(long = "dry-run")]
	pub dry_run: bool,
}

impl Args {
	/// Parses the arguments, along with the `--trace` and `--times`
	/// declarations, in the order they were given
	pub fn parse_with_decls() -> (Self, Vec<JobDecl>) {
		match Self::from_matches(&Self::command().get_matches()) {
			Ok(res) => res,
			Err(err) => err.exit(),
		}
	}

	/// Builds the arguments and job declarations from matches
	pub fn from_matches(matches: &ArgMatches) -> Result<(Self, Vec<JobDecl>), clap::Error> {
		let args = Self::from_arg_matches(matches)?;

		// Note: `--times` binds to the `--trace` before it, so we recover the
		//       order both were given in through their indices.
		let traces = matches
			.indices_of("traces")
			.into_iter()
			.flatten()
			.zip(args.traces.iter().cloned().map(JobDecl::Trace));
		let times = matches
			.indices_of("times")
			.into_iter()
			.flatten()
			.zip(args.times.iter().copied().map(JobDecl::Times));
		let decls = traces
			.chain(times)
			.sorted_by_key(|&(idx, _)| idx)
			.map(|(_, decl)| decl)
			.collect();

		Ok((args, decls))
	}
}
