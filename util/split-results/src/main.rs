//! Splits a simulator results dump by key range

// Imports
use {
	anyhow::Context,
	clap::Parser,
	std::{
		collections::HashMap,
		fs,
		io::{self, BufWriter, Write},
		path::{Path, PathBuf},
	},
	tracemerge::bucket::{self, Bucket, KeyRanges, SplitCounts},
	tracemerge_util::logger,
};

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
struct Args {
	/// Log file
	///
	/// Specifies a file to perform verbose logging to.
	/// You can use `RUST_LOG_FILE` to set filtering options
	#[clap(long = "log-file")]
	log_file: Option<PathBuf>,

	/// Whether to append to the log file
	#[clap(long = "log-file-append")]
	log_file_append: bool,

	/// Results dump to split
	input_file: PathBuf,

	/// Output directory
	///
	/// Defaults to the input file's directory
	#[clap(short = 'o', long = "output-dir")]
	output_dir: Option<PathBuf>,

	/// Key ranges file
	///
	/// A json object with the `recency`, `frequency` and `burstiness` range sizes
	#[clap(long = "ranges", conflicts_with_all = ["recency", "frequency", "burstiness"])]
	ranges_file: Option<PathBuf>,

	/// Number of recency keys
	#[clap(long = "recency", required_unless_present = "ranges_file")]
	recency: Option<u64>,

	/// Number of frequency keys
	#[clap(long = "frequency", required_unless_present = "ranges_file")]
	frequency: Option<u64>,

	/// Number of burstiness keys
	#[clap(long = "burstiness", required_unless_present = "ranges_file")]
	burstiness: Option<u64>,
}

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();
	logger::pre_init::debug(format!("Args: {args:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	// Get the key ranges
	let ranges = match (&args.ranges_file, args.recency, args.frequency, args.burstiness) {
		(Some(ranges_path), ..) => {
			let ranges_file = fs::File::open(ranges_path).context("Unable to open ranges file")?;
			serde_json::from_reader::<_, KeyRanges>(io::BufReader::new(ranges_file))
				.context("Unable to parse ranges file")?
		},
		(None, Some(recency), Some(frequency), Some(burstiness)) => KeyRanges {
			recency,
			frequency,
			burstiness,
		},
		_ => anyhow::bail!("Either `--ranges` or all of `--recency`, `--frequency` and `--burstiness` must be given"),
	};
	for bucket in Bucket::SPLIT {
		if let Some(range) = ranges.range(bucket) {
			tracing::info!("{}: [{}, {})", bucket.name(), range.start, range.end);
		}
	}

	// Then split
	let output_dir = match args.output_dir {
		Some(output_dir) => output_dir,
		None => args.input_file.parent().map(PathBuf::from).unwrap_or_default(),
	};
	let counts = self::split_results(&args.input_file, &output_dir, &ranges)?;

	for bucket in Bucket::SPLIT {
		tracing::info!("{} entries: {}", bucket.name(), counts.get(bucket));
	}
	tracing::info!("Other entries (not written): {}", counts.other);
	tracing::info!("Malformed lines (skipped): {}", counts.skipped);

	Ok(())
}

/// Splits the results dump at `input_path` into one file per bucket in `output_dir`.
///
/// The input is opened before any output is created.
fn split_results(input_path: &Path, output_dir: &Path, ranges: &KeyRanges) -> Result<SplitCounts, anyhow::Error> {
	let input_file = fs::File::open(input_path).context("Unable to open input file")?;

	// Create the output files
	fs::create_dir_all(output_dir).context("Unable to create output directory")?;
	let base_name = input_path
		.file_stem()
		.context("Input file has no file name")?
		.to_string_lossy();
	let mut outputs = HashMap::new();
	for bucket in Bucket::SPLIT {
		let output_path = output_dir.join(format!("{base_name}_{}.results_dump", bucket.name()));
		let output_file = fs::File::create(&output_path)
			.with_context(|| format!("Unable to create output file {output_path:?}"))?;
		tracing::info!(?output_path, "Writing {} results", bucket.name());
		outputs.insert(bucket, BufWriter::new(output_file));
	}

	let counts = bucket::split(io::BufReader::new(input_file), ranges, |bucket, line| {
		let output = outputs.get_mut(&bucket).context("Bucket has no output file")?;
		output.write_all(line.as_bytes())?;
		Ok(())
	})
	.context("Unable to split results")?;

	for (bucket, mut output) in outputs {
		output
			.flush()
			.with_context(|| format!("Unable to flush {} output", bucket.name()))?;
	}

	Ok(counts)
}
