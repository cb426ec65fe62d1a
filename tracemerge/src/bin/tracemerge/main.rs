//! Merges cache-access traces into a single, continuous, trace

// Modules
mod args;

// Imports
use {
	self::args::Args,
	anyhow::Context,
	std::{fs, io},
	tracemerge::{Config, JobDecl, MergeJob, MergeJobEntry, Merger},
	tracemerge_util::{logger, DisplayWrapper},
};

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let (args, decls) = Args::parse_with_decls();
	logger::pre_init::debug(format!("Args: {args:?}"));
	logger::pre_init::debug(format!("Job declarations: {decls:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	self::run(args, decls)
}

/// Runs the merge described by `args` and `decls`
fn run(args: Args, decls: Vec<JobDecl>) -> Result<(), anyhow::Error> {
	// Build the job first, so declaration errors are reported before touching any file
	let job = match &args.job_file {
		Some(job_path) => {
			let job_file = fs::File::open(job_path).context("Unable to open job file")?;
			let entries = serde_json::from_reader::<_, Vec<MergeJobEntry>>(io::BufReader::new(job_file))
				.context("Unable to parse job file")?;
			MergeJob::new(entries)
		},
		None => MergeJob::from_decls(decls),
	}
	.context("Invalid merge job")?
	.with_base_dir(&args.input_dir);

	// Then read the config file
	let config = match &args.config_file {
		Some(config_path) => {
			let config_file = fs::File::open(config_path).context("Unable to open config file")?;
			serde_json::from_reader::<_, Config>(io::BufReader::new(config_file))
				.context("Unable to parse config file")?
		},
		None => Config::default(),
	};
	config.validate().context("Invalid config")?;
	tracing::debug!(?config, "Loaded config");

	tracing::info!(
		"Trace configuration:\n{}",
		DisplayWrapper::new(|f| {
			for entry in job.entries() {
				writeln!(f, "  {}: {}x", entry.path.display(), entry.times)?;
			}
			Ok(())
		})
	);
	tracing::info!("Total files to merge: {}", job.instances_len());

	// Locate all spans before writing anything
	let spans = job.locate_spans().context("Unable to locate trace spans")?;
	for span in &spans {
		tracing::info!(
			start = span.start,
			end = span.end,
			"{}: {}",
			span.path.display(),
			span.duration()
		);
	}

	if args.dry_run {
		return Ok(());
	}

	// Get the output path
	let output_path = match args.output_file {
		Some(output_path) => output_path,
		None => {
			let output_dir = args.input_dir.join("merged");
			fs::create_dir_all(&output_dir).context("Unable to create output directory")?;
			output_dir.join(job.output_file_name(&config.output_prefix))
		},
	};
	tracing::info!(?output_path, "Merging traces");

	// And merge
	let mut merger = Merger::from_config(&config)
		.context("Invalid config")?
		.with_spans(spans);
	let summary = merger
		.merge(&job, &output_path)
		.with_context(|| format!("Unable to merge traces into {output_path:?}"))?;
	tracing::info!("Merged traces:\n{summary}");

	if let Some(summary_path) = &args.summary_file {
		let summary_file = fs::File::create(summary_path).context("Unable to create summary file")?;
		serde_json::to_writer_pretty(summary_file, &summary).context("Unable to write to summary file")?;
	}

	tracing::info!("Done");

	Ok(())
}
