//! End-to-end merges over trace files

// Imports
use {
	rand::Rng,
	std::{
		fmt::Write as _,
		fs,
		path::{Path, PathBuf},
		time::Duration,
	},
	tracemerge::{JobDecl, MergeError, MergeJob, MergeJobEntry, Merger, ParseError, Record, TraceSpan},
};

fn write_trace(dir: &Path, name: &str, times: &[u64]) -> PathBuf {
	let mut contents = String::new();
	for (idx, time) in times.iter().enumerate() {
		writeln!(contents, "{time} {} {} {}.5", idx * 7, idx % 3, idx).unwrap();
	}

	let path = dir.join(name);
	fs::write(&path, contents).unwrap();
	path
}

/// Generates `len` ordered random timestamps
fn random_times(rng: &mut impl Rng, len: usize) -> Vec<u64> {
	let mut time = rng.gen_range(0..1_000_000);
	(0..len)
		.map(|_| {
			time += rng.gen_range(0..50);
			time
		})
		.collect()
}

fn merger() -> Merger {
	Merger::new(4, Duration::from_secs(3600)).unwrap()
}

fn output_records(path: &Path) -> Vec<Record> {
	fs::read_to_string(path)
		.unwrap()
		.lines()
		.map(|line| Record::parse(line).unwrap())
		.collect()
}

#[test]
fn two_traces_touch_at_boundary() {
	let dir = tempfile::tempdir().unwrap();
	write_trace(dir.path(), "a.trace", &[100, 105, 110]);
	write_trace(dir.path(), "b.trace", &[50, 60, 70]);
	let job = MergeJob::from_decls([JobDecl::Trace("a.trace".into()), JobDecl::Trace("b.trace".into())])
		.unwrap()
		.with_base_dir(dir.path());

	let output_path = dir.path().join("merged.trace");
	let summary = merger().merge(&job, &output_path).unwrap();

	let times = output_records(&output_path)
		.iter()
		.map(|record| record.time)
		.collect::<Vec<_>>();
	assert_eq!(times, [1, 6, 11, 11, 21, 31]);
	assert_eq!(
		summary
			.instances
			.iter()
			.map(|instance| instance.cumulative_offset)
			.collect::<Vec<_>>(),
		[10, 30]
	);
}

#[test]
fn only_timestamps_are_rewritten() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("a.trace");
	fs::write(&path, "1000 -5 3 0.125\n1002 77 0 2\n").unwrap();
	let job = MergeJob::new(vec![MergeJobEntry::new(&path, 1)]).unwrap();

	let output_path = dir.path().join("merged.trace");
	merger().merge(&job, &output_path).unwrap();

	assert_eq!(fs::read_to_string(&output_path).unwrap(), "1 -5 3 0.125\n3 77 0 2.0\n");
}

#[test]
fn repeated_trace_is_contiguous() {
	let mut rng = rand::thread_rng();
	let dir = tempfile::tempdir().unwrap();

	for _ in 0..5 {
		let len = rng.gen_range(1..40);
		let repeats = rng.gen_range(1..5);
		let times = random_times(&mut rng, len);
		let path = write_trace(dir.path(), "a.trace", &times);
		let job = MergeJob::new(vec![MergeJobEntry::new(&path, repeats)]).unwrap();

		let output_path = dir.path().join("merged.trace");
		let summary = merger().merge(&job, &output_path).unwrap();
		let records = output_records(&output_path);

		assert_eq!(records.len(), repeats * len);
		assert_eq!(records[0].time, 1);
		assert!(summary.instances.iter().all(|instance| instance.records == len as u64));

		// Each repetition keeps the keys in order, and starts where the previous one ended
		let duration = times[len - 1] - times[0];
		for (repetition, chunk) in records.chunks(len).enumerate() {
			let keys = chunk.iter().map(|record| record.key).collect::<Vec<_>>();
			assert_eq!(keys, (0..len as i64).map(|idx| idx * 7).collect::<Vec<_>>());
			assert_eq!(chunk[0].time, repetition as u64 * duration + 1);
			assert!(chunk.windows(2).all(|pair| pair[0].time <= pair[1].time));
		}
		for pair in records.chunks(len).collect::<Vec<_>>().windows(2) {
			assert_eq!(pair[0][len - 1].time, pair[1][0].time);
		}
	}
}

#[test]
fn random_traces_touch_at_every_boundary() {
	let mut rng = rand::thread_rng();
	let dir = tempfile::tempdir().unwrap();

	let entries = (0..4)
		.map(|idx| {
			let len = rng.gen_range(1..30);
			let times = random_times(&mut rng, len);
			let path = write_trace(dir.path(), &format!("trace{idx:03}.txt"), &times);
			MergeJobEntry::new(path, rng.gen_range(1..3))
		})
		.collect();
	let job = MergeJob::new(entries).unwrap();

	let output_path = dir.path().join("merged.trace");
	let summary = merger().merge(&job, &output_path).unwrap();
	let records = output_records(&output_path);
	assert_eq!(records.len() as u64, summary.total_records());

	let mut instance_start = 0;
	let mut prev_last_time = None;
	for instance in &summary.instances {
		let instance_records = &records[instance_start..instance_start + instance.records as usize];
		if let Some(prev_last_time) = prev_last_time {
			assert_eq!(instance_records[0].time, prev_last_time);
		}
		prev_last_time = instance_records.last().map(|record| record.time);
		instance_start += instance.records as usize;
	}
	assert_eq!(prev_last_time, Some(summary.final_offset() + 1));
}

#[test]
fn spans_are_ordered() {
	let mut rng = rand::thread_rng();
	let dir = tempfile::tempdir().unwrap();

	for len in 1..20 {
		let times = random_times(&mut rng, len);
		let path = write_trace(dir.path(), "a.trace", &times);
		let span = TraceSpan::locate(&path).unwrap();
		assert!(span.start <= span.end);
		assert_eq!((span.start, span.end), (times[0], times[len - 1]));
	}
}

#[test]
fn merging_twice_is_identical() {
	let dir = tempfile::tempdir().unwrap();
	write_trace(dir.path(), "a.trace", &[3, 9, 27]);
	write_trace(dir.path(), "b.trace", &[5, 5, 6, 100]);
	let job = MergeJob::from_decls([
		JobDecl::Trace("a.trace".into()),
		JobDecl::Times(2),
		JobDecl::Trace("b.trace".into()),
	])
	.unwrap()
	.with_base_dir(dir.path());

	let first_path = dir.path().join("first.trace");
	let second_path = dir.path().join("second.trace");
	let first_summary = merger().merge(&job, &first_path).unwrap();
	let second_summary = merger().merge(&job, &second_path).unwrap();

	assert_eq!(fs::read(&first_path).unwrap(), fs::read(&second_path).unwrap());
	assert_eq!(first_summary, second_summary);
}

#[test]
fn output_is_overwritten() {
	let dir = tempfile::tempdir().unwrap();
	let path = write_trace(dir.path(), "a.trace", &[1, 2]);
	let job = MergeJob::new(vec![MergeJobEntry::new(&path, 1)]).unwrap();

	let output_path = dir.path().join("merged.trace");
	fs::write(&output_path, "stale contents that are longer than the merge output\n").unwrap();
	merger().merge(&job, &output_path).unwrap();

	assert_eq!(output_records(&output_path).len(), 2);
}

#[test]
fn malformed_line_aborts_merge() {
	let dir = tempfile::tempdir().unwrap();
	let good = write_trace(dir.path(), "good.trace", &[1, 2, 3]);
	let bad = dir.path().join("bad.trace");
	fs::write(
		&bad,
		"1 1 1 1.0\n2 1 1 1.0\n3 1 1 1.0\n4 1 1 1.0\n5 1 1 1.0\n6 1 1 1.0\n7 1 1\n8 1 1 1.0\n",
	)
	.unwrap();
	let job = MergeJob::new(vec![MergeJobEntry::new(&good, 1), MergeJobEntry::new(&bad, 1)]).unwrap();

	let output_path = dir.path().join("merged.trace");
	let err = merger().merge(&job, &output_path).unwrap_err();

	match err {
		MergeError::Parse { path, line, source } => {
			assert_eq!(path, bad);
			assert_eq!(line, 7);
			assert!(matches!(source, ParseError::FieldCount { expected: 4, found: 3 }));
		},
		err => panic!("Unexpected error: {err:?}"),
	}
	assert!(!output_path.exists());
}
