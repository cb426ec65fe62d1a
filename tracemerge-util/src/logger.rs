//! Logger

// Imports
use {
	std::{
		fs,
		io,
		path::Path,
		sync::{Mutex, PoisonError},
	},
	tracing::Level,
	tracing_subscriber::{fmt, prelude::*, EnvFilter},
};

/// Messages logged before the logger was initialized
static PRE_INIT_MESSAGES: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

/// Logging before the logger is initialized.
///
/// Messages are buffered and emitted once [`init`](super::init) is called.
pub mod pre_init {
	use super::*;

	/// Buffers a debug message
	pub fn debug(msg: impl Into<String>) {
		self::push(Level::DEBUG, msg.into());
	}

	/// Buffers an info message
	pub fn info(msg: impl Into<String>) {
		self::push(Level::INFO, msg.into());
	}

	/// Buffers a warning message
	pub fn warn(msg: impl Into<String>) {
		self::push(Level::WARN, msg.into());
	}

	fn push(level: Level, msg: String) {
		PRE_INIT_MESSAGES
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push((level, msg));
	}
}

/// Initializes the logger.
///
/// Logs to stderr, filtered by `RUST_LOG` (`info` by default).
/// If `log_file` is given, also logs to it, filtered by `RUST_LOG_FILE`
/// (`debug` by default). The log file is truncated unless `log_file_append` is set.
pub fn init(log_file: Option<&Path>, log_file_append: bool) {
	let stderr_layer = fmt::layer()
		.with_writer(io::stderr)
		.with_filter(self::env_filter("RUST_LOG", "info"));

	let file_layer = log_file.and_then(|path| {
		let file = fs::OpenOptions::new()
			.create(true)
			.write(true)
			.append(log_file_append)
			.truncate(!log_file_append)
			.open(path);

		match file {
			Ok(file) => Some(
				fmt::layer()
					.with_ansi(false)
					.with_writer(Mutex::new(file))
					.with_filter(self::env_filter("RUST_LOG_FILE", "debug")),
			),
			Err(err) => {
				pre_init::warn(format!("Unable to open log file {path:?}: {err}"));
				None
			},
		}
	});

	if let Err(err) = tracing_subscriber::registry()
		.with(stderr_layer)
		.with(file_layer)
		.try_init()
	{
		pre_init::warn(format!("Logger was already initialized: {err}"));
	}

	// Then emit everything logged before now
	let messages = std::mem::take(&mut *PRE_INIT_MESSAGES.lock().unwrap_or_else(PoisonError::into_inner));
	for (level, msg) in messages {
		match level {
			Level::ERROR => tracing::error!("{msg}"),
			Level::WARN => tracing::warn!("{msg}"),
			Level::INFO => tracing::info!("{msg}"),
			Level::DEBUG => tracing::debug!("{msg}"),
			_ => tracing::trace!("{msg}"),
		}
	}
}

/// Creates an env filter from `var`, falling back to `default`
fn env_filter(var: &str, default: &str) -> EnvFilter {
	EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(default))
}
