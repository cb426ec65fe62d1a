//! Configuration

// Imports
use {crate::error::ConfigError, std::time::Duration};

/// Configuration
#[derive(Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
	/// Number of lines read at once from each trace
	pub batch_size: usize,

	/// Debug output period (in seconds)
	pub debug_output_period_secs: f64,

	/// Prefix of the merged trace's file name
	pub output_prefix: String,
}

impl Config {
	/// Default batch size
	pub const DEFAULT_BATCH_SIZE: usize = 10_000;

	/// Validates this configuration
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.batch_size == 0 {
			return Err(ConfigError::ZeroBatchSize);
		}
		self.debug_output_period()?;

		Ok(())
	}

	/// Returns the debug output period
	pub fn debug_output_period(&self) -> Result<Duration, ConfigError> {
		Duration::try_from_secs_f64(self.debug_output_period_secs).map_err(|_| ConfigError::InvalidDebugOutputPeriod {
			secs: self.debug_output_period_secs,
		})
	}
}

impl Default for Config {
	fn default() -> Self {
		Self {
			batch_size:               Self::DEFAULT_BATCH_SIZE,
			debug_output_period_secs: 1.0,
			output_prefix:            "IBMOS".to_owned(),
		}
	}
}
