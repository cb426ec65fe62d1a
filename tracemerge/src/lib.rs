//! Trace merger (`tracemerge`).
//!
//! Concatenates independently captured cache-access traces into a single
//! trace with one continuous timeline.

// Modules
pub mod bucket;
pub mod config;
pub mod error;
pub mod job;
pub mod merge;
pub mod normalize;
pub mod record;
pub mod span;
pub mod summary;

// Exports
pub use self::{
	config::Config,
	error::{ConfigError, MergeError, NormalizeError, ParseError},
	job::{FileInstance, JobDecl, MergeJob, MergeJobEntry},
	merge::Merger,
	normalize::MergeState,
	record::Record,
	span::TraceSpan,
	summary::{InstanceSummary, MergeSummary},
};
