//! Error types for history operations and configuration.

use thiserror::Error;

use crate::state::{ItemFilter, PopTarget};

/// Errors returned by history state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// The requested branch holds no event eligible under the filter.
	#[error("no {filter} event to pop from the {target} branch")]
	NothingToPop {
		/// Branch that was popped.
		target: PopTarget,
		/// Eligibility filter used for the lookup.
		filter: ItemFilter,
	},
}

/// Errors that can occur when loading or combining history configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Two sources set a field that must agree to different values.
	#[error("conflicting values for '{field}': {first} and {second}")]
	Conflict {
		/// The conflicting field.
		field: &'static str,
		/// Value from the earlier source.
		first: u64,
		/// Value from the later source.
		second: u64,
	},

	/// A field holds a value outside its valid range.
	#[error("invalid value for '{field}': {reason}")]
	Invalid {
		/// The offending field.
		field: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},
}

/// Result type for history operations.
pub type Result<T, E = HistoryError> = std::result::Result<T, E>;
