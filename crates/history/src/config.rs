//! History configuration.
//!
//! Several sources may each contribute a [`PartialHistoryConfig`]. They are
//! folded with [`HistoryConfig::combine`]: `min_depth` takes the largest
//! requested value, while every source that sets `new_group_delay` must agree.

use serde::Deserialize;

use crate::error::ConfigError;

/// Default number of content events retained per branch.
pub const DEFAULT_MIN_DEPTH: usize = 100;
/// Default grouping window in milliseconds.
pub const DEFAULT_NEW_GROUP_DELAY: u64 = 500;

/// Resolved history configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
	/// Minimum number of content events kept in each branch.
	pub min_depth: usize,
	/// Maximum gap in milliseconds between transactions that may coalesce.
	pub new_group_delay: u64,
}

impl Default for HistoryConfig {
	fn default() -> Self {
		Self {
			min_depth: DEFAULT_MIN_DEPTH,
			new_group_delay: DEFAULT_NEW_GROUP_DELAY,
		}
	}
}

/// One source's contribution to the history configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialHistoryConfig {
	pub min_depth: Option<usize>,
	pub new_group_delay: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
	history: Option<PartialHistoryConfig>,
}

impl HistoryConfig {
	/// Folds partial configurations into a resolved one.
	///
	/// Unset fields fall back to the defaults.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Conflict`] when two sources set different
	/// `new_group_delay` values, and [`ConfigError::Invalid`] when the
	/// resulting `min_depth` is zero.
	pub fn combine<'a, I>(partials: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = &'a PartialHistoryConfig>,
	{
		let mut min_depth: Option<usize> = None;
		let mut new_group_delay: Option<u64> = None;

		for partial in partials {
			if let Some(depth) = partial.min_depth {
				min_depth = Some(min_depth.map_or(depth, |current| current.max(depth)));
			}
			if let Some(delay) = partial.new_group_delay {
				match new_group_delay {
					Some(first) if first != delay => {
						return Err(ConfigError::Conflict {
							field: "new_group_delay",
							first,
							second: delay,
						});
					}
					_ => new_group_delay = Some(delay),
				}
			}
		}

		let config = Self {
			min_depth: min_depth.unwrap_or(DEFAULT_MIN_DEPTH),
			new_group_delay: new_group_delay.unwrap_or(DEFAULT_NEW_GROUP_DELAY),
		};
		config.validate()?;
		Ok(config)
	}

	/// Parses the `[history]` table of a TOML document.
	///
	/// Other top-level tables are ignored. A missing table yields the defaults.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::Toml`] on malformed input or unknown keys inside
	/// `[history]`, and [`ConfigError::Invalid`] for out-of-range values.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let file: ConfigFile = toml::from_str(src)?;
		Self::combine(file.history.as_ref())
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.min_depth == 0 {
			return Err(ConfigError::Invalid {
				field: "min_depth",
				reason: "must be at least 1",
			});
		}
		Ok(())
	}
}
