use thiserror::Error;

use crate::range::CharIdx;

/// Errors raised while building a changeset from explicit changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChangeError {
	/// A change ends before it starts.
	#[error("change range is inverted: {start}..{end}")]
	Inverted {
		/// Start of the offending change.
		start: CharIdx,
		/// End of the offending change.
		end: CharIdx,
	},

	/// A change reaches past the end of the document.
	#[error("change ends at {end} but the document has {len} chars")]
	OutOfBounds {
		/// End of the offending change.
		end: CharIdx,
		/// Length of the document the change targets.
		len: usize,
	},

	/// A change starts before the previous change ended, or changes are unsorted.
	#[error("change at {start} overlaps previous change ending at {prev_end}")]
	Overlapping {
		/// Start of the offending change.
		start: CharIdx,
		/// End of the preceding change.
		prev_end: CharIdx,
	},
}
