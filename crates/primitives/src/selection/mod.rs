use smallvec::{SmallVec, smallvec};

use crate::range::{CharIdx, Range};
use crate::transaction::{Bias, ChangeSet};


/// A set of non-overlapping ranges with a designated primary.
///
/// A selection always contains at least one range. The primary range
/// is used for cursor positioning and scroll following.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	/// The collection of selection ranges (always non-empty).
	ranges: SmallVec<[Range; 1]>,
	/// Index of the primary range within `ranges`.
	primary_index: usize,
}

impl Selection {
	/// Create a new selection with at least one range.
	///
	/// The `primary` range is the one that will be used for most operations.
	/// Additional ranges can be provided via the `others` iterator.
	pub fn new(primary: Range, others: impl IntoIterator<Item = Range>) -> Self {
		let mut ranges: SmallVec<[Range; 1]> = smallvec![primary];
		ranges.extend(others);

		let mut sel = Self {
			ranges,
			primary_index: 0,
		};
		sel.normalize();
		sel
	}

	/// Creates a selection from a vector of ranges.
	///
	/// # Panics
	///
	/// Panics if `ranges` is empty or `primary_index` is out of bounds.
	pub fn from_vec(ranges: Vec<Range>, primary_index: usize) -> Self {
		assert!(!ranges.is_empty(), "Selection cannot be empty");
		assert!(
			primary_index < ranges.len(),
			"primary_index ({primary_index}) out of bounds for {} ranges",
			ranges.len()
		);

		let mut sel = Self {
			ranges: ranges.into_iter().collect(),
			primary_index,
		};
		sel.normalize();
		sel
	}

	/// Creates a single-range selection.
	pub fn single(anchor: CharIdx, head: CharIdx) -> Self {
		Self {
			ranges: smallvec![Range::new(anchor, head)],
			primary_index: 0,
		}
	}

	/// Creates a point selection (zero-width cursor).
	pub fn point(pos: CharIdx) -> Self {
		Self::single(pos, pos)
	}

	/// Returns the primary range.
	pub fn primary(&self) -> Range {
		self.ranges[self.primary_index]
	}

	/// Returns the index of the primary range.
	pub fn primary_index(&self) -> usize {
		self.primary_index
	}

	/// Returns all ranges as a slice.
	pub fn ranges(&self) -> &[Range] {
		&self.ranges
	}

	/// Returns the number of ranges in this selection.
	///
	/// This is always at least 1 (Selection cannot be empty).
	#[allow(clippy::len_without_is_empty, reason = "a selection always holds at least one range")]
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// Iterates over all ranges.
	pub fn iter(&self) -> impl Iterator<Item = &Range> {
		self.ranges.iter()
	}

	/// Transforms all ranges using the given function, returning a new selection.
	pub fn transform<F>(&self, mut f: F) -> Self
	where
		F: FnMut(&Range) -> Range,
	{
		let primary = f(&self.primary());
		let others = self
			.ranges
			.iter()
			.enumerate()
			.filter(|&(i, _)| i != self.primary_index)
			.map(|(_, r)| f(r));

		Self::new(primary, others)
	}

	/// Maps every range through a changeset.
	///
	/// Both ends of each range move past insertions at their position, so a
	/// cursor ends up after text inserted at it. Ranges inside deleted text
	/// collapse to the deletion point.
	pub fn map(&self, changes: &ChangeSet) -> Self {
		if changes.is_empty() {
			return self.clone();
		}
		self.transform(|range| range.map(|pos| changes.map_pos(pos, Bias::Right)))
	}

	/// Normalize the selection by sorting ranges and merging overlaps.
	///
	/// Adjacent ranges stay separate. For example, `[0, 5)` and `[5, 10)`
	/// remain two ranges.
	fn normalize(&mut self) {
		if self.ranges.len() <= 1 {
			return;
		}

		let primary = self.ranges[self.primary_index];

		self.ranges.sort_by_key(|r: &Range| r.min());

		let mut merged: SmallVec<[Range; 1]> = SmallVec::new();
		let mut primary_index = 0;

		for range in &self.ranges {
			if let Some(last) = merged.last_mut()
				&& last.overlaps(range)
			{
				let old_last = *last;
				*last = last.merge(range);
				if *range == primary || old_last == primary {
					primary_index = merged.len() - 1;
				}
				continue;
			}

			if *range == primary {
				primary_index = merged.len();
			}
			merged.push(*range);
		}

		self.ranges = merged;
		self.primary_index = primary_index.min(self.ranges.len().saturating_sub(1));
	}

	/// Clamps all ranges to `[0, max_char]`.
	pub fn clamp(&mut self, max_char: CharIdx) {
		for range in &mut self.ranges {
			*range = range.clamp(max_char);
		}
		self.normalize();
	}

	/// Returns `true` if all ranges are within `[0, len]`.
	#[inline]
	pub fn is_in_bounds(&self, len: CharIdx) -> bool {
		self.primary_index < self.ranges.len() && self.ranges.iter().all(|r| r.max() <= len)
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::point(0)
	}
}

impl From<Range> for Selection {
	fn from(range: Range) -> Self {
		Self {
			ranges: smallvec![range],
			primary_index: 0,
		}
	}
}
