//! Change sets and the transactions that carry them.

mod changeset;
mod error;
mod types;


pub use changeset::ChangeSet;
pub use error::ChangeError;
pub use types::{Bias, Change, Insertion, Operation, Tendril};

use crate::{Rope, RopeSlice, Selection};

/// A set of document changes paired with an optional new selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
	changes: ChangeSet,
	selection: Option<Selection>,
}

impl Transaction {
	/// Creates an empty transaction for the given document.
	pub fn new(doc: RopeSlice) -> Self {
		Self {
			changes: ChangeSet::new(doc),
			selection: None,
		}
	}

	/// Creates a transaction from a list of sorted, non-overlapping changes.
	///
	/// # Errors
	/// Returns [`ChangeError`] if the changes are unsorted, overlapping, or out
	/// of bounds for `doc`.
	pub fn change<I>(doc: RopeSlice, changes: I) -> Result<Self, ChangeError>
	where
		I: IntoIterator<Item = Change>,
	{
		Ok(ChangeSet::from_changes(doc, changes)?.into())
	}

	/// Replaces every selected range with `text`.
	///
	/// Cursors become insertions. Ranges past the end of the document are
	/// clamped to it.
	pub fn insert(doc: RopeSlice, selection: &Selection, text: Tendril) -> Self {
		Self::by_ranges(doc, selection, Some(text))
	}

	/// Deletes every selected range.
	pub fn delete(doc: RopeSlice, selection: &Selection) -> Self {
		Self::by_ranges(doc, selection, None)
	}

	fn by_ranges(doc: RopeSlice, selection: &Selection, text: Option<Tendril>) -> Self {
		let doc_len = doc.len_chars();
		let mut changes = ChangeSet::default();
		let mut last = 0;

		// Normalized selections are sorted and non-overlapping.
		for range in selection.iter() {
			let start = range.min().min(doc_len).max(last);
			let end = range.max().min(doc_len).max(start);
			changes.retain(start - last);
			changes.delete(end - start);
			if let Some(text) = &text {
				changes.insert(text.clone());
			}
			last = end;
		}
		changes.retain(doc_len - last);

		changes.into()
	}

	/// Returns the document changes.
	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	/// Returns the selection set by this transaction, if any.
	pub fn selection(&self) -> Option<&Selection> {
		self.selection.as_ref()
	}

	/// Sets the selection to apply after the changes.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.selection = Some(selection);
		self
	}

	/// Appends `changes`, which apply to the document this transaction
	/// produces.
	///
	/// An explicit selection refers to that document, so it is mapped
	/// through `changes` as well.
	pub fn compose(self, changes: ChangeSet) -> Self {
		Self {
			selection: self.selection.map(|selection| selection.map(&changes)),
			changes: self.changes.compose(changes),
		}
	}

	/// Consumes the transaction, returning its changes.
	pub fn into_changes(self) -> ChangeSet {
		self.changes
	}

	/// Applies the changes to a document.
	pub fn apply(&self, doc: &mut Rope) {
		self.changes.apply(doc);
	}

	/// Returns a transaction that reverts this one's changes.
	///
	/// `original` is the document before this transaction was applied.
	pub fn invert(&self, original: &Rope) -> Self {
		self.changes.invert(original).into()
	}

	/// Maps a selection through this transaction's changes.
	pub fn map_selection(&self, selection: &Selection) -> Selection {
		selection.map(&self.changes)
	}
}

impl From<ChangeSet> for Transaction {
	fn from(changes: ChangeSet) -> Self {
		Self {
			changes,
			selection: None,
		}
	}
}
