//! Undoable history events.

use chronicle_primitives::{Bias, ChangeSet, Rope, Selection};

use crate::state::ItemFilter;

/// A recorded change set together with its pre-computed inverse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangePair {
	/// The change as it was originally applied.
	pub forward: ChangeSet,
	/// The change that reverts `forward`.
	pub inverse: ChangeSet,
}

impl ChangePair {
	/// Pairs a forward change with its inverse.
	pub fn new(forward: ChangeSet, inverse: ChangeSet) -> Self {
		Self { forward, inverse }
	}
}

/// A single undoable unit in a history branch.
///
/// Content events hold one or more change pairs in recorded order (several
/// after coalescing). Selection-only events hold none and only restore
/// `selection_before`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEvent {
	changes: Vec<ChangePair>,
	selection_before: Selection,
	timestamp: u64,
	user_event: Option<String>,
}

impl HistoryEvent {
	/// Creates a content event from a single change pair.
	pub fn content(
		pair: ChangePair,
		selection_before: Selection,
		timestamp: u64,
		user_event: Option<String>,
	) -> Self {
		Self {
			changes: vec![pair],
			selection_before,
			timestamp,
			user_event,
		}
	}

	/// Creates a selection-only event.
	pub fn selection(selection_before: Selection, timestamp: u64, user_event: Option<String>) -> Self {
		Self {
			changes: Vec::new(),
			selection_before,
			timestamp,
			user_event,
		}
	}

	/// Change pairs in the order they were recorded.
	pub fn changes(&self) -> &[ChangePair] {
		&self.changes
	}

	/// Selection restored when this event is undone.
	pub fn selection_before(&self) -> &Selection {
		&self.selection_before
	}

	/// Time of the most recent transaction folded into this event.
	pub fn timestamp(&self) -> u64 {
		self.timestamp
	}

	/// User-event tag of the transaction that opened this event.
	pub fn user_event(&self) -> Option<&str> {
		self.user_event.as_deref()
	}

	/// Returns true if this event only moves the selection.
	pub fn is_selection_only(&self) -> bool {
		self.changes.is_empty()
	}

	/// Returns true if this event is eligible under `filter`.
	pub fn matches(&self, filter: ItemFilter) -> bool {
		match filter {
			ItemFilter::Any => true,
			ItemFilter::OnlyChanges => !self.is_selection_only(),
		}
	}

	/// Inverse change sets in the order they must be applied to undo this event.
	pub fn inverses(&self) -> impl Iterator<Item = &ChangeSet> {
		self.changes.iter().rev().map(|pair| &pair.inverse)
	}

	/// Folds another transaction into this event.
	///
	/// `selection_before` stays that of the first transaction.
	pub(crate) fn merged(&self, pair: Option<ChangePair>, timestamp: u64) -> Self {
		let mut event = self.clone();
		event.changes.extend(pair);
		event.timestamp = timestamp;
		event
	}

	/// Returns this event with its selection mapped through `changes`.
	pub(crate) fn with_selection_mapped(&self, changes: &ChangeSet) -> Self {
		Self {
			selection_before: self.selection_before.map(changes),
			..self.clone()
		}
	}

	/// Rebases this event over a foreign change.
	///
	/// `foreign` applies to the document this event's last inverse applies to,
	/// and `doc` is that document with `foreign` already applied. Returns the
	/// rebased event, the foreign change rebased below this event, and the
	/// document as it looks once the rebased event is undone.
	pub(crate) fn map_through(&self, mut foreign: ChangeSet, mut doc: Rope) -> (Self, ChangeSet, Rope) {
		let mut changes = Vec::with_capacity(self.changes.len());

		for pair in self.changes.iter().rev() {
			let inverse = pair.inverse.map(&foreign, Bias::Right);
			let forward = inverse.invert(&doc);
			foreign = foreign.map(&pair.inverse, Bias::Left);
			inverse.apply(&mut doc);
			changes.push(ChangePair::new(forward, inverse));
		}
		changes.reverse();

		let event = Self {
			changes,
			selection_before: self.selection_before.map(&foreign),
			timestamp: self.timestamp,
			user_event: self.user_event.clone(),
		};
		(event, foreign, doc)
	}
}
