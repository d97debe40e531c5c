//! Persistent stacks of history events.

use std::sync::Arc;

use chronicle_primitives::{ChangeSet, Rope};
use tracing::trace;

use crate::event::HistoryEvent;
use crate::state::ItemFilter;


/// An ordered stack of events, oldest first.
///
/// Branches are immutable values. Every update returns a new branch and
/// leaves the receiver untouched, so earlier history states stay valid while
/// sharing storage with later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryBranch {
	events: Arc<Vec<HistoryEvent>>,
}

impl HistoryBranch {
	/// Returns the number of events in the branch.
	pub fn len(&self) -> usize {
		self.events.len()
	}

	/// Returns true if the branch holds no events.
	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}

	/// Events from oldest to newest.
	pub fn events(&self) -> &[HistoryEvent] {
		&self.events
	}

	/// The most recent event.
	pub fn last(&self) -> Option<&HistoryEvent> {
		self.events.last()
	}

	/// Counts events eligible under `filter`.
	pub fn count(&self, filter: ItemFilter) -> usize {
		self.events.iter().filter(|event| event.matches(filter)).count()
	}

	/// Index of the topmost event eligible under `filter`.
	pub fn find(&self, filter: ItemFilter) -> Option<usize> {
		self.events.iter().rposition(|event| event.matches(filter))
	}

	/// Returns a branch with `event` on top, pruned to `min_depth`.
	pub(crate) fn pushed(&self, event: HistoryEvent, min_depth: usize) -> Self {
		let mut next = self.clone();
		let events = Arc::make_mut(&mut next.events);
		events.push(event);

		let dropped = prune(events, min_depth);
		if dropped > 0 {
			trace!(dropped, remaining = events.len(), "history branch pruned");
		}
		next
	}

	/// Returns a branch whose top event is replaced by `event`.
	pub(crate) fn with_last(&self, event: HistoryEvent) -> Self {
		let mut next = self.clone();
		let events = Arc::make_mut(&mut next.events);
		match events.last_mut() {
			Some(last) => *last = event,
			None => events.push(event),
		}
		next
	}

	/// Returns a branch without the event at `index`.
	///
	/// Events above it are selection-only (they were skipped during lookup)
	/// and have their selections mapped through `applied`, the changes made
	/// by popping the removed event.
	pub(crate) fn popped(&self, index: usize, applied: &ChangeSet) -> Self {
		let mut events = Vec::with_capacity(self.events.len().saturating_sub(1));
		events.extend_from_slice(&self.events[..index]);
		events.extend(
			self.events[index + 1..]
				.iter()
				.map(|event| event.with_selection_mapped(applied)),
		);
		Self {
			events: Arc::new(events),
		}
	}

	/// Rebases every event over a foreign change.
	///
	/// `foreign` applies to the document at the top of this branch and `doc`
	/// is that document after `foreign`. The walk goes from the newest event
	/// down, carrying the foreign change below each event it passes.
	pub(crate) fn mapped(&self, foreign: &ChangeSet, doc: &Rope) -> Self {
		if self.events.is_empty() || foreign.is_empty() {
			return self.clone();
		}

		let mut foreign = foreign.clone();
		let mut doc = doc.clone();
		let mut events = Vec::with_capacity(self.events.len());
		let mut remaining = self.events.iter().rev();

		for event in remaining.by_ref() {
			let (mapped, below, before) = event.map_through(foreign, doc);
			events.push(mapped);
			foreign = below;
			doc = before;
			if foreign.is_empty() {
				break;
			}
		}
		events.extend(remaining.cloned());
		events.reverse();

		Self {
			events: Arc::new(events),
		}
	}
}

/// Drops the oldest events so at most `min_depth` content events remain,
/// then caps the run of selection-only events below the oldest remaining
/// content event at `min_depth`. Returns the number of events dropped.
fn prune(events: &mut Vec<HistoryEvent>, min_depth: usize) -> usize {
	let before = events.len();

	let content = events.iter().filter(|event| !event.is_selection_only()).count();
	if content > min_depth {
		let cut = events
			.iter()
			.enumerate()
			.filter(|(_, event)| !event.is_selection_only())
			.nth(content - min_depth - 1)
			.map_or(0, |(index, _)| index + 1);
		events.drain(..cut);
	}

	let run = events.iter().take_while(|event| event.is_selection_only()).count();
	if run > min_depth {
		events.drain(..run - min_depth);
	}

	before - events.len()
}
