//! The persistent history state and its transitions.
//!
//! A [`HistoryState`] is a pair of branches plus grouping bookkeeping.
//! Every transition returns a new state:
//!
//! ```text
//!                  add_changes (clears undone)
//!   transaction ─────────────────────────────► done ──┐
//!        │                                            │ pop(Done)
//!        │ add_mapping (rebases both)                 ▼
//!        └──────────────────────────────────►  undone ◄── complement
//!                                                │
//!                     pop(Undone) ─► done ◄──────┘
//! ```

use std::fmt;

use chronicle_primitives::{ChangeSet, Rope, Selection};
use tracing::{debug, trace};

use crate::branch::HistoryBranch;
use crate::config::HistoryConfig;
use crate::editor::EditorTransaction;
use crate::error::{HistoryError, Result};
use crate::event::{ChangePair, HistoryEvent};


/// Branch a history command pops from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopTarget {
	/// Pop from the done branch (undo).
	Done,
	/// Pop from the undone branch (redo).
	Undone,
}

impl fmt::Display for PopTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Done => "done",
			Self::Undone => "undone",
		})
	}
}

/// Which events a history command may pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemFilter {
	/// Only content events. Selection-only events above them are skipped.
	OnlyChanges,
	/// Any event, taken from the top.
	Any,
}

impl fmt::Display for ItemFilter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::OnlyChanges => "content",
			Self::Any => "history",
		})
	}
}

/// Undo and redo branches for one editor state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
	done: HistoryBranch,
	undone: HistoryBranch,
	prev_time: Option<u64>,
	prev_user_event: Option<String>,
}

/// Result of popping an event off a branch.
#[derive(Debug, Clone)]
pub struct Popped {
	/// Transaction that reverts the popped event. It carries `state` as its
	/// history override.
	pub transaction: EditorTransaction,
	/// History state to adopt once the transaction is applied.
	pub state: HistoryState,
}

impl HistoryState {
	/// Creates an empty history.
	pub fn new() -> Self {
		Self::default()
	}

	fn from_branches(done: HistoryBranch, undone: HistoryBranch) -> Self {
		Self {
			done,
			undone,
			prev_time: None,
			prev_user_event: None,
		}
	}

	/// Events that can be undone.
	pub fn done(&self) -> &HistoryBranch {
		&self.done
	}

	/// Events that can be redone.
	pub fn undone(&self) -> &HistoryBranch {
		&self.undone
	}

	/// Time of the last recorded transaction, if grouping is still open.
	pub fn prev_time(&self) -> Option<u64> {
		self.prev_time
	}

	/// User-event tag of the last recorded transaction.
	pub fn prev_user_event(&self) -> Option<&str> {
		self.prev_user_event.as_deref()
	}

	fn branch(&self, target: PopTarget) -> &HistoryBranch {
		match target {
			PopTarget::Done => &self.done,
			PopTarget::Undone => &self.undone,
		}
	}

	/// Computes the state that follows `tr`.
	///
	/// A history override replaces the state outright. Otherwise the
	/// transaction is recorded, used to rebase existing events, or ignored,
	/// depending on whether it changed anything and whether it is eligible
	/// for history.
	pub fn apply(&self, tr: &EditorTransaction, config: &HistoryConfig) -> Self {
		let meta = tr.meta();
		if let Some(state) = &meta.history_override {
			trace!(
				done = state.done.len(),
				undone = state.undone.len(),
				"history override adopted"
			);
			return state.clone();
		}

		let state = if meta.close_history {
			self.reset_time()
		} else {
			self.clone()
		};

		let changed = !tr.changes().is_empty();
		if !changed && !tr.selection_changed() {
			return state;
		}

		if meta.add_to_history {
			let pair = changed.then(|| ChangePair::new(tr.changes().clone(), tr.inverted_changes()));
			state.add_changes(
				pair,
				tr.start_selection().clone(),
				meta.time,
				meta.user_event.as_deref(),
				config,
			)
		} else if changed {
			state.add_mapping(tr.changes(), tr.doc())
		} else {
			state
		}
	}

	/// Records a transaction in the done branch.
	///
	/// `pair` is `None` for selection-only transactions. The new entry is
	/// folded into the top event when both are of the same kind, both carry
	/// the same user-event tag, and the time since the previous transaction
	/// is below the grouping delay. Content always clears the undone branch.
	pub fn add_changes(
		&self,
		pair: Option<ChangePair>,
		selection_before: Selection,
		time: u64,
		user_event: Option<&str>,
		config: &HistoryConfig,
	) -> Self {
		let is_content = pair.is_some();
		let top = self
			.done
			.last()
			.filter(|top| top.is_selection_only() != is_content && self.may_join(time, user_event, config));

		let done = match top {
			Some(top) => {
				trace!(time, user_event = ?user_event, content = is_content, "joined history event");
				self.done.with_last(top.merged(pair, time))
			}
			None => {
				let event = match pair {
					Some(pair) => HistoryEvent::content(pair, selection_before, time, user_event.map(str::to_owned)),
					None => HistoryEvent::selection(selection_before, time, user_event.map(str::to_owned)),
				};
				trace!(time, user_event = ?user_event, content = is_content, "new history event");
				self.done.pushed(event, config.min_depth)
			}
		};

		let undone = if is_content {
			if !self.undone.is_empty() {
				trace!(cleared = self.undone.len(), "undone branch cleared");
			}
			HistoryBranch::default()
		} else {
			self.undone.clone()
		};

		Self {
			done,
			undone,
			prev_time: Some(time),
			prev_user_event: user_event.map(str::to_owned),
		}
	}

	fn may_join(&self, time: u64, user_event: Option<&str>, config: &HistoryConfig) -> bool {
		let Some(prev_time) = self.prev_time else {
			return false;
		};
		self.prev_user_event.as_deref() == user_event
			&& time.checked_sub(prev_time).is_some_and(|gap| gap < config.new_group_delay)
	}

	/// Rebases both branches over a change that is not itself recorded.
	///
	/// `doc` is the document after `changes` was applied.
	pub fn add_mapping(&self, changes: &ChangeSet, doc: &Rope) -> Self {
		if self.done.is_empty() && self.undone.is_empty() {
			return self.clone();
		}
		trace!(done = self.done.len(), undone = self.undone.len(), "rebasing history");

		// Both branches unwind from the current document.
		Self {
			done: self.done.mapped(changes, doc),
			undone: self.undone.mapped(changes, doc),
			prev_time: self.prev_time,
			prev_user_event: self.prev_user_event.clone(),
		}
	}

	/// Ends the current group so the next transaction starts a new event.
	pub fn reset_time(&self) -> Self {
		Self {
			prev_time: None,
			prev_user_event: None,
			..self.clone()
		}
	}

	/// Returns true if `target` holds an event eligible under `filter`.
	pub fn can_pop(&self, target: PopTarget, filter: ItemFilter) -> bool {
		self.branch(target).find(filter).is_some()
	}

	/// Counts events in `target` eligible under `filter`.
	pub fn event_count(&self, target: PopTarget, filter: ItemFilter) -> usize {
		self.branch(target).count(filter)
	}

	/// Pops the topmost eligible event from `target`.
	///
	/// The inverses of the popped event are applied to `tr` and its selection
	/// is restored. A complementary event, holding the applied changes and the
	/// selection from before the pop, goes onto the opposite branch. The
	/// resulting state is attached to the returned transaction as its history
	/// override.
	///
	/// # Errors
	///
	/// Returns [`HistoryError::NothingToPop`] if no event is eligible.
	pub fn pop(
		&self,
		target: PopTarget,
		filter: ItemFilter,
		tr: EditorTransaction,
		config: &HistoryConfig,
	) -> Result<Popped> {
		let source = self.branch(target);
		let index = source
			.find(filter)
			.ok_or(HistoryError::NothingToPop { target, filter })?;
		let event = &source.events()[index];

		let selection_before = tr.start_selection().clone();
		let mut tr = tr;
		for inverse in event.inverses() {
			tr = tr.change(inverse.clone());
		}
		tr = tr.with_selection(event.selection_before().clone());

		// The complement has the popped event's kind, even when the applied
		// changes cancel out.
		let applied = tr.changes().clone();
		let time = tr.meta().time;
		let is_content = !event.is_selection_only();
		let complement = if is_content {
			let inverse = tr.inverted_changes();
			HistoryEvent::content(ChangePair::new(applied.clone(), inverse), selection_before, time, None)
		} else {
			HistoryEvent::selection(selection_before, time, None)
		};

		let source = source.popped(index, &applied);
		let state = match target {
			PopTarget::Done => Self::from_branches(source, self.undone.pushed(complement, config.min_depth)),
			PopTarget::Undone => Self::from_branches(self.done.pushed(complement, config.min_depth), source),
		};
		debug!(
			%target,
			%filter,
			done = state.done.len(),
			undone = state.undone.len(),
			content = is_content,
			"popped history event"
		);

		Ok(Popped {
			transaction: tr.with_history_override(state.clone()),
			state,
		})
	}
}
