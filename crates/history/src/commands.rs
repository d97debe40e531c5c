//! Undo and redo commands over an [`EditorState`].
//!
//! Commands never mutate state directly. On success they hand a transaction
//! to `dispatch`, and the caller commits it with [`EditorState::apply`].

use tracing::trace;

use crate::editor::{EditorState, EditorTransaction};
use crate::state::{ItemFilter, PopTarget, Popped};

fn pop_with(
	state: &EditorState,
	target: PopTarget,
	filter: ItemFilter,
	dispatch: impl FnOnce(EditorTransaction),
) -> bool {
	let Ok(Popped { transaction, .. }) =
		state.history().pop(target, filter, state.transaction(), state.config())
	else {
		trace!(%target, %filter, "nothing to pop");
		return false;
	};
	dispatch(transaction);
	true
}

/// Undoes the most recent content event.
///
/// Returns false, without dispatching, if there is nothing to undo.
pub fn undo(state: &EditorState, dispatch: impl FnOnce(EditorTransaction)) -> bool {
	pop_with(state, PopTarget::Done, ItemFilter::OnlyChanges, dispatch)
}

/// Redoes the most recently undone content event.
pub fn redo(state: &EditorState, dispatch: impl FnOnce(EditorTransaction)) -> bool {
	pop_with(state, PopTarget::Undone, ItemFilter::OnlyChanges, dispatch)
}

/// Undoes the most recent event, including selection-only ones.
pub fn undo_selection(state: &EditorState, dispatch: impl FnOnce(EditorTransaction)) -> bool {
	pop_with(state, PopTarget::Done, ItemFilter::Any, dispatch)
}

/// Redoes the most recently undone event, including selection-only ones.
pub fn redo_selection(state: &EditorState, dispatch: impl FnOnce(EditorTransaction)) -> bool {
	pop_with(state, PopTarget::Undone, ItemFilter::Any, dispatch)
}

/// Number of content events that can be undone.
pub fn undo_depth(state: &EditorState) -> usize {
	state.history().event_count(PopTarget::Done, ItemFilter::OnlyChanges)
}

/// Number of content events that can be redone.
pub fn redo_depth(state: &EditorState) -> usize {
	state.history().event_count(PopTarget::Undone, ItemFilter::OnlyChanges)
}

/// Number of events, of either kind, that can be undone.
pub fn undo_selection_depth(state: &EditorState) -> usize {
	state.history().event_count(PopTarget::Done, ItemFilter::Any)
}

/// Number of events, of either kind, that can be redone.
pub fn redo_selection_depth(state: &EditorState) -> usize {
	state.history().event_count(PopTarget::Undone, ItemFilter::Any)
}

/// Marks `tr` so it starts a new history event.
pub fn close_history(tr: EditorTransaction) -> EditorTransaction {
	tr.close_history()
}
