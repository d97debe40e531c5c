use chronicle_history::commands::{self, redo_depth, undo_depth};
use chronicle_history::{EditorState, HistoryConfig, HistoryState};
use chronicle_primitives::Change;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::{editor, editor_with, redo, type_text, undo};

#[test]
fn typed_run_undoes_as_one_event() {
	let state = editor("");
	let state = type_text(&state, 0, "a", 0);
	let state = type_text(&state, 1, "b", 100);
	assert_eq!(state.doc().to_string(), "ab");
	assert_eq!(undo_depth(&state), 1);

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "");
	assert_eq!(redo_depth(&state), 1);

	let state = redo(&state).expect("redo available");
	assert_eq!(state.doc().to_string(), "ab");
	assert_eq!(redo_depth(&state), 0);
	assert_eq!(undo_depth(&state), 1);
}

#[test]
fn commands_on_empty_history_do_not_dispatch() {
	let state = editor("abc");
	let mut dispatched = false;
	assert!(!commands::undo(&state, |_| dispatched = true));
	assert!(!commands::redo(&state, |_| dispatched = true));
	assert!(!commands::undo_selection(&state, |_| dispatched = true));
	assert!(!commands::redo_selection(&state, |_| dispatched = true));
	assert!(!dispatched);
}

#[test]
fn new_edit_invalidates_redo() {
	let state = type_text(&editor(""), 0, "a", 0);
	let state = type_text(&state, 1, "b", 1000);
	let state = undo(&state).expect("undo available");
	assert_eq!(redo_depth(&state), 1);

	let state = type_text(&state, 1, "c", 2000);
	assert_eq!(state.doc().to_string(), "ac");
	assert_eq!(redo_depth(&state), 0);
	assert!(redo(&state).is_none());
}

#[test]
fn close_history_splits_run() {
	let state = type_text(&editor(""), 0, "a", 0);
	let tr = state
		.transaction()
		.replace([Change::insert(1, "b")])
		.expect("insert in bounds")
		.with_user_event("input")
		.at_time(10);
	let state = state.apply(commands::close_history(tr));
	assert_eq!(undo_depth(&state), 2);

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "a");
}

#[test]
fn depth_is_bounded_oldest_first() {
	let config = HistoryConfig::from_toml_str("[history]\nmin_depth = 3\n").expect("valid config");
	let mut state = editor_with("", config);
	for (i, ch) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
		state = type_text(&state, i, ch, i as u64 * 1000);
	}
	assert_eq!(undo_depth(&state), 3);

	while let Some(next) = undo(&state) {
		state = next;
	}
	assert_eq!(state.doc().to_string(), "ab");
	assert_eq!(redo_depth(&state), 3);
}

#[test]
fn failed_command_keeps_state() {
	let state = type_text(&editor(""), 0, "a", 0);
	let before = state.history().clone();
	assert!(redo(&state).is_none());
	assert_eq!(state.history(), &before);
}

#[test]
fn history_values_are_thread_safe() {
	fn assert_send_sync<T: Send + Sync>() {}
	assert_send_sync::<HistoryState>();
	assert_send_sync::<EditorState>();
}

fn arb_edits() -> impl Strategy<Value = Vec<(usize, usize, Option<String>, u64, bool)>> {
	prop::collection::vec(
		(
			0..64usize,
			0..5usize,
			proptest::option::of("[a-z]{1,4}"),
			0..800u64,
			any::<bool>(),
		),
		1..16,
	)
}

proptest! {
	/// Undoing everything restores the original text and redoing everything
	/// restores the final text, regardless of how edits were grouped.
	#[test]
	fn prop_undo_redo_inverse(text in "[a-z ]{0,30}", edits in arb_edits()) {
		let mut state = editor(&text);
		let mut time = 0;
		for (pos, del, insert, gap, tagged) in edits {
			let len = state.doc().len_chars();
			let start = pos % (len + 1);
			let end = (start + del).min(len);
			time += gap;
			let mut tr = state
				.transaction()
				.replace([Change { start, end, replacement: insert }])
				.expect("change in bounds")
				.at_time(time);
			if tagged {
				tr = tr.with_user_event("input");
			}
			state = state.apply(tr);
		}
		let final_text = state.doc().to_string();
		let depth = undo_depth(&state);

		for _ in 0..depth {
			state = undo(&state).expect("undo available");
		}
		prop_assert_eq!(state.doc().to_string(), text);
		prop_assert_eq!(redo_depth(&state), depth);

		for _ in 0..depth {
			state = redo(&state).expect("redo available");
		}
		prop_assert_eq!(state.doc().to_string(), final_text);
		prop_assert_eq!(undo_depth(&state), depth);
	}
}
