use chronicle_history::commands::{redo_selection_depth, undo_depth, undo_selection_depth};
use chronicle_primitives::{Change, Selection};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use chronicle_history::EditorState;

use crate::common::{editor, redo_selection, select, type_text, undo, undo_selection};

/// "abc" with an "X" typed at the end, the cursor having started at 3.
fn typed() -> EditorState {
	type_text(&editor("abc").with_selection(Selection::point(3)), 3, "X", 0)
}

#[test]
fn selection_moves_are_tracked_separately() {
	let state = typed();
	assert_eq!(state.selection(), &Selection::point(4));
	let state = select(&state, 0, 1000);
	let state = select(&state, 2, 3000);
	assert_eq!(undo_depth(&state), 1);
	assert_eq!(undo_selection_depth(&state), 3);

	let state = undo_selection(&state).expect("selection undo available");
	assert_eq!(state.doc().to_string(), "abcX");
	assert_eq!(state.selection(), &Selection::point(0));
	assert_eq!(redo_selection_depth(&state), 1);

	let state = undo_selection(&state).expect("selection undo available");
	assert_eq!(state.selection(), &Selection::point(4));

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "abc");
	assert_eq!(state.selection(), &Selection::point(3));

	let state = redo_selection(&state).expect("redo available");
	assert_eq!(state.doc().to_string(), "abcX");
	assert_eq!(state.selection(), &Selection::point(4));

	let state = redo_selection(&state).expect("redo available");
	assert_eq!(state.selection(), &Selection::point(0));
	let state = redo_selection(&state).expect("redo available");
	assert_eq!(state.selection(), &Selection::point(2));
	assert_eq!(redo_selection_depth(&state), 0);
}

#[test]
fn content_undo_skips_selection_moves() {
	let state = typed();
	let state = select(&state, 0, 1000);
	let state = select(&state, 4, 3000);

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "abc");
	assert_eq!(undo_depth(&state), 0);
	assert_eq!(undo_selection_depth(&state), 2);

	let done = state.history().done();
	for event in done.events() {
		assert!(event.is_selection_only());
		assert!(event.selection_before().is_in_bounds(state.doc().len_chars()));
	}
	assert_eq!(done.events()[0].selection_before(), &Selection::point(3));
	assert_eq!(done.events()[1].selection_before(), &Selection::point(0));
}

#[test]
fn rapid_selection_moves_coalesce() {
	let state = editor("abcdef");
	let state = select(&state, 1, 0);
	let state = select(&state, 2, 100);
	let state = select(&state, 3, 200);
	assert_eq!(undo_selection_depth(&state), 1);

	let state = undo_selection(&state).expect("selection undo available");
	assert_eq!(state.selection(), &Selection::point(0));
}

#[test]
fn selection_moves_keep_redo_branch() {
	let state = type_text(&editor("b"), 0, "a", 0);
	let state = undo(&state).expect("undo available");
	assert_eq!(state.selection(), &Selection::point(0));
	let state = select(&state, 1, 1000);
	assert_eq!(undo_selection_depth(&state), 1);
	assert_eq!(redo_selection_depth(&state), 1);
}

/// Steps as `(is_move, pos, del, insert, gap)` seeds.
fn arb_steps() -> impl Strategy<Value = Vec<(bool, usize, usize, Option<String>, u64)>> {
	prop::collection::vec(
		(
			any::<bool>(),
			0..64usize,
			0..4usize,
			proptest::option::of("[a-z]{1,4}"),
			0..800u64,
		),
		1..16,
	)
}

proptest! {
	/// Walking the whole history back with selection undo restores the
	/// original document and cursor, and walking it forward again restores
	/// the final ones.
	#[test]
	fn prop_selection_undo_redo_round_trip(text in "[a-z ]{0,30}", steps in arb_steps()) {
		let start = editor(&text);
		let mut state = start.clone();
		let mut time = 0;
		for (is_move, pos, del, insert, gap) in steps {
			let len = state.doc().len_chars();
			let pos = pos % (len + 1);
			time += gap;
			state = if is_move {
				select(&state, pos, time)
			} else {
				let change = Change { start: pos, end: (pos + del).min(len), replacement: insert };
				let tr = state
					.transaction()
					.replace([change])
					.expect("change in bounds")
					.with_user_event("input")
					.at_time(time);
				state.apply(tr)
			};
		}
		let final_doc = state.doc().to_string();
		let final_selection = state.selection().clone();

		let mut steps_back = 0;
		while let Some(next) = undo_selection(&state) {
			state = next;
			steps_back += 1;
		}
		prop_assert_eq!(state.doc().to_string(), text);
		prop_assert_eq!(state.selection(), start.selection());
		prop_assert_eq!(redo_selection_depth(&state), steps_back);

		for _ in 0..steps_back {
			state = redo_selection(&state).expect("redo available");
		}
		prop_assert_eq!(state.doc().to_string(), final_doc);
		prop_assert_eq!(state.selection(), &final_selection);
	}
}
