use chronicle_history::EditorState;
use chronicle_history::commands::undo_depth;
use chronicle_primitives::Change;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::{editor, redo, type_text, undo};

#[test]
fn foreign_edit_survives_undo_and_redo() {
	let state = type_text(&editor(""), 0, "hello", 0);
	let tr = state
		.transaction()
		.replace([Change::insert(5, " world")])
		.expect("insert in bounds")
		.at_time(1000);
	let state = state.apply(tr);

	let foreign = state
		.transaction()
		.replace([Change::insert(0, "# ")])
		.expect("insert in bounds")
		.without_history();
	let state = state.apply(foreign);
	assert_eq!(state.doc().to_string(), "# hello world");
	assert_eq!(undo_depth(&state), 2);

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "# hello");
	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "# ");

	let state = redo(&state).expect("redo available");
	let state = redo(&state).expect("redo available");
	assert_eq!(state.doc().to_string(), "# hello world");
}

#[test]
fn foreign_edit_rebases_redo_branch() {
	let state = type_text(&editor("abc"), 3, "def", 0);
	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "abc");

	let foreign = state
		.transaction()
		.replace([Change::replace(0, 1, "A")])
		.expect("replace in bounds")
		.without_history();
	let state = state.apply(foreign);

	let state = redo(&state).expect("redo available");
	assert_eq!(state.doc().to_string(), "Abcdef");
	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "Abc");
}

#[test]
fn foreign_edit_inside_recorded_text() {
	let state = type_text(&editor(""), 0, "abcdef", 0);
	let foreign = state
		.transaction()
		.replace([Change::delete(2, 4)])
		.expect("delete in bounds")
		.without_history();
	let state = state.apply(foreign);
	assert_eq!(state.doc().to_string(), "abef");

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "");
	let state = redo(&state).expect("redo available");
	assert_eq!(state.doc().to_string(), "abef");
}

#[test]
fn foreign_edit_keeps_cursor_valid() {
	let state = type_text(&editor("xyz"), 3, "!", 0);
	let foreign = state
		.transaction()
		.replace([Change::delete(0, 3)])
		.expect("delete in bounds")
		.without_history();
	let state = state.apply(foreign);
	assert_eq!(state.doc().to_string(), "!");

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "");
	assert!(state.selection().is_in_bounds(state.doc().len_chars()));
}

fn foreign_insert(state: &EditorState, pos: usize, text: &str) -> EditorState {
	let tr = state
		.transaction()
		.replace([Change::insert(pos, text)])
		.expect("insert in bounds")
		.without_history();
	state.apply(tr)
}

#[test]
fn foreign_edit_between_coalesced_inserts() {
	let state = type_text(&editor(""), 0, "a", 0);
	let state = foreign_insert(&state, 0, "X");
	let state = type_text(&state, 2, "b", 10);
	assert_eq!(state.doc().to_string(), "Xab");
	assert_eq!(undo_depth(&state), 1);
	assert_eq!(state.history().done().events()[0].changes().len(), 2);

	let state = undo(&state).expect("undo available");
	assert_eq!(state.doc().to_string(), "X");
	let state = redo(&state).expect("redo available");
	assert_eq!(state.doc().to_string(), "Xab");
}

/// Steps as `(foreign, pos, recorded, foreign_text, gap)` seeds.
fn arb_interleaved() -> impl Strategy<Value = Vec<(bool, usize, String, String, u64)>> {
	prop::collection::vec(
		(any::<bool>(), 0..64usize, "[a-z]{1,4}", "[A-Z]{1,3}", 0..400u64),
		1..20,
	)
}

proptest! {
	/// Recorded lowercase inserts interleaved with unrecorded uppercase ones:
	/// undoing everything removes exactly the recorded text.
	#[test]
	fn prop_undo_all_keeps_foreign_text(text in "[a-z]{0,20}", steps in arb_interleaved()) {
		let mut state = editor(&text);
		let mut time = 0;
		let mut foreign_chars = 0;
		for (foreign, pos, recorded, foreign_text, gap) in steps {
			let pos = pos % (state.doc().len_chars() + 1);
			time += gap;
			state = if foreign {
				foreign_chars += foreign_text.len();
				foreign_insert(&state, pos, &foreign_text)
			} else {
				type_text(&state, pos, &recorded, time)
			};
		}

		while let Some(next) = undo(&state) {
			state = next;
		}
		let doc = state.doc().to_string();
		let kept: String = doc.chars().filter(char::is_ascii_lowercase).collect();
		prop_assert_eq!(kept, text);
		prop_assert_eq!(doc.chars().filter(char::is_ascii_uppercase).count(), foreign_chars);
		prop_assert_eq!(undo_depth(&state), 0);
	}
}
