//! Minimal host editor state that drives the history.
//!
//! [`EditorState`] is an immutable snapshot of a document, its selection and
//! its history. Edits are staged on an [`EditorTransaction`] and committed
//! with [`EditorState::apply`], which produces the next snapshot.

use chronicle_primitives::{Change, ChangeError, ChangeSet, Rope, Selection, Tendril, Transaction};
use tracing::trace;

use crate::config::HistoryConfig;
use crate::state::HistoryState;

/// Per-transaction annotations read by the history.
#[derive(Debug, Clone)]
pub struct TransactionMeta {
	/// State to adopt verbatim instead of recording this transaction.
	pub history_override: Option<HistoryState>,
	/// Ends the current group before this transaction is considered.
	pub close_history: bool,
	/// Whether the transaction is recorded. Ineligible content changes are
	/// used to rebase existing history instead.
	pub add_to_history: bool,
	/// Tag used to decide whether adjacent transactions coalesce.
	pub user_event: Option<String>,
	/// Transaction time in milliseconds.
	pub time: u64,
}

impl Default for TransactionMeta {
	fn default() -> Self {
		Self {
			history_override: None,
			close_history: false,
			add_to_history: true,
			user_event: None,
			time: 0,
		}
	}
}

/// A pending edit against an [`EditorState`].
///
/// Staged changes and the explicit selection accumulate in a [`Transaction`]
/// whose changes are relative to the start document.
#[derive(Debug, Clone)]
pub struct EditorTransaction {
	start_doc: Rope,
	start_selection: Selection,
	doc: Rope,
	staged: Transaction,
	meta: TransactionMeta,
}

impl EditorTransaction {
	/// Starts an empty transaction on `doc` with `selection` active.
	pub fn new(doc: Rope, selection: Selection) -> Self {
		let staged = Transaction::new(doc.slice(..));
		Self {
			start_doc: doc.clone(),
			start_selection: selection,
			doc,
			staged,
			meta: TransactionMeta::default(),
		}
	}

	fn stage(mut self, step: Transaction) -> Self {
		step.apply(&mut self.doc);
		self.staged = self.staged.compose(step.into_changes());
		self
	}

	/// Appends a change set that applies to the transaction's current document.
	pub fn change(self, changes: ChangeSet) -> Self {
		self.stage(changes.into())
	}

	/// Appends a list of changes expressed against the current document.
	///
	/// # Errors
	///
	/// Returns [`ChangeError`] if the changes are unsorted, overlapping, or out
	/// of bounds.
	pub fn replace<I>(self, changes: I) -> Result<Self, ChangeError>
	where
		I: IntoIterator<Item = Change>,
	{
		let step = Transaction::change(self.doc.slice(..), changes)?;
		Ok(self.stage(step))
	}

	/// Replaces every range of the current selection with `text`.
	pub fn insert_text(self, text: impl Into<Tendril>) -> Self {
		let step = Transaction::insert(self.doc.slice(..), &self.selection(), text.into());
		self.stage(step)
	}

	/// Deletes every range of the current selection.
	pub fn delete_selection(self) -> Self {
		let step = Transaction::delete(self.doc.slice(..), &self.selection());
		self.stage(step)
	}

	/// Sets the selection the transaction leaves behind.
	///
	/// Later changes map it forward.
	pub fn with_selection(mut self, selection: Selection) -> Self {
		self.staged = self.staged.with_selection(selection);
		self
	}

	/// Tags the transaction for grouping.
	pub fn with_user_event(mut self, user_event: impl Into<String>) -> Self {
		self.meta.user_event = Some(user_event.into());
		self
	}

	/// Sets the transaction time in milliseconds.
	pub fn at_time(mut self, time: u64) -> Self {
		self.meta.time = time;
		self
	}

	/// Marks the transaction as not recorded in history.
	pub fn without_history(mut self) -> Self {
		self.meta.add_to_history = false;
		self
	}

	/// Prevents this transaction from joining the previous event.
	pub fn close_history(mut self) -> Self {
		self.meta.close_history = true;
		self
	}

	pub(crate) fn with_history_override(mut self, state: HistoryState) -> Self {
		self.meta.history_override = Some(state);
		self
	}

	/// Document the transaction started from.
	pub fn start_doc(&self) -> &Rope {
		&self.start_doc
	}

	/// Selection active when the transaction started.
	pub fn start_selection(&self) -> &Selection {
		&self.start_selection
	}

	/// Document with all staged changes applied.
	pub fn doc(&self) -> &Rope {
		&self.doc
	}

	/// All staged changes, composed into one change set.
	pub fn changes(&self) -> &ChangeSet {
		self.staged.changes()
	}

	/// Selection after the transaction.
	///
	/// Falls back to the start selection mapped through the changes.
	pub fn selection(&self) -> Selection {
		match self.staged.selection() {
			Some(selection) => selection.clone(),
			None => self.staged.map_selection(&self.start_selection),
		}
	}

	/// Returns true if an explicit selection was set that differs from the
	/// start selection.
	pub fn selection_changed(&self) -> bool {
		self.staged
			.selection()
			.is_some_and(|selection| *selection != self.start_selection)
	}

	/// Change set that reverts this transaction.
	pub fn inverted_changes(&self) -> ChangeSet {
		self.staged.invert(&self.start_doc).into_changes()
	}

	/// History annotations carried by this transaction.
	pub fn meta(&self) -> &TransactionMeta {
		&self.meta
	}
}

/// An immutable editor snapshot: document, selection and history.
#[derive(Debug, Clone)]
pub struct EditorState {
	doc: Rope,
	selection: Selection,
	history: HistoryState,
	config: HistoryConfig,
}

impl EditorState {
	/// Creates a state for `text` with a cursor at the start.
	pub fn new(text: &str, config: HistoryConfig) -> Self {
		Self {
			doc: Rope::from(text),
			selection: Selection::point(0),
			history: HistoryState::new(),
			config,
		}
	}

	/// Replaces the selection without recording history.
	pub fn with_selection(mut self, mut selection: Selection) -> Self {
		selection.clamp(self.doc.len_chars());
		self.selection = selection;
		self
	}

	/// Current document.
	pub fn doc(&self) -> &Rope {
		&self.doc
	}

	/// Current selection.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// Undo and redo history.
	pub fn history(&self) -> &HistoryState {
		&self.history
	}

	/// Configuration applied to every committed transaction.
	pub fn config(&self) -> &HistoryConfig {
		&self.config
	}

	/// Starts a transaction against this state.
	pub fn transaction(&self) -> EditorTransaction {
		EditorTransaction::new(self.doc.clone(), self.selection.clone())
	}

	/// Commits `tr`, returning the next state.
	pub fn apply(&self, tr: EditorTransaction) -> Self {
		debug_assert_eq!(
			tr.start_doc.len_chars(),
			self.doc.len_chars(),
			"transaction started from a different document"
		);

		let history = self.history.apply(&tr, &self.config);
		let mut selection = tr.selection();
		selection.clamp(tr.doc.len_chars());
		trace!(
			len = tr.doc.len_chars(),
			changed = !tr.changes().is_empty(),
			done = history.done().len(),
			undone = history.undone().len(),
			"transaction applied"
		);

		Self {
			doc: tr.doc,
			selection,
			history,
			config: self.config,
		}
	}
}
