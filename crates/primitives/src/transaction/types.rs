use crate::range::{CharIdx, CharLen};

/// Owned inserted text.
pub type Tendril = String;

/// Represents a single text change operation.
///
/// A change describes replacing the text range `[start, end)` with the optional
/// `replacement` text. If `replacement` is [`None`], this represents a deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
	/// The starting character index of the change.
	pub start: CharIdx,
	/// The ending character index of the change (exclusive).
	pub end: CharIdx,
	/// The replacement text, or [`None`] for deletion.
	pub replacement: Option<Tendril>,
}

impl Change {
	/// Creates an insertion of `text` at `pos`.
	pub fn insert(pos: CharIdx, text: impl Into<Tendril>) -> Self {
		Self {
			start: pos,
			end: pos,
			replacement: Some(text.into()),
		}
	}

	/// Creates a deletion of `[start, end)`.
	pub fn delete(start: CharIdx, end: CharIdx) -> Self {
		Self {
			start,
			end,
			replacement: None,
		}
	}

	/// Creates a replacement of `[start, end)` with `text`.
	pub fn replace(start: CharIdx, end: CharIdx, text: impl Into<Tendril>) -> Self {
		Self {
			start,
			end,
			replacement: Some(text.into()),
		}
	}
}

/// Bias determines how positions at change boundaries are mapped.
///
/// When mapping a position through a change, bias determines whether the position
/// moves with insertions or stays before them. When rebasing one change set over
/// another, it decides which side's insertions come first at a shared position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
	/// Stay before insertions at the same location.
	Left,
	/// Move after insertions at the same location.
	Right,
}

/// A text insertion with cached character length.
///
/// Fields are private to enforce the invariant that `char_len` always equals
/// `text.chars().count()`. Construct via [`Insertion::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
	text: Tendril,
	char_len: CharLen,
}

impl Insertion {
	/// Creates a new insertion, computing the character length once.
	#[inline]
	pub fn new(text: Tendril) -> Self {
		let char_len = text.chars().count();
		Self { text, char_len }
	}

	/// Returns true if this insertion is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.char_len == 0
	}

	/// Returns the inserted text.
	#[inline]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Returns the cached character length.
	#[inline]
	pub fn char_len(&self) -> CharLen {
		self.char_len
	}

	/// Appends text from another insertion, updating the cached length.
	pub(super) fn push_str(&mut self, other: &Insertion) {
		self.text.push_str(&other.text);
		self.char_len += other.char_len;
	}

	/// Returns `len` characters starting at character offset `from`.
	pub(super) fn slice(&self, from: CharLen, len: CharLen) -> Tendril {
		debug_assert!(from + len <= self.char_len);
		self.text.chars().skip(from).take(len).collect()
	}
}

/// A single operation in a changeset.
///
/// Operations are the atomic units that make up a `ChangeSet`. They represent
/// basic text transformations: retaining existing text, deleting text, or inserting
/// new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
	/// Retain the next N characters from the source document.
	Retain(CharLen),
	/// Delete the next N characters from the source document.
	Delete(CharLen),
	/// Insert new text at the current position.
	Insert(Insertion),
}

impl Operation {
	/// Length of the operation's own extent: consumed characters for
	/// retain/delete, inserted characters for insert.
	#[inline]
	pub(super) fn span(&self) -> CharLen {
		match self {
			Operation::Retain(n) | Operation::Delete(n) => *n,
			Operation::Insert(ins) => ins.char_len(),
		}
	}
}
