use super::error::ChangeError;
use super::types::{Bias, Change, Insertion, Operation, Tendril};
use crate::range::{CharIdx, CharLen};
use crate::{Rope, RopeSlice};

/// A sequence of operations representing a set of changes to a document.
///
/// ChangeSet uses Operational Transformation (OT) principles to represent document
/// changes as a sequence of retain, delete, and insert operations. This representation
/// enables efficient composition, inversion, rebasing, and position mapping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	/// Sequence of retain/delete/insert operations.
	pub(super) changes: Vec<Operation>,
	/// Length of the source document before changes.
	pub(super) len: usize,
	/// Length of the document after applying changes.
	pub(super) len_after: usize,
}

impl ChangeSet {
	/// Creates an identity changeset covering the given document.
	pub fn new(doc: RopeSlice) -> Self {
		let mut cs = Self::default();
		cs.retain(doc.len_chars());
		cs
	}

	/// Builds a changeset from a list of changes against `doc`.
	///
	/// Changes must be sorted by position, non-overlapping, and within the
	/// document. Text between changes is retained.
	///
	/// # Errors
	/// Returns [`ChangeError`] when a change is inverted, out of bounds, or
	/// overlaps its predecessor.
	pub fn from_changes<I>(doc: RopeSlice, changes: I) -> Result<Self, ChangeError>
	where
		I: IntoIterator<Item = Change>,
	{
		let doc_len = doc.len_chars();
		let mut cs = Self::default();
		let mut last = 0;

		for Change {
			start,
			end,
			replacement,
		} in changes
		{
			if start > end {
				return Err(ChangeError::Inverted { start, end });
			}
			if end > doc_len {
				return Err(ChangeError::OutOfBounds { end, len: doc_len });
			}
			if start < last {
				return Err(ChangeError::Overlapping { start, prev_end: last });
			}

			cs.retain(start - last);
			cs.delete(end - start);
			if let Some(text) = replacement {
				cs.insert(text);
			}
			last = end;
		}

		cs.retain(doc_len - last);
		Ok(cs)
	}

	/// Returns the length of the source document (before changes).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns the length of the document after applying changes.
	pub fn len_after(&self) -> usize {
		self.len_after
	}

	/// Returns true if this changeset leaves every document unchanged.
	pub fn is_empty(&self) -> bool {
		self.changes
			.iter()
			.all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Returns a slice of all operations in this changeset.
	pub fn changes(&self) -> &[Operation] {
		&self.changes
	}

	/// Adds a retain operation, preserving N characters from the source.
	///
	/// Consecutive retain operations are automatically merged.
	pub(crate) fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	/// Adds a delete operation, removing N characters from the source.
	///
	/// Consecutive delete operations are automatically merged.
	pub(crate) fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	/// Adds an insert operation, inserting text at the current position.
	///
	/// Insertions adjacent to the previous insertion (optionally separated by a
	/// delete) are merged, and an insert following a delete is moved in front of
	/// it so the representation stays canonical.
	pub(crate) fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}

		let ins = Insertion::new(text);
		self.len_after += ins.char_len();

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				prev.push_str(&ins);
			}
			[.., last @ Operation::Delete(_)] => {
				let del = std::mem::replace(last, Operation::Insert(ins));
				self.changes.push(del);
			}
			_ => {
				self.changes.push(Operation::Insert(ins));
			}
		}
	}

	/// Applies this changeset to a document, modifying it in place.
	pub fn apply(&self, doc: &mut Rope) {
		if self.is_empty() {
			return;
		}
		debug_assert_eq!(doc.len_chars(), self.len, "changeset applied to wrong document");

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					pos += n;
				}
				Operation::Delete(n) => {
					doc.remove(pos..pos + n);
				}
				Operation::Insert(ins) => {
					doc.insert(pos, ins.text());
					pos += ins.char_len();
				}
			}
		}
	}

	/// Returns a copy of `doc` with this changeset applied.
	pub fn apply_to(&self, doc: &Rope) -> Rope {
		let mut out = doc.clone();
		self.apply(&mut out);
		out
	}

	/// Inverts this changeset to create one that undoes its effects.
	///
	/// `doc` must be the original document (before changes were applied); the
	/// deleted text is recovered from it.
	pub fn invert(&self, doc: &Rope) -> ChangeSet {
		let mut result = ChangeSet::default();

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					result.retain(*n);
					pos += n;
				}
				Operation::Delete(n) => {
					let deleted_text: String = doc.slice(pos..pos + n).chars().collect();
					result.insert(deleted_text);
					pos += n;
				}
				Operation::Insert(ins) => {
					result.delete(ins.char_len());
				}
			}
		}

		debug_assert_eq!(result.len, self.len_after);
		debug_assert_eq!(result.len_after, self.len);
		result
	}

	/// Maps a position through this changeset using the specified bias.
	///
	/// Positions inside a deleted region collapse to the deletion point.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		let mut old_pos = 0;
		let mut new_pos = 0;

		for op in &self.changes {
			if old_pos > pos {
				break;
			}

			match op {
				Operation::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Operation::Insert(ins) => {
					if old_pos == pos && bias == Bias::Left {
						// Stay before the insertion.
					} else {
						new_pos += ins.char_len();
					}
				}
			}
		}

		new_pos + (pos - old_pos)
	}

	/// Composes two changesets into a single equivalent changeset.
	///
	/// The result is equivalent to applying `self` then `other`.
	///
	/// # Debug Assertions
	/// Asserts that `self.len_after == other.len` (the changesets must be compatible).
	pub fn compose(self, other: ChangeSet) -> ChangeSet {
		debug_assert_eq!(self.len_after, other.len);

		let mut result = ChangeSet::default();
		let mut a = OpCursor::new(&self.changes);
		let mut b = OpCursor::new(&other.changes);

		loop {
			match (a.head(), b.head()) {
				(Head::Delete(n), _) => {
					result.delete(n);
					a.advance(n);
				}
				(_, Head::Insert(m)) => {
					result.insert(b.insert_text(m));
					b.advance(m);
				}
				(Head::Done, Head::Done) => break,
				(Head::Done, Head::Retain(m)) => {
					result.retain(m);
					b.advance(m);
				}
				(Head::Done, Head::Delete(m)) => {
					result.delete(m);
					b.advance(m);
				}
				(Head::Retain(n), Head::Done) => {
					result.retain(n);
					a.advance(n);
				}
				(Head::Insert(n), Head::Done) => {
					result.insert(a.insert_text(n));
					a.advance(n);
				}
				(Head::Retain(n), Head::Retain(m)) => {
					let len = n.min(m);
					result.retain(len);
					a.advance(len);
					b.advance(len);
				}
				(Head::Retain(n), Head::Delete(m)) => {
					let len = n.min(m);
					result.delete(len);
					a.advance(len);
					b.advance(len);
				}
				(Head::Insert(n), Head::Retain(m)) => {
					let len = n.min(m);
					result.insert(a.insert_text(len));
					a.advance(len);
					b.advance(len);
				}
				(Head::Insert(n), Head::Delete(m)) => {
					let len = n.min(m);
					a.advance(len);
					b.advance(len);
				}
			}
		}

		result
	}

	/// Rebases this changeset over `other`, a concurrent changeset on the same
	/// source document.
	///
	/// The result applies to the output of `other` and carries the part of
	/// `self` that `other` did not already remove. `bias` orders insertions
	/// made by both sides at the same position: [`Bias::Left`] puts ours first.
	///
	/// For any `a` and `b` over the same document, applying `a` then
	/// `b.map(&a, Bias::Left)` produces the same text as applying `b` then
	/// `a.map(&b, Bias::Right)`.
	pub fn map(&self, other: &ChangeSet, bias: Bias) -> ChangeSet {
		debug_assert_eq!(self.len, other.len);

		let mut result = ChangeSet::default();
		let mut a = OpCursor::new(&self.changes);
		let mut b = OpCursor::new(&other.changes);

		loop {
			match (a.head(), b.head()) {
				(Head::Insert(n), Head::Insert(_)) if bias == Bias::Left => {
					result.insert(a.insert_text(n));
					a.advance(n);
				}
				(_, Head::Insert(m)) => {
					result.retain(m);
					b.advance(m);
				}
				(Head::Insert(n), _) => {
					result.insert(a.insert_text(n));
					a.advance(n);
				}
				(Head::Done, Head::Done) => break,
				(Head::Done, Head::Retain(m)) => {
					result.retain(m);
					b.advance(m);
				}
				(Head::Done, Head::Delete(m)) => {
					b.advance(m);
				}
				(Head::Retain(n), Head::Done) => {
					result.retain(n);
					a.advance(n);
				}
				(Head::Delete(n), Head::Done) => {
					result.delete(n);
					a.advance(n);
				}
				(Head::Retain(n), Head::Retain(m)) => {
					let len = n.min(m);
					result.retain(len);
					a.advance(len);
					b.advance(len);
				}
				(Head::Delete(n), Head::Retain(m)) => {
					let len = n.min(m);
					result.delete(len);
					a.advance(len);
					b.advance(len);
				}
				(Head::Retain(n) | Head::Delete(n), Head::Delete(m)) => {
					let len = n.min(m);
					a.advance(len);
					b.advance(len);
				}
			}
		}

		result
	}
}

/// Remaining extent of the operation under an [`OpCursor`].
#[derive(Debug, Clone, Copy)]
enum Head {
	Retain(CharLen),
	Delete(CharLen),
	Insert(CharLen),
	Done,
}

/// Walks a changeset's operations, allowing each one to be consumed in parts.
struct OpCursor<'a> {
	ops: &'a [Operation],
	idx: usize,
	offset: CharLen,
}

impl<'a> OpCursor<'a> {
	fn new(ops: &'a [Operation]) -> Self {
		Self {
			ops,
			idx: 0,
			offset: 0,
		}
	}

	fn head(&self) -> Head {
		match self.ops.get(self.idx) {
			None => Head::Done,
			Some(op) => {
				let rest = op.span() - self.offset;
				match op {
					Operation::Retain(_) => Head::Retain(rest),
					Operation::Delete(_) => Head::Delete(rest),
					Operation::Insert(_) => Head::Insert(rest),
				}
			}
		}
	}

	fn advance(&mut self, n: CharLen) {
		let Some(op) = self.ops.get(self.idx) else {
			return;
		};
		self.offset += n;
		debug_assert!(self.offset <= op.span());
		if self.offset >= op.span() {
			self.idx += 1;
			self.offset = 0;
		}
	}

	/// Text of the next `n` characters of the current insertion.
	fn insert_text(&self, n: CharLen) -> Tendril {
		match self.ops.get(self.idx) {
			Some(Operation::Insert(ins)) => ins.slice(self.offset, n),
			_ => Tendril::new(),
		}
	}
}

