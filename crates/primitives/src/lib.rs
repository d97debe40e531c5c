//! Core types for text editing: ranges, selections, and change sets.

/// Text range types: char indices and anchor/head ranges.
pub mod range;
/// Selection types for single and multi-cursor editing.
pub mod selection;
/// Change sets and transactions.
pub mod transaction;

pub use range::{CharIdx, CharLen, Direction, Range};
pub use ropey::{Rope, RopeSlice};
pub use selection::Selection;
pub use transaction::{Bias, Change, ChangeError, ChangeSet, Operation, Tendril, Transaction};
