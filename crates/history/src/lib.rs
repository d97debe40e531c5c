//! Undo/redo history for a text editor.
//!
//! Transactions are recorded as events holding change sets and their
//! inverses. Adjacent transactions with the same user-event tag coalesce
//! within a time window, selection-only moves are tracked separately from
//! content edits, and edits that bypass history rebase the stored events so
//! undo stays correct against the current document.
//!
//! # Architecture
//!
//! ```text
//! EditorState ──apply(EditorTransaction)──► EditorState
//!      │                                        │
//!      └── HistoryState { done, undone } ───────┘
//!               │
//!               └── HistoryBranch ─ Arc<Vec<HistoryEvent>> ─ ChangePair { forward, inverse }
//! ```
//!
//! [`commands`] exposes undo and redo as dispatching commands over an
//! [`EditorState`].

/// Persistent event stacks.
pub mod branch;
/// Undo and redo commands.
pub mod commands;
/// History configuration.
pub mod config;
/// Host editor state and transactions.
pub mod editor;
/// Error types.
pub mod error;
/// History events.
pub mod event;
/// History state transitions.
pub mod state;

pub use branch::HistoryBranch;
pub use config::{HistoryConfig, PartialHistoryConfig};
pub use editor::{EditorState, EditorTransaction, TransactionMeta};
pub use error::{ConfigError, HistoryError, Result};
pub use event::{ChangePair, HistoryEvent};
pub use state::{HistoryState, ItemFilter, PopTarget, Popped};
