//! Transactional editing on top of the diagram model.
//!
//! Edits are expressed as [`Command`]s, each of which can be applied to a
//! diagram and later inverted to recover the previous state exactly,
//! including node and edge IDs. Commands are owned by a [`History`], which
//! provides linear undo/redo with time-boxed coalescing of consecutive
//! moves. The [`Editor`] sits on top of both and maps user-level gestures
//! onto commands according to the editing policy: structurally invalid
//! gestures are declined without error and without touching the history.

/// Deletions touching more than this many nodes are recorded as a whole-graph
/// replacement instead of an itemized removal.
pub const REPLACE_THRESHOLD: usize = 128;

pub(crate) mod command;
pub use command::*;

pub(crate) mod history;
pub use history::*;

pub(crate) mod editor;
pub use editor::*;
