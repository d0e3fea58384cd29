//! Versioned editing: deep-merge patches, reversible history, undo/redo.

pub mod engine;
pub mod entry;
pub mod merge;
pub mod store;

pub use engine::{DeckPatch, EditEngine, HistoryOutcome};
pub use entry::{HistoryEntry, Operation, Snapshot};
pub use merge::deep_merge;
pub use store::{DeckCommit, DeckStore, HistoryMark, MemoryStore};
