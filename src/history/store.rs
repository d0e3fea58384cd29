//! Store boundary for decks and their history.
//!
//! The engine never talks to a database directly: it computes a new deck
//! state plus the history bookkeeping that must land with it, and hands
//! the whole thing to a [`DeckStore`] as one atomic commit. The version
//! counter is the optimistic-concurrency token; a commit carrying a stale
//! `expected_version` must be rejected so the caller can retry against
//! fresh state.
//!
//! [`MemoryStore`] is the reference implementation and the test harness.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::common::{Error, Result};
use crate::deck::Deck;
use crate::history::entry::HistoryEntry;

/// Flag update applied to one history entry during undo/redo.
#[derive(Debug, Clone)]
pub struct HistoryMark {
    pub entry_id: String,
    pub is_undone: bool,
    pub undone_at: Option<DateTime<Utc>>,
}

/// Everything one engine operation must persist, applied atomically:
/// either the full `{deck update, history entry, redo-tail purge, flag
/// mark}` sequence commits, or none of it does.
#[derive(Debug, Clone)]
pub struct DeckCommit {
    /// New deck state (version already bumped by the engine).
    pub deck: Deck,
    /// Version the engine read before computing the new state.
    pub expected_version: u64,
    /// History entry to append, for mutating operations.
    pub record: Option<HistoryEntry>,
    /// Redo-tail invalidation: permanently delete all undone entries for
    /// this deck before appending the record.
    pub purge_undone: bool,
    /// Undo/redo flag update.
    pub mark: Option<HistoryMark>,
}

/// Persistence collaborator contract.
pub trait DeckStore: Send + Sync {
    /// Persist a freshly created deck.
    fn insert_deck(&self, deck: Deck) -> Result<()>;

    /// Load a deck by id.
    fn load_deck(&self, deck_id: &str) -> Result<Deck>;

    /// Load a deck by id, verifying ownership.
    fn load_deck_for_owner(&self, deck_id: &str, owner_id: &str) -> Result<Deck> {
        let deck = self.load_deck(deck_id)?;
        if deck.owner_id != owner_id {
            return Err(Error::DeckNotFound(deck_id.to_string()));
        }
        Ok(deck)
    }

    /// Apply one atomic commit.
    fn commit(&self, commit: DeckCommit) -> Result<()>;

    /// History entries for a deck, newest-first, capped at `limit`.
    fn history(&self, deck_id: &str, limit: usize) -> Result<Vec<HistoryEntry>>;

    /// Most recent entry with `is_undone = false` (undo candidate),
    /// tie-broken by latest `created_at`.
    fn latest_live_entry(&self, deck_id: &str) -> Result<Option<HistoryEntry>>;

    /// Most recently undone entry (redo candidate), tie-broken by latest
    /// `undone_at`.
    fn latest_undone_entry(&self, deck_id: &str) -> Result<Option<HistoryEntry>>;
}

#[derive(Default)]
struct MemoryInner {
    decks: HashMap<String, Deck>,
    history: Vec<HistoryEntry>,
}

/// In-memory store with compare-and-swap on the version counter.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeckStore for MemoryStore {
    fn insert_deck(&self, deck: Deck) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.decks.insert(deck.id.clone(), deck);
        Ok(())
    }

    fn load_deck(&self, deck_id: &str) -> Result<Deck> {
        let inner = self.inner.lock();
        inner
            .decks
            .get(deck_id)
            .cloned()
            .ok_or_else(|| Error::DeckNotFound(deck_id.to_string()))
    }

    fn commit(&self, commit: DeckCommit) -> Result<()> {
        let mut inner = self.inner.lock();

        let deck_id = commit.deck.id.clone();
        let current = inner
            .decks
            .get(&deck_id)
            .ok_or_else(|| Error::DeckNotFound(deck_id.clone()))?;
        if current.version != commit.expected_version {
            return Err(Error::VersionConflict {
                deck_id,
                expected: commit.expected_version,
                actual: current.version,
            });
        }

        if commit.purge_undone {
            inner
                .history
                .retain(|e| e.deck_id != deck_id || !e.is_undone);
        }

        if let Some(mark) = commit.mark {
            if let Some(entry) = inner.history.iter_mut().find(|e| e.id == mark.entry_id) {
                entry.is_undone = mark.is_undone;
                entry.undone_at = mark.undone_at;
            }
        }

        if let Some(record) = commit.record {
            inner.history.push(record);
        }

        inner.decks.insert(deck_id, commit.deck);
        Ok(())
    }

    fn history(&self, deck_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let inner = self.inner.lock();
        Ok(inner
            .history
            .iter()
            .rev()
            .filter(|e| e.deck_id == deck_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn latest_live_entry(&self, deck_id: &str) -> Result<Option<HistoryEntry>> {
        let inner = self.inner.lock();
        Ok(inner
            .history
            .iter()
            .filter(|e| e.deck_id == deck_id && !e.is_undone)
            .max_by_key(|e| e.created_at)
            .cloned())
    }

    fn latest_undone_entry(&self, deck_id: &str) -> Result<Option<HistoryEntry>> {
        let inner = self.inner.lock();
        Ok(inner
            .history
            .iter()
            .filter(|e| e.deck_id == deck_id && e.is_undone)
            .max_by_key(|e| e.undone_at)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::Operation;

    #[test]
    fn test_commit_rejects_stale_version() {
        let store = MemoryStore::new();
        let deck = Deck::new("o", None);
        let deck_id = deck.id.clone();
        store.insert_deck(deck.clone()).unwrap();

        let mut stale = deck.clone();
        stale.version = 5;
        let err = store
            .commit(DeckCommit {
                deck: stale,
                expected_version: 3,
                record: None,
                purge_undone: false,
                mark: None,
            })
            .unwrap_err();
        assert!(matches!(err, Error::VersionConflict { .. }));

        // Original deck untouched
        assert_eq!(store.load_deck(&deck_id).unwrap().version, 1);
    }

    #[test]
    fn test_purge_removes_only_undone_entries() {
        let store = MemoryStore::new();
        let deck = Deck::new("o", None);
        let deck_id = deck.id.clone();
        store.insert_deck(deck.clone()).unwrap();

        let live = HistoryEntry::new(&deck_id, Operation::AddSlide, "a", None, None, None);
        let mut undone = HistoryEntry::new(&deck_id, Operation::EditSlide, "b", None, None, None);
        undone.is_undone = true;
        undone.undone_at = Some(Utc::now());
        let live_id = live.id.clone();

        store
            .commit(DeckCommit {
                deck: deck.clone(),
                expected_version: 1,
                record: Some(live),
                purge_undone: false,
                mark: None,
            })
            .unwrap();
        store
            .commit(DeckCommit {
                deck: deck.clone(),
                expected_version: 1,
                record: Some(undone),
                purge_undone: false,
                mark: None,
            })
            .unwrap();

        store
            .commit(DeckCommit {
                deck,
                expected_version: 1,
                record: None,
                purge_undone: true,
                mark: None,
            })
            .unwrap();

        let entries = store.history(&deck_id, 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, live_id);
    }

    #[test]
    fn test_owner_filter() {
        let store = MemoryStore::new();
        let deck = Deck::new("alice", None);
        let deck_id = deck.id.clone();
        store.insert_deck(deck).unwrap();

        assert!(store.load_deck_for_owner(&deck_id, "alice").is_ok());
        assert!(matches!(
            store.load_deck_for_owner(&deck_id, "mallory"),
            Err(Error::DeckNotFound(_))
        ));
    }
}
