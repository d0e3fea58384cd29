//! The edit engine: every deck mutation flows through here.
//!
//! Each public operation is a short, synchronous, single-deck transaction:
//! read current state, compute the new state, commit atomically through
//! the store together with its history bookkeeping. Mutating operations
//! purge the redo tail (all undone entries for the deck) before recording
//! their own entry, which keeps the history a single linear timeline.

use serde_json::Value;

use crate::common::id::new_id;
use crate::common::{Error, Result};
use crate::deck::slide::slide_from_value;
use crate::deck::{Deck, DeckStatus, Slide};
use crate::history::entry::{HistoryEntry, Operation, Snapshot};
use crate::history::merge::deep_merge;
use crate::history::store::{DeckCommit, DeckStore, HistoryMark};

/// Partial top-level deck update.
#[derive(Debug, Clone, Default)]
pub struct DeckPatch {
    pub title: Option<String>,
    pub slides: Option<Vec<Slide>>,
    pub status: Option<DeckStatus>,
}

/// Result of an undo/redo request.
///
/// Running out of history is an expected terminal state, not an error:
/// callers get `Exhausted` rather than an `Err`.
#[derive(Debug, Clone)]
pub enum HistoryOutcome {
    /// The entry was applied; carries its description and the deck state
    /// after restoration.
    Applied { description: String, deck: Deck },
    /// Nothing left to undo (or redo).
    Exhausted,
}

impl HistoryOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, HistoryOutcome::Applied { .. })
    }
}

/// Edit engine over a persistence collaborator.
pub struct EditEngine<S: DeckStore> {
    store: S,
}

impl<S: DeckStore> EditEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new empty draft deck at version 1. Creation records no
    /// history entry; there is nothing to undo back to.
    pub fn create_deck(&self, owner_id: &str, title: Option<&str>) -> Result<Deck> {
        let deck = Deck::new(owner_id, title);
        self.store.insert_deck(deck.clone())?;
        Ok(deck)
    }

    /// Fetch a deck without mutating anything.
    pub fn get_deck(&self, deck_id: &str) -> Result<Deck> {
        self.store.load_deck(deck_id)
    }

    /// Replace top-level deck fields.
    pub fn update_deck(&self, deck_id: &str, patch: DeckPatch) -> Result<Deck> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        let before = Snapshot::deck(Some(deck.title.clone()), deck.slides.clone());

        let described = patch
            .title
            .clone()
            .unwrap_or_else(|| "properties".to_string());
        if let Some(title) = patch.title {
            deck.title = title;
        }
        if let Some(slides) = patch.slides {
            deck.replace_slides(slides);
        }
        if let Some(status) = patch.status {
            deck.status = status;
        }
        deck.bump_version();

        let after = Snapshot::deck(Some(deck.title.clone()), deck.slides.clone());
        let record = HistoryEntry::new(
            deck_id,
            Operation::UpdateDeck,
            format!("Updated deck: {described}"),
            Some(before),
            Some(after),
            None,
        );

        self.commit_mutation(deck.clone(), expected, record)?;
        Ok(deck)
    }

    /// Insert a slide, assigning a fresh id if the draft has none.
    ///
    /// `position` is clamped to `[0, len]`; absent or past-the-end means
    /// append.
    pub fn add_slide(&self, deck_id: &str, mut draft: Slide, position: Option<i64>) -> Result<Deck> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        if draft.id.is_empty() {
            draft.id = new_id();
        }

        let mut slides = deck.slides.clone();
        let index = match position {
            None => slides.len(),
            Some(p) => (p.max(0) as usize).min(slides.len()),
        };
        slides.insert(index, draft.clone());
        deck.replace_slides(slides);
        deck.bump_version();

        let record = HistoryEntry::new(
            deck_id,
            Operation::AddSlide,
            format!("Added slide at position {}", index + 1),
            None,
            Some(Snapshot::slide(draft.clone())),
            Some(draft.id),
        );

        self.commit_mutation(deck.clone(), expected, record)?;
        Ok(deck)
    }

    /// Apply a partial update to one slide.
    ///
    /// The patch merges recursively key-wise: objects merge, everything
    /// else (arrays included) is replaced wholesale. The merged result
    /// must still satisfy the typed content contract or the patch is
    /// rejected with the deck left unchanged. The slide id is preserved
    /// regardless of the patch.
    pub fn update_slide(&self, deck_id: &str, slide_id: &str, patch: Value) -> Result<Slide> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        let index = deck
            .slide_index(slide_id)
            .ok_or_else(|| Error::SlideNotFound {
                deck_id: deck_id.to_string(),
                slide_id: slide_id.to_string(),
            })?;
        let original = deck.slides[index].clone();

        let original_value = serde_json::to_value(&original)
            .map_err(|e| Error::InvalidContent(e.to_string()))?;
        let mut merged_value = deep_merge(&original_value, &patch);
        // Slide ids are the addressing key for partial updates and never
        // change through a patch.
        if let Some(obj) = merged_value.as_object_mut() {
            obj.insert("id".to_string(), Value::String(original.id.clone()));
        }
        let merged = slide_from_value(merged_value)?;

        // Rebuild the list so snapshots held by earlier history entries
        // stay structurally independent.
        let mut slides = deck.slides.clone();
        slides[index] = merged.clone();
        deck.replace_slides(slides);
        deck.bump_version();

        let record = HistoryEntry::new(
            deck_id,
            Operation::EditSlide,
            format!("Edited slide {slide_id}"),
            Some(Snapshot::slide(original)),
            Some(Snapshot::slide(merged.clone())),
            Some(slide_id.to_string()),
        );

        self.commit_mutation(deck, expected, record)?;
        Ok(merged)
    }

    /// Remove the first slide whose id matches.
    pub fn delete_slide(&self, deck_id: &str, slide_id: &str) -> Result<Deck> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        let index = deck
            .slide_index(slide_id)
            .ok_or_else(|| Error::SlideNotFound {
                deck_id: deck_id.to_string(),
                slide_id: slide_id.to_string(),
            })?;

        let mut slides = deck.slides.clone();
        let removed = slides.remove(index);
        deck.replace_slides(slides);
        deck.bump_version();

        let record = HistoryEntry::new(
            deck_id,
            Operation::DeleteSlide,
            "Deleted slide",
            Some(Snapshot::slide(removed)),
            None,
            Some(slide_id.to_string()),
        );

        self.commit_mutation(deck.clone(), expected, record)?;
        Ok(deck)
    }

    /// Reorder a slide to a new position (clamped to the valid range).
    pub fn move_slide(&self, deck_id: &str, slide_id: &str, position: i64) -> Result<Deck> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        let index = deck
            .slide_index(slide_id)
            .ok_or_else(|| Error::SlideNotFound {
                deck_id: deck_id.to_string(),
                slide_id: slide_id.to_string(),
            })?;

        let before = Snapshot::deck(None, deck.slides.clone());

        let mut slides = deck.slides.clone();
        let slide = slides.remove(index);
        let target = (position.max(0) as usize).min(slides.len());
        slides.insert(target, slide);
        deck.replace_slides(slides);
        deck.bump_version();

        let record = HistoryEntry::new(
            deck_id,
            Operation::MoveSlide,
            format!("Moved slide to position {}", target + 1),
            Some(before),
            Some(Snapshot::deck(None, deck.slides.clone())),
            Some(slide_id.to_string()),
        );

        self.commit_mutation(deck.clone(), expected, record)?;
        Ok(deck)
    }

    /// Install slides produced by the generation collaborator.
    ///
    /// Treated as an ordinary updateDeck-class mutation with no before
    /// state; slides lacking an id are assigned one.
    pub fn install_generated(
        &self,
        deck_id: &str,
        title: Option<String>,
        mut slides: Vec<Slide>,
        prompt: Option<String>,
        parameters: Option<Value>,
    ) -> Result<Deck> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        for slide in &mut slides {
            if slide.id.is_empty() {
                slide.id = new_id();
            }
        }

        if let Some(title) = title {
            deck.title = title;
        }
        deck.replace_slides(slides);
        deck.generation_prompt = prompt;
        deck.generation_parameters = parameters;
        deck.bump_version();

        let record = HistoryEntry::new(
            deck_id,
            Operation::Generate,
            format!("Generated {} slides", deck.slides.len()),
            None,
            Some(Snapshot::deck(Some(deck.title.clone()), deck.slides.clone())),
            None,
        );

        self.commit_mutation(deck.clone(), expected, record)?;
        Ok(deck)
    }

    /// Undo the most recent live operation.
    pub fn undo(&self, deck_id: &str) -> Result<HistoryOutcome> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        let Some(entry) = self.store.latest_live_entry(deck_id)? else {
            return Ok(HistoryOutcome::Exhausted);
        };

        if let Some(before) = &entry.before_state {
            apply_snapshot(&mut deck, before);
            deck.bump_version();
        }

        self.store.commit(DeckCommit {
            deck: deck.clone(),
            expected_version: expected,
            record: None,
            purge_undone: false,
            mark: Some(HistoryMark {
                entry_id: entry.id.clone(),
                is_undone: true,
                undone_at: Some(chrono::Utc::now()),
            }),
        })?;

        Ok(HistoryOutcome::Applied {
            description: entry.description,
            deck,
        })
    }

    /// Redo the most recently undone operation.
    pub fn redo(&self, deck_id: &str) -> Result<HistoryOutcome> {
        let mut deck = self.store.load_deck(deck_id)?;
        let expected = deck.version;

        let Some(entry) = self.store.latest_undone_entry(deck_id)? else {
            return Ok(HistoryOutcome::Exhausted);
        };

        if let Some(after) = &entry.after_state {
            apply_snapshot(&mut deck, after);
            deck.bump_version();
        }

        self.store.commit(DeckCommit {
            deck: deck.clone(),
            expected_version: expected,
            record: None,
            purge_undone: false,
            mark: Some(HistoryMark {
                entry_id: entry.id.clone(),
                is_undone: false,
                undone_at: None,
            }),
        })?;

        Ok(HistoryOutcome::Applied {
            description: entry.description,
            deck,
        })
    }

    /// History entries newest-first, capped at `limit`. Never mutates
    /// undo flags.
    pub fn history(&self, deck_id: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        self.store.history(deck_id, limit)
    }

    /// Commit a mutating operation: redo-tail purge + record + new state,
    /// all-or-nothing.
    fn commit_mutation(&self, deck: Deck, expected: u64, record: HistoryEntry) -> Result<()> {
        self.store.commit(DeckCommit {
            deck,
            expected_version: expected,
            record: Some(record),
            purge_undone: true,
            mark: None,
        })
    }
}

/// Restore deck state from a snapshot.
///
/// Deck-level snapshots replace the slide list (and title when captured).
/// Slide-level snapshots restore that one slide by id, re-appending it if
/// it no longer exists in the deck.
fn apply_snapshot(deck: &mut Deck, snapshot: &Snapshot) {
    match snapshot {
        Snapshot::Deck { title, slides } => {
            deck.replace_slides(slides.clone());
            if let Some(title) = title {
                deck.title = title.clone();
            }
        }
        Snapshot::Slide(slide) => {
            let mut slides = deck.slides.clone();
            match slides.iter().position(|s| s.id == slide.id) {
                Some(i) => slides[i] = (**slide).clone(),
                None => slides.push((**slide).clone()),
            }
            deck.replace_slides(slides);
        }
    }
}
