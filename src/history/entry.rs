//! History entries: reversible records of deck mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::id::new_id;
use crate::deck::Slide;

/// Kind of mutation a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Generate,
    EditSlide,
    AddSlide,
    DeleteSlide,
    MoveSlide,
    UpdateDeck,
}

/// State captured by a history entry: either the deck-level fields needed
/// to restore slides/title, or a single slide for slide-scoped edits.
///
/// Serialized untagged so persisted snapshots look exactly like the state
/// they capture: a `{"title": ..., "slides": [...]}` object or a plain
/// slide object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Deck {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        slides: Vec<Slide>,
    },
    Slide(Box<Slide>),
}

impl Snapshot {
    /// Deck-level capture of slides (and optionally title).
    pub fn deck(title: Option<String>, slides: Vec<Slide>) -> Self {
        Snapshot::Deck { title, slides }
    }

    /// Single-slide capture.
    pub fn slide(slide: Slide) -> Self {
        Snapshot::Slide(Box::new(slide))
    }
}

/// A reversible record of one mutation, carrying before/after snapshots.
///
/// Entries for a deck form a single linear history: redo is only possible
/// immediately after an undo, and any new edit permanently discards the
/// undone tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub deck_id: String,
    pub operation: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_state: Option<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_state: Option<Snapshot>,
    /// Human-readable description of the operation.
    pub description: String,
    pub is_undone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undone_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(
        deck_id: &str,
        operation: Operation,
        description: impl Into<String>,
        before_state: Option<Snapshot>,
        after_state: Option<Snapshot>,
        slide_id: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            deck_id: deck_id.to_string(),
            operation,
            slide_id,
            before_state,
            after_state,
            description: description.into(),
            is_undone: false,
            undone_at: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::slide::{QuoteContent, SlideContent};

    #[test]
    fn test_snapshot_shapes_on_the_wire() {
        let mut s = Slide::draft(SlideContent::Quote(QuoteContent {
            quote: "q".into(),
            author: None,
            title: None,
        }));
        s.id = "s1".into();

        let deck_snap = Snapshot::deck(Some("T".into()), vec![s.clone()]);
        let v = serde_json::to_value(&deck_snap).unwrap();
        assert!(v.get("slides").is_some());
        assert_eq!(v["title"], "T");

        let slide_snap = Snapshot::slide(s);
        let v = serde_json::to_value(&slide_snap).unwrap();
        // A slide snapshot is the slide object itself, not a wrapper
        assert_eq!(v["type"], "quote");
        assert_eq!(v["id"], "s1");
    }

    #[test]
    fn test_snapshot_untagged_roundtrip() {
        let snap = Snapshot::deck(None, vec![]);
        let v = serde_json::to_value(&snap).unwrap();
        let back: Snapshot = serde_json::from_value(v).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_new_entry_is_live() {
        let e = HistoryEntry::new("d1", Operation::AddSlide, "added", None, None, None);
        assert!(!e.is_undone);
        assert!(e.undone_at.is_none());
        assert_eq!(e.deck_id, "d1");
    }
}
