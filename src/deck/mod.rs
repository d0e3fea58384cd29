//! Deck model: the versioned presentation document.
//!
//! A `Deck` holds an ordered slide sequence plus metadata and a version
//! counter that increases by exactly one on every structural or content
//! mutation. Decks are mutated only through the edit engine
//! ([`crate::history::EditEngine`]); the accessors here never fail except
//! for "slide id not found", which callers map to a not-found condition.

pub mod slide;
pub mod theme;

pub use slide::{Slide, SlideContent, SlideStyle};
pub use theme::{ResolvedTheme, Theme};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::id::new_id;

/// Default title for a deck created without one.
pub const DEFAULT_TITLE: &str = "Untitled presentation";

/// Deck lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckStatus {
    Draft,
    Published,
    Archived,
}

/// The versioned presentation document: ordered slides plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub slides: Vec<Slide>,
    pub status: DeckStatus,
    /// Monotonically increasing; starts at 1, +1 per mutation, never
    /// decreases (undo/redo restorations bump it too).
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_parameters: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    /// Create a new empty draft deck at version 1.
    pub fn new(owner_id: &str, title: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            owner_id: owner_id.to_string(),
            title: title.unwrap_or(DEFAULT_TITLE).to_string(),
            slides: Vec::new(),
            status: DeckStatus::Draft,
            version: 1,
            generation_prompt: None,
            generation_parameters: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a slide by id.
    pub fn slide(&self, slide_id: &str) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == slide_id)
    }

    /// Position of a slide within the deck.
    pub fn slide_index(&self, slide_id: &str) -> Option<usize> {
        self.slides.iter().position(|s| s.id == slide_id)
    }

    /// Atomically swap in a new slide list.
    ///
    /// The old Vec is replaced, never mutated in place, so snapshots taken
    /// by history entries stay structurally independent of later edits.
    pub(crate) fn replace_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
    }

    /// Bump the version counter and refresh `updated_at`.
    pub(crate) fn bump_version(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide::{BodyContent, SlideContent};

    fn sample_slide(id: &str) -> Slide {
        let mut s = Slide::draft(SlideContent::Content(BodyContent {
            title: "t".into(),
            bullets: None,
            text: None,
        }));
        s.id = id.into();
        s
    }

    #[test]
    fn test_new_deck_starts_at_version_one() {
        let deck = Deck::new("owner", None);
        assert_eq!(deck.version, 1);
        assert_eq!(deck.title, DEFAULT_TITLE);
        assert_eq!(deck.status, DeckStatus::Draft);
        assert!(deck.slides.is_empty());
    }

    #[test]
    fn test_slide_lookup() {
        let mut deck = Deck::new("owner", Some("d"));
        deck.replace_slides(vec![sample_slide("a"), sample_slide("b")]);
        assert_eq!(deck.slide("b").map(|s| s.id.as_str()), Some("b"));
        assert_eq!(deck.slide_index("a"), Some(0));
        assert!(deck.slide("missing").is_none());
    }

    #[test]
    fn test_bump_version_monotonic() {
        let mut deck = Deck::new("owner", None);
        let before = deck.version;
        deck.bump_version();
        assert_eq!(deck.version, before + 1);
    }

    #[test]
    fn test_serde_field_casing() {
        let deck = Deck::new("owner-1", Some("My deck"));
        let v = serde_json::to_value(&deck).unwrap();
        assert_eq!(v["ownerId"], "owner-1");
        assert_eq!(v["status"], "draft");
        assert!(v.get("generationPrompt").is_none());
    }
}
