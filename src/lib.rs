//! Longan - a versioned slide-deck document engine
//!
//! This library models presentation decks as versioned documents, tracks
//! every edit as a reversible history entry, and renders decks onto a
//! fixed 13.333" x 7.5" canvas for export as PPTX, PDF, or page images.
//!
//! # Features
//!
//! - **Deck model**: eleven typed slide layouts with per-slide theme
//!   overrides, tolerant of missing optional fields
//! - **Edit engine**: partial updates via recursive JSON merge, one
//!   version bump per mutation, optimistic concurrency
//! - **Undo/redo**: linear per-deck history with before/after snapshots;
//!   any fresh edit invalidates the redo tail
//! - **Rendering**: deterministic fixed-coordinate layout composition,
//!   in-memory PPTX package writing, external conversion to PDF and PNG
//!
//! # Example - Editing a deck
//!
//! ```
//! use longan::deck::Slide;
//! use longan::deck::slide::{BodyContent, SlideContent};
//! use longan::history::{EditEngine, MemoryStore};
//! use serde_json::json;
//!
//! # fn main() -> longan::Result<()> {
//! let engine = EditEngine::new(MemoryStore::new());
//! let deck = engine.create_deck("owner-1", Some("Quarterly review"))?;
//!
//! let deck = engine.add_slide(
//!     &deck.id,
//!     Slide::draft(SlideContent::Content(BodyContent {
//!         title: "Agenda".into(),
//!         bullets: Some(vec!["Results".into()]),
//!         text: None,
//!     })),
//!     None,
//! )?;
//!
//! // Partial update: merges into the existing payload
//! let slide_id = deck.slides[0].id.clone();
//! engine.update_slide(
//!     &deck.id,
//!     &slide_id,
//!     json!({"content": {"bullets": ["Results", "Outlook"]}}),
//! )?;
//!
//! // Every mutation is reversible
//! engine.undo(&deck.id)?;
//! engine.redo(&deck.id)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Exporting a deck
//!
//! ```no_run
//! use longan::render::{ExportFormat, Exporter};
//!
//! # async fn export(deck: longan::deck::Deck) -> longan::Result<()> {
//! let exporter = Exporter::new("exports");
//! let artifact = exporter.export(&deck, ExportFormat::Pdf).await?;
//! println!("exported: {artifact:?}");
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod deck;
pub mod history;
pub mod render;

pub use common::{Error, Result};
pub use deck::{Deck, Slide};
pub use history::{EditEngine, MemoryStore};
pub use render::{ExportFormat, Exporter};
