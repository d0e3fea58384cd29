//! Deck rendering and export.
//!
//! The pipeline runs in three stages: layout composition (deck snapshot
//! to canvas document), package writing (canvas document to PPTX bytes),
//! and optional conversion to derived formats (PDF, per-page PNG) via
//! external tools. Export operates on an owned deck snapshot and never
//! touches the store.

pub mod canvas;
pub mod convert;
pub mod layout;
pub mod media;
pub mod pptx;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::common::id::new_id;
use crate::deck::Deck;
pub use layout::Composer;
pub use pptx::write_package;

/// Requested export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pptx,
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }
}

/// What an export produced: a single file, or one image per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportArtifact {
    File(PathBuf),
    Pages(Vec<PathBuf>),
}

/// Renders decks and materialises export artifacts on disk.
pub struct Exporter {
    composer: Composer,
    output_dir: PathBuf,
}

impl Exporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            composer: Composer::new(),
            output_dir: output_dir.into(),
        }
    }

    /// Render a deck straight to PPTX bytes without touching disk.
    pub async fn render_pptx(&self, deck: &Deck) -> Result<Vec<u8>> {
        let doc = self.composer.compose(deck).await;
        log::debug!(
            "writing package for deck {}: {} pages, {} media assets",
            deck.id,
            doc.pages.len(),
            doc.media.len()
        );
        pptx::write_package(&doc)
    }

    /// Export a deck snapshot in the requested format.
    ///
    /// Intermediate files (the PPTX behind a PDF export, the PDF behind
    /// a PNG export) are removed whether the conversion succeeds or not.
    pub async fn export(&self, deck: &Deck, format: ExportFormat) -> Result<ExportArtifact> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let stem = format!("{}_{}", deck.id, new_id());
        let pptx_path = self.output_dir.join(format!("{stem}.pptx"));
        let bytes = self.render_pptx(deck).await?;
        tokio::fs::write(&pptx_path, &bytes).await?;

        if format == ExportFormat::Pptx {
            return Ok(ExportArtifact::File(pptx_path));
        }

        let pdf_path = self.output_dir.join(format!("{stem}.pdf"));
        let converted = convert::pptx_to_pdf(&pptx_path, &pdf_path).await;
        let _ = tokio::fs::remove_file(&pptx_path).await;
        converted?;

        if format == ExportFormat::Pdf {
            return Ok(ExportArtifact::File(pdf_path));
        }

        let image_dir = self.output_dir.join(format!("{stem}_images"));
        let pages = convert::pdf_to_images(&pdf_path, &image_dir).await;
        let _ = tokio::fs::remove_file(&pdf_path).await;
        Ok(ExportArtifact::Pages(pages?))
    }
}
