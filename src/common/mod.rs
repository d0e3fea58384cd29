//! Common types and utilities shared across the deck model, the edit
//! engine, and the rendering pipeline.

// Submodule declarations
pub mod error;
pub mod id;
pub mod style;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use style::RGBColor;
