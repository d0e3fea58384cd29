//! Color and style primitives shared by the deck model and the renderer.

pub mod color;

pub use color::RGBColor;
