//! The canvas document: a format-neutral description of rendered pages.
//!
//! Layout composition produces a `CanvasDoc` and the package writer
//! consumes nothing else, so placement rules can be tested without
//! parsing any output format. All positions and sizes are in inches on
//! the fixed 13.333 x 7.5 canvas; font sizes are in points.

use crate::common::RGBColor;
use crate::render::media::{ImageFormat, ResolvedImage};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Geometry presets for drawn shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    RoundedRectangle,
    Ellipse,
}

/// A positioned run of text.
#[derive(Debug, Clone)]
pub struct TextBox {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub size: f64,
    pub bold: bool,
    pub color: RGBColor,
    pub align: Align,
}

/// Text drawn inside a shape, vertically centred.
#[derive(Debug, Clone)]
pub struct ShapeLabel {
    pub text: String,
    pub size: f64,
    pub bold: bool,
    pub color: RGBColor,
}

/// A filled and/or outlined shape.
#[derive(Debug, Clone)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Option<RGBColor>,
    pub outline: Option<RGBColor>,
    /// Fill transparency, 0.0 (opaque) to 1.0 (invisible).
    pub transparency: f64,
    pub label: Option<ShapeLabel>,
}

/// An embedded image, referencing the document media table.
#[derive(Debug, Clone)]
pub struct Picture {
    pub media: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub enum Element {
    Text(TextBox),
    Shape(Shape),
    Picture(Picture),
}

/// One rendered page: background fill, optional document font, and the
/// elements in paint order.
#[derive(Debug, Clone)]
pub struct Page {
    pub background: RGBColor,
    pub font: Option<String>,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(background: RGBColor, font: Option<String>) -> Self {
        Self {
            background,
            font,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Count of text elements, shapes included when labelled.
    pub fn text_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| match e {
                Element::Text(_) => true,
                Element::Shape(s) => s.label.is_some(),
                Element::Picture(_) => false,
            })
            .count()
    }
}

/// One image payload shared by its embedding pages.
#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

/// A fully composed document: pages plus the media they reference.
#[derive(Debug, Clone, Default)]
pub struct CanvasDoc {
    pub pages: Vec<Page>,
    pub media: Vec<MediaAsset>,
}

impl CanvasDoc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image payload and return its media index.
    pub fn add_media(&mut self, image: ResolvedImage) -> usize {
        self.media.push(MediaAsset {
            data: image.data,
            format: image.format,
        });
        self.media.len() - 1
    }
}
