//! PPTX package writer: turns a canvas document into OPC package bytes.

mod package;
mod template;
mod xml;

pub use package::write_package;
