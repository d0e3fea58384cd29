use std::fmt;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the
/// range 0-255.
///
/// # Examples
///
/// ```rust
/// use longan::common::RGBColor;
///
/// let red = RGBColor::new(255, 0, 0);
/// let blue = RGBColor::from_hex("#0000FF").unwrap();
/// let white = RGBColor::from_hex("fff").unwrap(); // shorthand expands
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse an RGB color from a hex string.
    ///
    /// Accepts 6-digit (`"1a365d"`, `"#1a365d"`) and 3-digit shorthand
    /// (`"fff"`) forms; shorthand expands by doubling each digit.
    /// Returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');

        // Lengths below are byte counts; multibyte input must not reach
        // the slicing.
        if !hex.is_ascii() {
            return None;
        }

        let expanded;
        let hex = if hex.len() == 3 {
            let mut s = String::with_capacity(6);
            for c in hex.chars() {
                s.push(c);
                s.push(c);
            }
            expanded = s;
            expanded.as_str()
        } else {
            hex
        };

        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::new(r, g, b))
    }

    /// Convert to an uppercase hex string (without # prefix), the form
    /// `srgbClr` attributes expect.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}
