//! Unit conversion utilities.
//!
//! The canvas model positions elements in fractional inches; the PPTX
//! writer needs EMUs (English Metric Units, 914,400 per inch) and
//! hundredths of a point for font sizes.

pub const EMUS_PER_INCH: i64 = 914_400;

/// Canvas width in inches (16:9 widescreen).
pub const CANVAS_WIDTH_IN: f64 = 13.333;
/// Canvas height in inches.
pub const CANVAS_HEIGHT_IN: f64 = 7.5;

#[inline]
pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMUS_PER_INCH as f64).round() as i64
}

/// Font size in points to the centipoint value used in `sz` attributes.
#[inline]
pub fn pt_to_centipoint(pt: f64) -> u32 {
    (pt * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches_to_emu() {
        assert_eq!(inches_to_emu(1.0), 914_400);
        assert_eq!(inches_to_emu(7.5), 6_858_000);
        // 13.333 in is not an exact EMU count; rounds down from 13 1/3
        assert_eq!(inches_to_emu(CANVAS_WIDTH_IN), 12_191_695);
    }

    #[test]
    fn test_pt_to_centipoint() {
        assert_eq!(pt_to_centipoint(54.0), 5400);
        assert_eq!(pt_to_centipoint(12.5), 1250);
    }
}
