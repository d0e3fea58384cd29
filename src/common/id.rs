//! Identifier generation for decks, slides, and history entries.

use rand::Rng;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Generate a random RFC4122 v4 GUID as raw 16 bytes.
pub fn generate_guid_bytes() -> [u8; 16] {
    let mut bytes = [0u8; 16];
    let mut rng = rand::rng();
    rng.fill(&mut bytes);
    // RFC4122 v4
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;
    bytes
}

/// Generate a random v4 identifier in lowercase hyphenated form,
/// e.g. `3f1e0a9c-5d2b-4c44-9e1a-7b8f0c6d2e51`.
///
/// Slide and deck ids use this form; it matches the identifiers the
/// generation collaborator supplies.
pub fn new_id() -> String {
    let bytes = generate_guid_bytes();
    let mut out = String::with_capacity(36);
    for (i, b) in bytes.iter().enumerate() {
        if matches!(i, 4 | 6 | 8 | 10) {
            out.push('-');
        }
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}
