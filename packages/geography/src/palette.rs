//! Region fill colors.
//!
//! Regions may carry an explicit color in their boundary file. Everything
//! else (including regions with no registered boundary) gets a color picked
//! deterministically from [`PALETTE`] by hashing the normalized name, so the
//! same region is always drawn in the same color as the region set grows.

use sha2::{Digest, Sha256};

use crate::normalize_region_name;

/// Fallback palette for regions without an explicit color.
pub const PALETTE: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#ff9da7",
    "#9c755f", "#bab0ac",
];

/// Picks a palette color for `name` from a SHA-256 digest of its normalized
/// form.
#[must_use]
pub fn hashed_color(name: &str) -> &'static str {
    let digest = Sha256::digest(normalize_region_name(name).as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let bucket = u64::from_be_bytes(prefix) % PALETTE.len() as u64;
    #[allow(clippy::cast_possible_truncation)]
    PALETTE[bucket as usize]
}

/// Parses a `#rrggbb` color into its RGB components.
#[must_use]
pub fn parse_hex_color(color: &str) -> Option<[u8; 3]> {
    let digits = color.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    Some([bytes[0], bytes[1], bytes[2]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_entries_are_valid_colors() {
        for color in PALETTE {
            assert!(parse_hex_color(color).is_some(), "bad palette color {color}");
        }
    }

    #[test]
    fn hashed_color_is_deterministic_and_name_normalized() {
        let a = hashed_color("Kabupaten Garut");
        let b = hashed_color("  KABUPATEN   garut");
        assert_eq!(a, b);
        assert!(PALETTE.contains(&a));
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#ff7f0e"), Some([0xff, 0x7f, 0x0e]));
        assert_eq!(parse_hex_color("ff7f0e"), None);
        assert_eq!(parse_hex_color("#ff7f0"), None);
        assert_eq!(parse_hex_color("#gg7f0e"), None);
    }
}
