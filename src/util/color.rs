//! Hex color string parsing.

/// Parse a `#RRGGBB` or `#RGB` hex string into normalized RGB components.
///
/// The leading `#` is optional. Three-digit shorthand expands each digit
/// (`#abc` -> `#aabbcc`). Returns `None` for any other shape or for
/// non-hex digits.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => return None,
    };

    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some([
        ((value >> 16) & 0xff) as f32 / 255.0,
        ((value >> 8) & 0xff) as f32 / 255.0,
        (value & 0xff) as f32 / 255.0,
    ])
}

/// Convert a palette of hex strings into RGB triples.
///
/// Unparseable entries are replaced with white and logged, so a bad
/// palette entry degrades the look instead of killing the widget.
#[must_use]
pub fn parse_palette(colors: &[String]) -> Vec<[f32; 3]> {
    colors
        .iter()
        .map(|hex| {
            hex_to_rgb(hex).unwrap_or_else(|| {
                log::warn!("invalid palette color {hex:?}, using white");
                [1.0, 1.0, 1.0]
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hex_white() {
        assert_eq!(hex_to_rgb("#ffffff"), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn shorthand_black() {
        assert_eq!(hex_to_rgb("#000"), Some([0.0, 0.0, 0.0]));
    }

    #[test]
    fn pure_red() {
        assert_eq!(hex_to_rgb("#ff0000"), Some([1.0, 0.0, 0.0]));
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(hex_to_rgb("ff0000"), hex_to_rgb("#ff0000"));
    }

    #[test]
    fn shorthand_expands_digits() {
        // #4af -> #44aaff
        let rgb = hex_to_rgb("#4af").unwrap();
        assert!((rgb[0] - 0x44 as f32 / 255.0).abs() < 1e-6);
        assert!((rgb[1] - 0xaa as f32 / 255.0).abs() < 1e-6);
        assert!((rgb[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_bad_lengths_and_digits() {
        assert_eq!(hex_to_rgb("#ffff"), None);
        assert_eq!(hex_to_rgb(""), None);
        assert_eq!(hex_to_rgb("#zzzzzz"), None);
    }

    #[test]
    fn palette_substitutes_white_for_garbage() {
        let palette = parse_palette(&[
            "#ff0000".to_owned(),
            "nonsense".to_owned(),
        ]);
        assert_eq!(palette, vec![[1.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
    }
}
