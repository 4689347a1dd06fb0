//! Tint color parsing for recolor table entries
//!
//! Accepts the color strings users write in `atlas.toml`:
//! - Hex: `#RGB`, `#RRGGBB` (a trailing alpha digit pair is accepted and ignored)
//! - Bare hex without `#`: `91bd59`
//! - Any CSS color understood by lightningcss: `rgb(145 189 89)`, `hsl(...)`, `seagreen`

use image::Rgb;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for tint parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a tint color string into an RGB triple.
///
/// ```
/// use blockatlas::color::parse_tint;
///
/// assert_eq!(parse_tint("#91BD59").unwrap(), image::Rgb([0x91, 0xbd, 0x59]));
/// assert_eq!(parse_tint("3f76e4").unwrap(), image::Rgb([0x3f, 0x76, 0xe4]));
/// assert_eq!(parse_tint("blue").unwrap(), image::Rgb([0, 0, 255]));
/// ```
pub fn parse_tint(s: &str) -> Result<Rgb<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    // `91bd59` style values are common in resource-pack docs
    if matches!(s.len(), 6 | 8) && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return parse_hex(s);
    }

    parse_css_color(s)
}

/// Format a tint as `#rrggbb`
pub fn format_tint(color: Rgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2])
}

fn parse_hex(hex: &str) -> Result<Rgb<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        // #RGB / #RGBA, each digit doubled
        3 | 4 => Ok(Rgb([digits[0] * 17, digits[1] * 17, digits[2] * 17])),
        // #RRGGBB / #RRGGBBAA
        6 | 8 => Ok(Rgb([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit already checked with `is_ascii_hexdigit`
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

fn parse_css_color(s: &str) -> Result<Rgb<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb_color = css_color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgb([rgba.red, rgba.green, rgba.blue])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => Ok(Rgb([
                (rgb.r * 255.0).round() as u8,
                (rgb.g * 255.0).round() as u8,
                (rgb.b * 255.0).round() as u8,
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_six_digits() {
        assert_eq!(parse_tint("#77AB2F").unwrap(), Rgb([0x77, 0xab, 0x2f]));
    }

    #[test]
    fn test_hex_three_digits() {
        assert_eq!(parse_tint("#F80").unwrap(), Rgb([255, 136, 0]));
    }

    #[test]
    fn test_hex_alpha_ignored() {
        assert_eq!(parse_tint("#11223344").unwrap(), Rgb([0x11, 0x22, 0x33]));
        assert_eq!(parse_tint("#1234").unwrap(), Rgb([0x11, 0x22, 0x33]));
    }

    #[test]
    fn test_bare_hex() {
        assert_eq!(parse_tint("619961").unwrap(), Rgb([0x61, 0x99, 0x61]));
    }

    #[test]
    fn test_css_functional_and_named() {
        assert_eq!(parse_tint("rgb(255, 0, 0)").unwrap(), Rgb([255, 0, 0]));
        assert_eq!(parse_tint("lime").unwrap(), Rgb([0, 255, 0]));
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_tint(""), Err(ColorError::Empty));
        assert_eq!(parse_tint("  "), Err(ColorError::Empty));
        assert_eq!(parse_tint("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_tint("#GG0000"), Err(ColorError::InvalidHex('G')));
        assert!(matches!(parse_tint("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_format_tint() {
        assert_eq!(format_tint(Rgb([0x3f, 0x76, 0xe4])), "#3f76e4");
    }
}
