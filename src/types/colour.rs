//! Colour type, hex parsing, and distance ranking.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PlacerError, Result};

/// A 24-bit RGB colour value.
///
/// The canonical text form is six lowercase hex digits (`ff0000`). There is
/// no alpha channel; transparency is resolved at image-decode time, before
/// tasks exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Accepts exactly six hex digits with an optional `#` prefix, any case.
    /// Anything else is a parse error; shorthand forms are deliberately not
    /// expanded so a task batch cannot smuggle in ambiguous colours.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PlacerError::Parse {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Use exactly six hex digits, e.g. #ff0000".to_string()),
            });
        }

        let r = parse_hex_byte(&hex[0..2])?;
        let g = parse_hex_byte(&hex[2..4])?;
        let b = parse_hex_byte(&hex[4..6])?;
        Ok(Self::rgb(r, g, b))
    }

    /// Canonical six-digit lowercase hex form, without a `#` prefix.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGBA byte form for compositing onto an image buffer (always opaque).
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// Euclidean distance between two colours in RGB space.
///
/// Used purely as a ranking key for nearest-swatch lookup; no perceptual
/// weighting is applied.
pub fn distance(a: Colour, b: Colour) -> f64 {
    let dr = a.r as f64 - b.r as f64;
    let dg = a.g as f64 - b.g as f64;
    let db = a.b as f64 - b.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

impl FromStr for Colour {
    type Err = PlacerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Colour::from_hex(&s).map_err(|e| D::Error::custom(e.to_string()))
    }
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| PlacerError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF0000").unwrap();
        assert_eq!(c, Colour::rgb(255, 0, 0));

        let c = Colour::from_hex("1a1a2e").unwrap();
        assert_eq!(c, Colour::rgb(0x1a, 0x1a, 0x2e));
    }

    #[test]
    fn test_from_hex_rejects_shorthand() {
        assert!(Colour::from_hex("#F00").is_err());
        assert!(Colour::from_hex("#FF000080").is_err());
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGGGGG").is_err());
        assert!(Colour::from_hex("12345").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn test_to_hex_lowercase() {
        assert_eq!(Colour::rgb(255, 0, 170).to_hex(), "ff00aa");
        assert_eq!(format!("{}", Colour::rgb(255, 0, 170)), "#ff00aa");
    }

    #[test]
    fn test_hex_round_trip() {
        let c = Colour::from_hex("3C8A0f").unwrap();
        assert_eq!(Colour::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn test_distance_zero() {
        let c = Colour::rgb(10, 20, 30);
        assert_eq!(distance(c, c), 0.0);
    }

    #[test]
    fn test_distance_orders_candidates() {
        let target = Colour::rgb(250, 0, 0);
        let near = Colour::rgb(255, 0, 0);
        let far = Colour::rgb(0, 0, 255);
        assert!(distance(target, near) < distance(target, far));
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Colour::rgb(1, 2, 3);
        let b = Colour::rgb(200, 100, 50);
        assert_eq!(distance(a, b), distance(b, a));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let c = Colour::rgb(255, 0, 0);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"ff0000\"");

        let back: Colour = serde_json::from_str("\"ff0000\"").unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_serde_rejects_malformed() {
        assert!(serde_json::from_str::<Colour>("\"xyz\"").is_err());
    }
}
