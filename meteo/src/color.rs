//! Colors of rendered shapes.

use serde::{Deserialize, Serialize};

use crate::error::MeteoError;

/// Color representation.
///
/// Serialized as a `#RRGGBBAA` string.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl TryFrom<String> for Color {
    type Error = MeteoError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_hex(&value)
            .ok_or_else(|| MeteoError::Config(format!("invalid color {value:?}")))
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl Color {
    /// Black color: `#000000FF`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Flat light gray used to fill land polygons: `#C8C8C8FF`
    pub const LAND: Color = Color::rgb(200, 200, 200);
    /// Blue used for the globe backdrop: `#40A4DFFF`
    pub const WATER: Color = Color::rgb(64, 164, 223);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Converts the color into u8 array (RGBA).
    pub fn to_u8_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Converts the color into HEX8 string: `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parses a color from HEX6 (`#RRGGBB`) or HEX8 (`#RRGGBBAA`) string.
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        if hex_string.len() != 7 && hex_string.len() != 9 || !hex_string.starts_with('#') {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| {
            hex_string
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        };

        let r = channel(1..3)?;
        let g = channel(3..5)?;
        let b = channel(5..7)?;
        let a = if hex_string.len() == 9 {
            channel(7..9)?
        } else {
            255
        };

        Some(Self { r, g, b, a })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let color = Color::try_from_hex("#40A4DF").expect("valid color");
        assert_eq!(color, Color::WATER);
        assert_eq!(color.to_hex(), "#40A4DFFF");
        assert_eq!(Color::try_from_hex("#C8C8C880"), Some(Color::rgba(200, 200, 200, 128)));
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert_eq!(Color::try_from_hex("C8C8C8"), None);
        assert_eq!(Color::try_from_hex("#C8C8"), None);
        assert_eq!(Color::try_from_hex("#GG0000"), None);
        assert_eq!(Color::try_from_hex("#ÿÿÿ"), None);
    }

    #[test]
    fn deserializes_only_valid_hex() {
        let color: Color = serde_json::from_str(r##""#C8C8C8""##).expect("valid color");
        assert_eq!(color, Color::LAND);
        assert!(serde_json::from_str::<Color>(r#""grey""#).is_err());
    }
}
