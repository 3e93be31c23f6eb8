use crate::foundation::error::{LexvisError, LexvisResult};

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Opaque color from three channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> LexvisResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn nibble(c: u8) -> LexvisResult<u8> {
            match c {
                b'0'..=b'9' => Ok(c - b'0'),
                b'a'..=b'f' => Ok(c - b'a' + 10),
                b'A'..=b'F' => Ok(c - b'A' + 10),
                _ => Err(LexvisError::validation(format!(
                    "invalid hex digit '{}'",
                    c as char
                ))),
            }
        }

        let bytes = s.as_bytes();
        let channels: Vec<u8> = match bytes.len() {
            3 | 4 => bytes
                .iter()
                .map(|&c| nibble(c).map(|n| n * 17))
                .collect::<LexvisResult<_>>()?,
            6 | 8 => bytes
                .chunks(2)
                .map(|pair| Ok(nibble(pair[0])? * 16 + nibble(pair[1])?))
                .collect::<LexvisResult<_>>()?,
            n => {
                return Err(LexvisError::validation(format!(
                    "hex color must have 3, 4, 6 or 8 digits, got {n}"
                )));
            }
        };

        Ok(Self {
            r: channels[0],
            g: channels[1],
            b: channels[2],
            a: channels.get(3).copied().unwrap_or(0xff),
        })
    }

    /// `#rrggbb` form used in SVG attributes (alpha is emitted separately).
    pub fn to_hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a `[0, 1]` float.
    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl std::str::FromStr for Color {
    type Err = LexvisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Token highlight palette.
///
/// Each variant is a dark background; [`CodeColor::text`] gives the matching foreground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodeColor {
    /// Keywords.
    Blue,
    /// Literals and operators.
    Green,
    /// Punctuation.
    White,
    /// Identifiers.
    Cyan,
    /// Values.
    Orange,
}

impl CodeColor {
    /// All palette entries, in declaration order.
    pub const ALL: [Self; 5] = [Self::Blue, Self::Green, Self::White, Self::Cyan, Self::Orange];

    /// Background fill.
    pub fn background(self) -> Color {
        match self {
            Self::Blue => Color::rgb(0x26, 0x26, 0x4d),
            Self::Green => Color::rgb(0x26, 0x4d, 0x26),
            Self::White => Color::rgb(0x4d, 0x4d, 0x4d),
            Self::Cyan => Color::rgb(0x26, 0x4d, 0x4d),
            Self::Orange => Color::rgb(0x4d, 0x3e, 0x26),
        }
    }

    /// Foreground text color paired with [`CodeColor::background`].
    pub fn text(self) -> Color {
        match self {
            Self::Blue => Color::rgb(0x5a, 0x7b, 0xa6),
            Self::Green => Color::rgb(0x9b, 0xb4, 0x85),
            Self::White => Color::WHITE,
            Self::Cyan => Color::rgb(0x8f, 0xbc, 0xbb),
            Self::Orange => Color::rgb(0xd0, 0x87, 0x70),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
