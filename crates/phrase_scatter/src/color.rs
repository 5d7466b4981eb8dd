//! RGB colors used to fill rendered phrases.
//!
//! Colors can be built from `#RRGGBB` / `RRGGBB` strings, `0xRRGGBB` integers,
//! or `[r, g, b]` component triples. Only the first six hex digits of a string
//! are considered. The image engine receives colors as `rgb(r,g,b)`.
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ColorSpec", into = "String")
)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse a hex color such as `#FFAA00` or `ffaa00`.
    pub fn from_hex(value: &str) -> Result<Self> {
        let hex = value.trim().trim_start_matches('#');
        let digits: Vec<char> = hex.chars().take(6).collect();
        if digits.len() < 6 {
            return Err(Error::InvalidColor(format!(
                "'{value}' needs six hex digits"
            )));
        }
        let mut channels = [0u8; 3];
        for (channel, pair) in channels.iter_mut().zip(digits.chunks(2)) {
            let pair: String = pair.iter().collect();
            *channel = u8::from_str_radix(&pair, 16)
                .map_err(|_| Error::InvalidColor(format!("'{value}' is not a hex color")))?;
        }
        Ok(Self::rgb(channels[0], channels[1], channels[2]))
    }

    /// Interpret an integer as a hex value, e.g. `0xFF8800`.
    ///
    /// Integers wider than 24 bits keep their six leading hex digits.
    pub fn from_hex_int(value: u64) -> Self {
        let hex = format!("{value:06x}");
        // Six lowercase hex digits are always present and valid here.
        Self::from_hex(&hex).unwrap_or(Self::BLACK)
    }

    /// Build a color from exactly three components in `0..=255`.
    pub fn from_components(components: &[i64]) -> Result<Self> {
        let [r, g, b] = components else {
            return Err(Error::InvalidColor(format!(
                "expected 1 hex value or 3 rgb values, got {} values",
                components.len()
            )));
        };
        let channel = |v: i64| {
            u8::try_from(v)
                .map_err(|_| Error::InvalidColor(format!("component {v} is outside 0..=255")))
        };
        Ok(Self::rgb(channel(*r)?, channel(*g)?, channel(*b)?))
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl From<[u8; 3]> for Color {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_hex()
    }
}

/// Accepted shapes for a color in configuration input.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize), serde(untagged))]
pub enum ColorSpec {
    Hex(String),
    Integer(u64),
    Components(Vec<i64>),
}

impl TryFrom<ColorSpec> for Color {
    type Error = Error;

    fn try_from(spec: ColorSpec) -> Result<Self> {
        match spec {
            ColorSpec::Hex(s) => Color::from_hex(&s),
            ColorSpec::Integer(v) => Ok(Color::from_hex_int(v)),
            ColorSpec::Components(c) => Color::from_components(&c),
        }
    }
}
