//! Color codec
//!
//! Colors are stored as six hex digits without a leading `#`.
//! Both upper and lower case digits are accepted and kept as given.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Returns true iff `s` is exactly six hex digits
#[must_use]
pub fn is_valid_color(s: &str) -> bool {
    s.len() == 6 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Decode a six-digit hex string into its RGB channels
pub fn to_rgb(s: &str) -> Result<(u8, u8, u8)> {
    if !is_valid_color(s) {
        return Err(Error::invalid_color(s));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| Error::invalid_color(s))
    };
    Ok((channel(0)?, channel(2)?, channel(4)?))
}

/// Strip a single leading `#` from a human-facing color value.
///
/// Form fields carry `#rrggbb`; storage never does.
#[must_use]
pub fn strip_marker(s: &str) -> &str {
    s.strip_prefix('#').unwrap_or(s)
}

/// A validated 24-bit color
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Plain white, the fallback fill and raster background
    pub const WHITE_HEX: &'static str = "ffffff";

    /// Validate and wrap a hex string
    pub fn parse(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if is_valid_color(&s) {
            Ok(Self(s))
        } else {
            Err(Error::InvalidColor(s))
        }
    }

    /// White (`ffffff`)
    #[must_use]
    pub fn white() -> Self {
        Self(Self::WHITE_HEX.to_string())
    }

    /// Build from channel values, always lowercase
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(hex::encode([r, g, b]))
    }

    /// Decoded channel values
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        // Construction guarantees six hex digits.
        to_rgb(&self.0).unwrap_or((0xff, 0xff, 0xff))
    }

    /// Same color with lowercase digits
    #[must_use]
    pub fn to_lowercase(&self) -> Self {
        Self(self.0.to_ascii_lowercase())
    }

    /// The stored hex digits
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}
