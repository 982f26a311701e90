use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::CytoError;

/// Display color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const GREY: HexColor = HexColor::new(0xbf, 0xbf, 0xbf);
    pub const PINK: HexColor = HexColor::new(0xd8, 0x6e, 0xcc);

    pub const fn new(
        r: u8,
        g: u8,
        b: u8,
    ) -> Self {
        Self { r, g, b }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::PINK
    }
}

impl Display for HexColor {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = CytoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CytoError::config(format!(
                "'{s}' is not a #rrggbb color"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| CytoError::config(e.to_string()))
        };
        Ok(HexColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for HexColor {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        HexColor::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Experimental condition attached to a well-identifier prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionMeta {
    /// Human-readable name, e.g. "Light".
    pub condition: String,
    pub color:     HexColor,
}

impl ConditionMeta {
    pub fn new(
        condition: impl Into<String>,
        color: HexColor,
    ) -> Self {
        Self {
            condition: condition.into(),
            color,
        }
    }
}
