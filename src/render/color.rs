//! Color values carried on shapes.
//!
//! The simulation never interprets these; only renderers and the scene
//! loader (which parses them from names or hex strings) look inside.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    // Common colors
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const RED: Color = Color::rgba(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color = Color::rgba(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color = Color::rgba(0.0, 0.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::rgba(1.0, 1.0, 0.0, 1.0);
    pub const ORANGE: Color = Color::rgba(1.0, 0.65, 0.0, 1.0);
}

impl FromStr for Color {
    type Err = String;

    /// Parses a named color or a `#rrggbb` / `#rrggbbaa` hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            "red" => return Ok(Color::RED),
            "green" => return Ok(Color::GREEN),
            "blue" => return Ok(Color::BLUE),
            "yellow" => return Ok(Color::YELLOW),
            "orange" => return Ok(Color::ORANGE),
            _ => {}
        }

        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("unknown color '{}'", s))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(format!("hex color '{}' must be #rrggbb or #rrggbbaa", s));
        }
        // The length check counts bytes; multi-byte input must fail here
        // rather than panic on a char boundary below.
        if !hex.is_ascii() {
            return Err(format!("hex color '{}' has non-ascii characters", s));
        }

        let channel = |range: std::ops::Range<usize>| -> Result<f32, String> {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|e| format!("hex color '{}': {}", s, e))
        };

        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let a = if hex.len() == 8 { channel(6..8)? } else { 1.0 };
        Ok(Color::rgba(r, g, b, a))
    }
}
