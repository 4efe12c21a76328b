//! RGBA colour metadata carried by occupants.
//!
//! The grid never interprets colours; they travel with an occupant for
//! whichever formatter eventually draws it.

use std::fmt;

/// An 8-bit-per-channel RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Colour {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Colour {
    /// Opaque black.
    pub const BLACK: Colour = Colour::new(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Colour = Colour::new(255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Colour = Colour::rgba(0, 0, 0, 0);

    /// An opaque colour.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// A colour with an explicit alpha channel.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the alpha channel is zero.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Lowercase hex notation, `#rrggbb` or `#rrggbbaa`.
    pub fn to_hex(&self, include_alpha: bool) -> String {
        if include_alpha {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        } else {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex(true))
    }
}
