//! Display colors for road map cells.

#![warn(missing_docs)]

use super::RoadCell;

/// An 8-bit RGBA color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Color = Color::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::opaque(255, 255, 255);

    /// Creates a new `Color`.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque `Color`.
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Channels in RGBA order.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Maps a direction component from `[-1, 1]` onto `[0, 255]`.
fn direction_channel(component: f32) -> u8 {
    (255.0 * (component + 1.0) / 2.0).floor().clamp(0.0, 255.0) as u8
}

/// Color of a cell: black off-road, white for undirected surface, and the
/// lane direction remapped into RGB otherwise.
pub fn encode(cell: &RoadCell) -> Color {
    match cell {
        RoadCell::OffRoad => Color::BLACK,
        RoadCell::Undirected => Color::WHITE,
        RoadCell::Lane(direction) => Color::opaque(
            direction_channel(direction.x),
            direction_channel(direction.y),
            direction_channel(direction.z),
        ),
    }
}
