//! Fixed rendering styles bound to node and edge categories

use std::fmt;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Build a color from a `0xRRGGBB` literal
    #[inline]
    #[must_use]
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Channels as a tuple
    #[inline]
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.0, self.1, self.2)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Green
pub const USER_COLOR: Color = Color::from_hex(0x4C_AF50);
/// Blue
pub const ROLE_COLOR: Color = Color::from_hex(0x21_96F3);
/// Amber
pub const PERMISSION_COLOR: Color = Color::from_hex(0xFF_C107);
/// Purple
pub const HAS_ROLE_COLOR: Color = Color::from_hex(0x9C_27B0);
/// Deep orange
pub const HAS_PERMISSION_COLOR: Color = Color::from_hex(0xFF_5722);
/// Grey, for categories the API did not document
pub const OTHER_COLOR: Color = Color::from_hex(0x9E_9E9E);

/// Node marker size, in the area units the original charts used
pub const USER_SIZE: u32 = 500;
/// Role node size
pub const ROLE_SIZE: u32 = 800;
/// Permission node size
pub const PERMISSION_SIZE: u32 = 300;
/// Size for unrecognized node types
pub const OTHER_SIZE: u32 = 300;

/// Visual style of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    /// Fill color
    pub color: Color,
    /// Marker area
    pub size: u32,
}

/// Visual style of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeStyle {
    /// Stroke color
    pub color: Color,
}
