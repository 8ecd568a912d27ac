//! Vertex types for file-space and coordinate-system positions

use std::fmt;

/// Integer vertex in .MAP file coordinate space.
///
/// All geometry in the file is stored as 32-bit integers; compact records
/// store 16-bit offsets that are resolved against an origin into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(x: i32, y: i32) -> Self {
        Vertex { x, y }
    }

    /// Origin vertex
    pub const ORIGIN: Vertex = Vertex::new(0, 0);

    /// Resolve a compact (16-bit) offset pair against this vertex as origin.
    ///
    /// Saturates at the i32 range instead of wrapping.
    pub fn offset_by(&self, dx: i16, dy: i16) -> Vertex {
        Vertex::new(
            self.x.saturating_add(dx as i32),
            self.y.saturating_add(dy as i32),
        )
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// 2D vector in coordinate-system units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Create a new 2D vector
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2 { x, y }
    }

    /// Zero vector
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);
}

impl Default for Vector2 {
    fn default() -> Self {
        Vector2::ZERO
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
