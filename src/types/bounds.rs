//! Integer bounding rectangle (MBR) used by index entries and geometry records

use super::Vertex;
use std::fmt;

/// Minimum bounding rectangle in file coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl Rect {
    /// Create a rectangle from its four bounds
    pub const fn new(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        Rect {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// An inverted rectangle that any `expand_to_include` call overwrites.
    pub const fn empty() -> Self {
        Rect::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN)
    }

    /// Create a rectangle from a single vertex
    pub fn from_vertex(v: Vertex) -> Self {
        Rect::new(v.x, v.y, v.x, v.y)
    }

    /// True while no vertex or rectangle has widened this one
    pub fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    /// Check if this rectangle contains a vertex (bounds inclusive)
    pub fn contains(&self, v: Vertex) -> bool {
        v.x >= self.x_min && v.x <= self.x_max && v.y >= self.y_min && v.y <= self.y_max
    }

    /// Check if two rectangles overlap (touching edges count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x_min <= other.x_max
            && other.x_min <= self.x_max
            && self.y_min <= other.y_max
            && other.y_min <= self.y_max
    }

    /// Expand the rectangle to include a vertex
    pub fn expand_to_include(&mut self, v: Vertex) {
        self.x_min = self.x_min.min(v.x);
        self.y_min = self.y_min.min(v.y);
        self.x_max = self.x_max.max(v.x);
        self.y_max = self.y_max.max(v.y);
    }

    /// Widen this rectangle to cover another one
    pub fn merge(&mut self, other: &Rect) {
        self.x_min = self.x_min.min(other.x_min);
        self.y_min = self.y_min.min(other.y_min);
        self.x_max = self.x_max.max(other.x_max);
        self.y_max = self.y_max.max(other.y_max);
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MBR[({}, {}) -> ({}, {})]",
            self.x_min, self.y_min, self.x_max, self.y_max
        )
    }
}
