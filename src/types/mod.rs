//! Core geometric value types shared by the block decoders

mod bounds;
mod vector;

pub use bounds::Rect;
pub use vector::{Vector2, Vertex};
