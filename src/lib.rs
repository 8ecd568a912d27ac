//! # tabmap
//!
//! A pure Rust library for reading the geometry file (`.MAP`) of MapInfo
//! TAB datasets.
//!
//! ## Features
//!
//! - Versioned header decoding (versions 100 through 800), including
//!   projection, datum and the affine extension page
//! - Spatial index nodes assembled into an offset-keyed tree with
//!   rectangle search
//! - Object block decoding for every shape tag, in both the compact
//!   (center-relative int16) and long (absolute int32) encodings
//! - Attribute rows attachable to records by object id
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabmap::io::map::MapReader;
//!
//! let map = MapReader::from_file("roads.map")?.read()?;
//! println!("version {}, {} records", map.header.version, map.records().len());
//!
//! for record in map.records() {
//!     println!("{:?} #{} {}", record.shape_type, record.id, record.mbr);
//! }
//! # Ok::<(), tabmap::error::MapError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`io::map::MapBlock`] - One or more 512-byte pages with a type tag
//! - [`io::map::MapHeader`] - File metadata from page 0 (and 1)
//! - [`io::map::IndexTree`] - Index nodes addressed by file offset
//! - [`io::map::ObjectBlock`] - Geometry records of all object pages
//!
//! Vertices of polylines, regions and other multi-vertex shapes live in
//! coordinate blocks; records carry the pointer and size only.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod notification;
pub mod types;
pub mod io;

// Re-export commonly used types
pub use error::{MapError, Result};
pub use types::{Rect, Vector2, Vertex};

// Re-export decoded structures
pub use io::map::{
    AttributeRow, GeometryType, IndexTree, MapFile, MapFileRecord, MapHeader, ObjectBlock,
};

// Re-export I/O types
pub use io::map::{MapReader, MapReaderConfiguration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
