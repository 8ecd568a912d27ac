//! MapInfo TAB `.MAP` geometry file support.
//!
//! A .MAP file is a sequence of 512-byte pages. Page 0 is the header;
//! version 500 and later follow it with an affine extension page. Every
//! other page starts with a block type tag.
//!
//! # Module Structure
//!
//! - [`constants`] — Page size, magic cookie, version thresholds, block tags, object length table
//! - [`cursor`] — Bounds-checked little-endian reads over one page
//! - [`block`] — Page wrapper with type classification and multi-page chaining
//! - [`header_block`] — Versioned header decoder and coordinate conversion
//! - [`index_block`] — Spatial index node decoder
//! - [`index_tree`] — Offset-keyed arena of index nodes with traversal
//! - [`geometry`] — Shape tags and per-shape record layouts
//! - [`record`] — Decoded geometry records and attribute rows
//! - [`object_block`] — Geometry record catalog decoder
//! - [`map_reader`] — Page router producing a [`MapFile`]

pub mod block;
pub mod constants;
pub mod cursor;
pub mod geometry;
pub mod header_block;
pub mod index_block;
pub mod index_tree;
pub mod map_file;
pub mod map_reader;
pub mod object_block;
pub mod record;

// Re-export commonly used types
pub use block::MapBlock;
pub use constants::BlockType;
pub use cursor::ByteCursor;
pub use geometry::{CollectionInfo, GeometryClass, GeometryDetails, GeometryType};
pub use header_block::{MapHeader, ProjectionInfo};
pub use index_block::{IndexBlock, IndexEntry};
pub use index_tree::IndexTree;
pub use map_file::MapFile;
pub use map_reader::{MapReader, MapReaderConfiguration};
pub use object_block::ObjectBlock;
pub use record::{AttributeRow, MapFileRecord};
