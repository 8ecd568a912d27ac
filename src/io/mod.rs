//! I/O module for reading MapInfo TAB `.MAP` files

pub mod map;

pub use map::{MapFile, MapReader, MapReaderConfiguration};
