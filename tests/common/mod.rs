//! Shared test utilities for tabmap integration tests.
//!
//! Byte-level builders for synthetic .MAP files live in [`builders`]; this
//! module holds the read helpers every test crate imports via `mod common;`.

#![allow(dead_code)]

pub mod builders;

use tabmap::io::map::{MapFile, MapReader, MapReaderConfiguration};
use tabmap::Result;

use std::io::Cursor;

/// Read a file image in strict mode.
pub fn read_strict(bytes: Vec<u8>) -> Result<MapFile> {
    MapReader::from_reader(Cursor::new(bytes)).read()
}

/// Read a file image in failsafe mode.
pub fn read_failsafe(bytes: Vec<u8>, skip_invalid_blocks: bool) -> Result<MapFile> {
    let config = MapReaderConfiguration {
        failsafe: true,
        skip_invalid_blocks,
    };
    MapReader::from_reader(Cursor::new(bytes))
        .with_config(config)
        .read()
}

/// Record ids of a decoded file, in record order.
pub fn record_ids(map: &MapFile) -> Vec<i32> {
    map.records().iter().map(|r| r.id).collect()
}
