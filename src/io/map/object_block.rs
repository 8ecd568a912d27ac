//! Object block decoder.
//!
//! Page layout:
//! - byte 0: block type tag (2)
//! - byte 1: link byte
//! - bytes 2–3: payload length (int16)
//! - bytes 4–11: block center X, Y (int32 each)
//! - bytes 12–19: first and last coordinate block offsets (int32 each)
//! - geometry records until `20 + payload length`

use crate::error::Result;
use crate::types::{Rect, Vertex};

use super::block::MapBlock;
use super::constants::object_layout;
use super::geometry::GeometryType;
use super::record::{AttributeRow, MapFileRecord};

/// Decoded object block, accumulated over all of its pages.
#[derive(Debug, Clone)]
pub struct ObjectBlock {
    /// Link byte of the most recently decoded page.
    pub link: u8,
    /// Declared payload length of the most recently decoded page.
    pub num_data_bytes: i16,
    /// Origin of the compact encodings on the most recent page.
    pub center: Vertex,
    pub first_coord_block: i32,
    pub last_coord_block: i32,
    records: Vec<MapFileRecord>,
    bounds: Rect,
    block: MapBlock,
}

impl ObjectBlock {
    /// Decode the first page of an object block.
    pub fn new(block: MapBlock) -> Result<Self> {
        let mut objects = Self {
            link: 0,
            num_data_bytes: 0,
            center: Vertex::ORIGIN,
            first_coord_block: 0,
            last_coord_block: 0,
            records: Vec::new(),
            bounds: Rect::empty(),
            block,
        };
        objects.decode_page()?;
        Ok(objects)
    }

    /// Decode a raw page read at `file_offset`.
    pub fn from_page(file_offset: u64, page: Vec<u8>) -> Result<Self> {
        Self::new(MapBlock::new(file_offset, page))
    }

    /// Append one more page and decode only its records, after the ones
    /// already held.
    ///
    /// Records decoded before a failure on the new page are kept.
    pub fn extend(&mut self, page: Vec<u8>) -> Result<()> {
        self.block.append(page);
        self.decode_page()
    }

    fn decode_page(&mut self) -> Result<()> {
        let cur = self.block.cursor_mut();
        cur.seek(1)?;
        self.link = cur.read_u8()?;
        self.num_data_bytes = cur.read_i16()?;
        self.center = Vertex::new(cur.read_i32()?, cur.read_i32()?);
        self.first_coord_block = cur.read_i32()?;
        self.last_coord_block = cur.read_i32()?;

        let end = object_layout::HEADER_SIZE + self.num_data_bytes.max(0) as usize;
        // Records may not read past the declared payload.
        cur.set_limit(end);

        while cur.position() < end {
            let start = cur.position();
            let shape_type = GeometryType::from_tag(cur.read_u8()?)?;
            let id = cur.read_i32()?;

            let mut record = MapFileRecord::new(shape_type, id);
            shape_type.decode(cur, self.center, &mut record)?;
            record.set_content_length(cur.position() - start);

            // None and opaque records carry no MBR.
            if !record.mbr.is_empty() {
                self.bounds.merge(&record.mbr);
            }
            self.records.push(record);
        }

        cur.clear_limit();
        Ok(())
    }

    /// File offset of the block's first page.
    pub fn file_offset(&self) -> u64 {
        self.block.file_offset()
    }

    pub fn page_count(&self) -> usize {
        self.block.page_count()
    }

    /// Records in page arrival order, then file order within each page.
    pub fn records(&self) -> &[MapFileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record carrying `id`.
    pub fn record_by_id(&self, id: i32) -> Option<&MapFileRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Attach an attribute row to the record with identifier `id`.
    ///
    /// Returns `false` when no record carries that id.
    pub fn attach_row(&mut self, id: i32, row: AttributeRow) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.set_data_row(row);
                true
            }
            None => false,
        }
    }

    /// Union of the MBRs of all decoded records.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}
