//! Decoded .MAP file.

use std::io::Cursor;

use crate::error::Result;
use crate::notification::NotificationCollection;
use crate::types::Rect;

use super::header_block::MapHeader;
use super::index_tree::IndexTree;
use super::map_reader::MapReader;
use super::object_block::ObjectBlock;
use super::record::{AttributeRow, MapFileRecord};

/// Everything decoded from one .MAP file.
#[derive(Debug, Clone)]
pub struct MapFile {
    pub header: MapHeader,
    /// Index nodes keyed by file offset.
    pub index: IndexTree,
    /// All object pages merged in arrival order; `None` for a file without
    /// object pages.
    pub objects: Option<ObjectBlock>,
    /// Issues met while reading.
    pub notifications: NotificationCollection,
}

impl MapFile {
    /// Decode an in-memory file with the default (strict) configuration.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        MapReader::from_reader(Cursor::new(bytes)).read()
    }

    /// All geometry records, in page arrival order.
    pub fn records(&self) -> &[MapFileRecord] {
        match &self.objects {
            Some(objects) => objects.records(),
            None => &[],
        }
    }

    pub fn record_by_id(&self, id: i32) -> Option<&MapFileRecord> {
        self.objects.as_ref()?.record_by_id(id)
    }

    /// Attach attribute rows to records by identifier.
    ///
    /// Returns how many rows found a record; rows without one are dropped.
    pub fn attach_rows<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = (i32, AttributeRow)>,
    {
        let Some(objects) = self.objects.as_mut() else {
            return 0;
        };
        let mut attached = 0;
        for (id, row) in rows {
            if objects.attach_row(id, row) {
                attached += 1;
            }
        }
        attached
    }

    /// Offset of the root index node, when the header names one that was
    /// decoded.
    pub fn root_index_offset(&self) -> Option<i32> {
        let root = self.header.first_index_block;
        self.index.contains(root).then_some(root)
    }

    /// Object block references whose index MBR intersects `area`.
    pub fn search(&self, area: &Rect) -> Vec<i32> {
        self.root_index_offset()
            .map_or_else(Vec::new, |root| self.index.search(root, area))
    }
}
