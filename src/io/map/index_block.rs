//! Spatial index block decoder.
//!
//! Page layout:
//! - byte 0: block type tag (1)
//! - byte 1: link byte (continuation page of the same node)
//! - bytes 2–3: entry count (int16)
//! - 20-byte entries: XMin, YMin, XMax, YMax, child offset (int32 each)
//!
//! Whether an entry's id points at another index node or at an object block
//! depends on the tree level; the node itself does not record it.

use crate::error::Result;
use crate::types::Rect;

use super::block::MapBlock;

/// One (rectangle, child) pair of an index node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexEntry {
    pub mbr: Rect,
    /// File offset of the child index node or object block.
    pub id: i32,
}

/// Decoded index node.
#[derive(Debug, Clone)]
pub struct IndexBlock {
    /// Link byte of the most recently decoded page.
    pub link: u8,
    /// Entries in file order, over all pages of the node.
    entries: Vec<IndexEntry>,
    /// Running MBR of all entries.
    bounds: Rect,

    // Navigation state written by the tree walk; offsets, never ownership.
    pub(crate) current_child_index: Option<usize>,
    pub(crate) current_child: Option<i32>,
    pub(crate) parent: Option<i32>,

    block: MapBlock,
}

impl IndexBlock {
    /// Decode the first page of an index node.
    pub fn new(block: MapBlock) -> Result<Self> {
        let mut node = Self {
            link: 0,
            entries: Vec::new(),
            bounds: Rect::empty(),
            current_child_index: None,
            current_child: None,
            parent: None,
            block,
        };
        node.decode_page()?;
        Ok(node)
    }

    /// Decode a raw page read at `file_offset`.
    pub fn from_page(file_offset: u64, page: Vec<u8>) -> Result<Self> {
        Self::new(MapBlock::new(file_offset, page))
    }

    /// Append a continuation page and decode its entries after the existing
    /// ones. The link byte is replaced by the new page's.
    ///
    /// When the page fails to decode, entries, bounds and link stay as they
    /// were.
    pub fn extend(&mut self, page: Vec<u8>) -> Result<()> {
        self.block.append(page);
        self.decode_page()
    }

    fn decode_page(&mut self) -> Result<()> {
        let cur = self.block.cursor_mut();
        cur.seek(1)?;
        let link = cur.read_u8()?;
        // A negative count reads as a page with no entries.
        let count = cur.read_i16()?.max(0) as usize;

        let mut entries = Vec::with_capacity(count);
        let mut bounds = Rect::empty();
        for _ in 0..count {
            let mbr = Rect::new(
                cur.read_i32()?,
                cur.read_i32()?,
                cur.read_i32()?,
                cur.read_i32()?,
            );
            let id = cur.read_i32()?;
            bounds.merge(&mbr);
            entries.push(IndexEntry { mbr, id });
        }

        self.link = link;
        self.entries.extend(entries);
        self.bounds.merge(&bounds);
        Ok(())
    }

    /// File offset of the node's first page.
    pub fn file_offset(&self) -> u64 {
        self.block.file_offset()
    }

    pub fn page_count(&self) -> usize {
        self.block.page_count()
    }

    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&IndexEntry> {
        self.entries.get(index)
    }

    /// MBR covering every entry; empty while the node has no entries.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Index of the entry the last descent went through.
    pub fn current_child_index(&self) -> Option<usize> {
        self.current_child_index
    }

    /// Offset of the node the last descent reached.
    pub fn current_child(&self) -> Option<i32> {
        self.current_child
    }

    /// Offset of the node this one was reached from.
    pub fn parent(&self) -> Option<i32> {
        self.parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use crate::io::map::constants::BLOCK_SIZE;

    fn index_page(link: u8, entries: &[(i32, i32, i32, i32, i32)]) -> Vec<u8> {
        let mut page = vec![0u8; BLOCK_SIZE];
        page[0] = 1;
        page[1] = link;
        page[2..4].copy_from_slice(&(entries.len() as i16).to_le_bytes());
        let mut at = 4;
        for &(x0, y0, x1, y1, id) in entries {
            for v in [x0, y0, x1, y1, id] {
                page[at..at + 4].copy_from_slice(&v.to_le_bytes());
                at += 4;
            }
        }
        page
    }

    #[test]
    fn test_decode_entries_in_file_order() {
        let page = index_page(0, &[(5, 5, 9, 9, 0x600), (-3, 0, 1, 2, 0x400)]);
        let node = IndexBlock::from_page(0x200, page).unwrap();

        assert_eq!(node.num_entries(), 2);
        assert_eq!(node.entry(0).unwrap().id, 0x600);
        assert_eq!(node.entry(1).unwrap().mbr, Rect::new(-3, 0, 1, 2));
        assert_eq!(node.bounds(), Rect::new(-3, 0, 9, 9));
        assert_eq!(node.file_offset(), 0x200);
        assert_eq!(node.parent(), None);
        assert_eq!(node.current_child_index(), None);
    }

    #[test]
    fn test_extend_accumulates_and_overwrites_link() {
        let mut node = IndexBlock::from_page(0x200, index_page(4, &[(0, 0, 1, 1, 10)])).unwrap();
        assert_eq!(node.link, 4);

        node.extend(index_page(0, &[(2, 2, 3, 3, 20), (4, 4, 5, 5, 30)]))
            .unwrap();
        assert_eq!(node.link, 0);
        assert_eq!(node.num_entries(), 3);
        assert_eq!(
            node.entries().iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![10, 20, 30]
        );
        assert_eq!(node.bounds(), Rect::new(0, 0, 5, 5));
        assert_eq!(node.page_count(), 2);
    }

    #[test]
    fn test_failed_continuation_keeps_node() {
        let mut node = IndexBlock::from_page(0x200, index_page(4, &[(0, 0, 1, 1, 10)])).unwrap();

        let mut page = index_page(7, &[(2, 2, 3, 3, 20)]);
        page[2..4].copy_from_slice(&30i16.to_le_bytes());
        let err = node.extend(page).unwrap_err();
        assert!(matches!(err, MapError::BufferUnderrun { .. }));

        assert_eq!(node.num_entries(), 1);
        assert_eq!(node.entry(0).unwrap().id, 10);
        assert_eq!(node.bounds(), Rect::new(0, 0, 1, 1));
        assert_eq!(node.link, 4);
    }

    #[test]
    fn test_negative_count_is_empty() {
        let mut page = index_page(0, &[(2, 2, 3, 3, 20)]);
        page[2..4].copy_from_slice(&(-3i16).to_le_bytes());
        let node = IndexBlock::from_page(0x200, page).unwrap();
        assert_eq!(node.num_entries(), 0);
        assert!(node.bounds().is_empty());
    }

    #[test]
    fn test_empty_node() {
        let node = IndexBlock::from_page(0x200, index_page(0, &[])).unwrap();
        assert_eq!(node.num_entries(), 0);
        assert!(node.bounds().is_empty());
    }

    #[test]
    fn test_count_past_page_end_underruns() {
        let mut page = index_page(0, &[]);
        page[2..4].copy_from_slice(&26i16.to_le_bytes());
        let err = IndexBlock::from_page(0x200, page).unwrap_err();
        assert!(matches!(err, MapError::BufferUnderrun { .. }));
    }
}
