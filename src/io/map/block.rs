//! Fixed-size page abstraction shared by the header, index, and object
//! decoders.
//!
//! A logical block is one or more 512-byte pages. Pages are kept side by
//! side rather than merged; the read cursor always addresses the most
//! recently appended page with page-relative offsets.

use super::constants::BlockType;
use super::cursor::ByteCursor;

/// One logical block of a .MAP file.
#[derive(Debug, Clone)]
pub struct MapBlock {
    /// Absolute file offset of the first page.
    file_offset: u64,
    /// Type tag of the first page (implicit `Header` at offset 0).
    block_type: BlockType,
    /// One cursor per physical page, in arrival order.
    pages: Vec<ByteCursor>,
}

impl MapBlock {
    /// Wrap the page read at `file_offset`.
    pub fn new(file_offset: u64, page: Vec<u8>) -> Self {
        let block_type = if file_offset == 0 {
            BlockType::Header
        } else {
            Self::classify(&page)
        };
        Self {
            file_offset,
            block_type,
            pages: vec![ByteCursor::new(page)],
        }
    }

    /// Type tag of a raw page; byte 0 is peeked, nothing is consumed.
    ///
    /// An empty page has no associated stream and classifies as `Raw`.
    pub fn classify(page: &[u8]) -> BlockType {
        page.first()
            .map_or(BlockType::Raw, |tag| BlockType::from_raw(*tag))
    }

    /// Logically extend the block with one more physical page.
    ///
    /// The cursor moves to the start of the new page; callers re-run their
    /// field decoding against it.
    pub fn append(&mut self, page: Vec<u8>) {
        self.pages.push(ByteCursor::new(page));
    }

    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    pub fn block_type(&self) -> BlockType {
        self.block_type
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Cursor over the current (last appended) page.
    pub fn cursor_mut(&mut self) -> &mut ByteCursor {
        // A block is created with one page and never shrinks.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Cursor over the current page.
    pub fn cursor(&self) -> &ByteCursor {
        let last = self.pages.len() - 1;
        &self.pages[last]
    }

    /// Raw bytes of page `index`.
    pub fn page(&self, index: usize) -> Option<&[u8]> {
        self.pages.get(index).map(|p| p.get_ref())
    }
}
