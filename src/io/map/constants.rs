//! Constants, magic numbers, and fixed offsets for the .MAP file format.

/// Size of every physical page (block) in the file.
pub const BLOCK_SIZE: usize = 0x200;

/// Magic cookie stored at offset 0x100 of the header block.
pub const MAGIC_COOKIE: i32 = 42_424_242;

/// Header version numbers that change the decoded field set.
pub mod versions {
    /// Last version that did not persist scale/displacement.
    pub const NO_SCALE_MAX: i16 = 100;
    /// Last version whose legacy datum parameters are junk.
    pub const LEGACY_DATUM_MAX: i16 = 200;
    /// First version with a datum id and an affine extension page.
    pub const AFFINE: i16 = 500;
}

/// Fixed field offsets inside the header block.
pub mod header_offsets {
    pub const MAGIC_COOKIE: usize = 0x100;
    pub const BLOCK_POINTERS: usize = 0x130;
    pub const CODES: usize = 0x15E;
}

/// Index block page layout.
pub mod index_layout {
    /// Tag, link byte, and entry count.
    pub const HEADER_SIZE: usize = 4;
    /// XMin, YMin, XMax, YMax, and child offset (all int32).
    pub const ENTRY_SIZE: usize = 20;
    /// Entries that fit in one page.
    pub const MAX_ENTRIES: usize = (super::BLOCK_SIZE - HEADER_SIZE) / ENTRY_SIZE;
}

/// Object block page layout.
pub mod object_layout {
    /// Records start here; the payload length is counted from this offset.
    pub const HEADER_SIZE: usize = 20;
    /// Shape type byte plus int32 object id.
    pub const RECORD_HEADER_SIZE: usize = 5;
}

/// Block type tags stored in byte 0 of every non-header page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i8)]
pub enum BlockType {
    /// No associated stream (classification default)
    Raw = -1,
    Header = 0,
    Index = 1,
    Object = 2,
    Coordinate = 3,
    Garbage = 4,
    Tool = 5,
}

impl BlockType {
    /// Map a raw tag byte to a block type; unknown tags are `Raw`.
    pub fn from_raw(value: u8) -> Self {
        match value {
            0 => Self::Header,
            1 => Self::Index,
            2 => Self::Object,
            3 => Self::Coordinate,
            4 => Self::Garbage,
            5 => Self::Tool,
            _ => Self::Raw,
        }
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Header => "header",
            Self::Index => "index",
            Self::Object => "object",
            Self::Coordinate => "coordinate",
            Self::Garbage => "garbage",
            Self::Tool => "tool",
        }
    }
}

/// Map object length table, indexed by shape tag.
///
/// The low 7 bits are the record size (type byte and id included); the high
/// bit is set for records whose vertices live in the coordinate block.
pub const OBJECT_LENGTHS: [u8; 73] = [
    0x00, 0x0a, 0x0e, 0x15, 0x0e, 0x16, 0x1b, 0xa2, //
    0xa6, 0xab, 0x1a, 0x2a, 0x2f, 0xa5, 0xa9, 0xb5, //
    0xa7, 0xb5, 0xd9, 0x0f, 0x17, 0x23, 0x13, 0x1f, //
    0x2b, 0x0f, 0x17, 0x23, 0x4f, 0x57, 0x63, 0x9c, //
    0xa4, 0xa9, 0xa0, 0xa8, 0xad, 0xa4, 0xa8, 0xad, //
    0x16, 0x1a, 0x39, 0x0d, 0x11, 0x37, 0xa5, 0xa9, //
    0xb5, 0xa4, 0xa8, 0xad, 0xb2, 0xb6, 0xdc, 0xbd, //
    0xbd, 0xf4, 0x2b, 0x2f, 0x55, 0xc8, 0xcc, 0xd8, //
    0xc7, 0xcb, 0xd0, 0xd3, 0xd7, 0xfd, 0xc2, 0xc2, //
    0xf9,
];

/// Record size for a shape tag according to the length table.
pub fn object_record_size(tag: u8) -> Option<usize> {
    OBJECT_LENGTHS
        .get(tag as usize)
        .map(|len| (len & 0x7f) as usize)
}

/// Whether the length table flags the tag as coordinate-block backed.
pub fn object_uses_coord_block(tag: u8) -> bool {
    OBJECT_LENGTHS
        .get(tag as usize)
        .map_or(false, |len| len & 0x80 != 0)
}
