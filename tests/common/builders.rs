//! Synthetic .MAP file builders.
//!
//! Everything is written little-endian at the page offsets the reader
//! expects. Pages are always padded to 512 bytes.

#![allow(dead_code)]

use tabmap::types::Rect;

pub const PAGE: usize = 512;
pub const COOKIE: i32 = 42_424_242;

// ===========================================================================
// Raw field writers
// ===========================================================================

pub fn put_u8(page: &mut [u8], at: usize, v: u8) {
    page[at] = v;
}

pub fn put_i16(page: &mut [u8], at: usize, v: i16) {
    page[at..at + 2].copy_from_slice(&v.to_le_bytes());
}

pub fn put_i32(page: &mut [u8], at: usize, v: i32) {
    page[at..at + 4].copy_from_slice(&v.to_le_bytes());
}

pub fn put_f64(page: &mut [u8], at: usize, v: f64) {
    page[at..at + 8].copy_from_slice(&v.to_le_bytes());
}

pub fn put_rect(page: &mut [u8], at: usize, r: Rect) {
    put_i32(page, at, r.x_min);
    put_i32(page, at + 4, r.y_min);
    put_i32(page, at + 8, r.x_max);
    put_i32(page, at + 12, r.y_max);
}

// ===========================================================================
// Header
// ===========================================================================

/// Header field offsets.
pub mod at {
    pub const MAGIC: usize = 0x100;
    pub const VERSION: usize = 0x104;
    pub const BLOCK_SIZE: usize = 0x106;
    pub const COORDSYS_TO_DIST: usize = 0x108;
    pub const BOUNDS: usize = 0x110;
    pub const FIRST_INDEX: usize = 0x130;
    pub const FIRST_GARBAGE: usize = 0x134;
    pub const FIRST_TOOL: usize = 0x138;
    pub const NUM_POINTS: usize = 0x13C;
    pub const NUM_LINES: usize = 0x140;
    pub const NUM_REGIONS: usize = 0x144;
    pub const NUM_TEXTS: usize = 0x148;
    pub const MAX_COORD_BUF: usize = 0x14C;
    pub const DIST_UNITS: usize = 0x15E;
    pub const PRECISION: usize = 0x160;
    pub const QUADRANT: usize = 0x161;
    pub const NUM_MAP_TOOL_BLOCKS: usize = 0x168;
    pub const DATUM_ID: usize = 0x16A;
    pub const PROJ_ID: usize = 0x16D;
    pub const ELLIPSOID_ID: usize = 0x16E;
    pub const UNITS_ID: usize = 0x16F;
    pub const X_SCALE: usize = 0x170;
    pub const Y_SCALE: usize = 0x178;
    pub const X_DISPL: usize = 0x180;
    pub const Y_DISPL: usize = 0x188;
    pub const PROJ_PARAMS: usize = 0x190;
    pub const DATUM_SHIFT_X: usize = 0x1C0;
    pub const DATUM_PARAMS: usize = 0x1D8;
}

/// A plausible header page: quadrant 1, precision 3, scale 1000.
pub fn header_page(version: i16) -> Vec<u8> {
    let mut page = vec![0u8; PAGE];
    put_i32(&mut page, at::MAGIC, COOKIE);
    put_i16(&mut page, at::VERSION, version);
    put_i16(&mut page, at::BLOCK_SIZE, PAGE as i16);
    put_f64(&mut page, at::COORDSYS_TO_DIST, 1.0);
    put_rect(&mut page, at::BOUNDS, Rect::new(0, 0, 100_000, 100_000));
    put_u8(&mut page, at::DIST_UNITS, 7);
    put_u8(&mut page, at::PRECISION, 3);
    put_u8(&mut page, at::QUADRANT, 1);
    put_f64(&mut page, at::X_SCALE, 1000.0);
    put_f64(&mut page, at::Y_SCALE, 1000.0);
    page
}

/// Affine extension page; `None` leaves the in-use flag clear.
pub fn affine_page(affine: Option<(u8, [f64; 6])>) -> Vec<u8> {
    let mut page = vec![0u8; PAGE];
    if let Some((units, params)) = affine {
        page[0] = 1;
        page[1] = units;
        for (i, p) in params.iter().enumerate() {
            put_f64(&mut page, 8 + i * 8, *p);
        }
    }
    page
}

// ===========================================================================
// Index and object pages
// ===========================================================================

pub fn index_page(link: u8, entries: &[(Rect, i32)]) -> Vec<u8> {
    let mut page = vec![0u8; PAGE];
    page[0] = 1;
    page[1] = link;
    put_i16(&mut page, 2, entries.len() as i16);
    for (i, (mbr, id)) in entries.iter().enumerate() {
        let base = 4 + i * 20;
        put_rect(&mut page, base, *mbr);
        put_i32(&mut page, base + 16, *id);
    }
    page
}

/// Object page holding `records` back to back, payload length declared to
/// match.
pub fn object_page(link: u8, center: (i32, i32), records: &[Vec<u8>]) -> Vec<u8> {
    let payload: Vec<u8> = records.concat();
    object_page_declaring(link, center, &payload, payload.len() as i16)
}

pub fn object_page_declaring(
    link: u8,
    center: (i32, i32),
    payload: &[u8],
    declared: i16,
) -> Vec<u8> {
    let mut page = vec![0u8; PAGE];
    page[0] = 2;
    page[1] = link;
    put_i16(&mut page, 2, declared);
    put_i32(&mut page, 4, center.0);
    put_i32(&mut page, 8, center.1);
    page[20..20 + payload.len()].copy_from_slice(payload);
    page
}

/// A page whose tag byte is `tag` and whose body is empty.
pub fn tagged_page(tag: u8) -> Vec<u8> {
    let mut page = vec![0u8; PAGE];
    page[0] = tag;
    page
}

// ===========================================================================
// Records
// ===========================================================================

pub struct RecordBytes(Vec<u8>);

impl RecordBytes {
    pub fn new(tag: u8, id: i32) -> Self {
        let mut bytes = vec![tag];
        bytes.extend_from_slice(&id.to_le_bytes());
        Self(bytes)
    }

    pub fn u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    pub fn i16(mut self, v: i16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(mut self, v: i32) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.0
    }
}

pub fn symbol_compact(id: i32, dx: i16, dy: i16, symbol: u8) -> Vec<u8> {
    RecordBytes::new(0x01, id).i16(dx).i16(dy).u8(symbol).build()
}

pub fn symbol(id: i32, x: i32, y: i32, symbol: u8) -> Vec<u8> {
    RecordBytes::new(0x02, id).i32(x).i32(y).u8(symbol).build()
}

pub fn line_compact(id: i32, a: (i16, i16), b: (i16, i16), pen: u8) -> Vec<u8> {
    RecordBytes::new(0x04, id)
        .i16(a.0)
        .i16(a.1)
        .i16(b.0)
        .i16(b.1)
        .u8(pen)
        .build()
}

pub fn line(id: i32, a: (i32, i32), b: (i32, i32), pen: u8) -> Vec<u8> {
    RecordBytes::new(0x05, id)
        .i32(a.0)
        .i32(a.1)
        .i32(b.0)
        .i32(b.1)
        .u8(pen)
        .build()
}

pub fn polyline(id: i32, coord_ptr: i32, size: i32, label: (i32, i32), mbr: Rect, pen: u8) -> Vec<u8> {
    RecordBytes::new(0x08, id)
        .i32(coord_ptr)
        .i32(size)
        .i32(label.0)
        .i32(label.1)
        .i32(mbr.x_min)
        .i32(mbr.y_min)
        .i32(mbr.x_max)
        .i32(mbr.y_max)
        .u8(pen)
        .build()
}

pub fn none(id: i32) -> Vec<u8> {
    RecordBytes::new(0x00, id).build()
}

// ===========================================================================
// Whole files
// ===========================================================================

/// Assembles header, optional affine page and body pages into one image.
pub struct MapFileBuilder {
    header: Vec<u8>,
    affine: Option<Vec<u8>>,
    pages: Vec<Vec<u8>>,
}

impl MapFileBuilder {
    /// Versions 500 and later get an empty affine page unless one is set.
    pub fn new(version: i16) -> Self {
        Self {
            header: header_page(version),
            affine: (version >= 500).then(|| affine_page(None)),
            pages: Vec::new(),
        }
    }

    pub fn header_mut(&mut self) -> &mut Vec<u8> {
        &mut self.header
    }

    pub fn root_index(mut self, offset: i32) -> Self {
        put_i32(&mut self.header, at::FIRST_INDEX, offset);
        self
    }

    pub fn affine(mut self, page: Vec<u8>) -> Self {
        self.affine = Some(page);
        self
    }

    pub fn page(mut self, page: Vec<u8>) -> Self {
        self.pages.push(page);
        self
    }

    /// File offset the next added page will land at.
    pub fn next_offset(&self) -> i32 {
        ((1 + self.affine.is_some() as usize + self.pages.len()) * PAGE) as i32
    }

    pub fn build(self) -> Vec<u8> {
        let mut bytes = self.header;
        if let Some(affine) = self.affine {
            bytes.extend(affine);
        }
        for page in self.pages {
            bytes.extend(page);
        }
        bytes
    }
}
