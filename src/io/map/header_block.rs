//! Header block decoder.
//!
//! The first page of every .MAP file holds the file-wide layout and
//! coordinate-system metadata. The field set depends on the format version:
//!
//! - version <= 100 did not persist scale/displacement; they are derived
//!   from the coordinate precision code
//! - version <= 200 carries junk in the legacy datum parameter region
//! - version < 500 has no datum id
//! - version >= 500 may be followed by a second page carrying an affine
//!   transform
//!
//! Layout (offsets within the page):
//! - 0x000: object length table (not decoded)
//! - 0x100: magic cookie, version, block size, coordsys→distance scale, MBR
//! - 0x130: first index/garbage/tool block, per-class object counts,
//!   max coordinate buffer size
//! - 0x15E: byte codes, tool block count, datum id
//! - 0x16D: projection/ellipsoid/units ids, scale and displacement,
//!   projection parameters, datum shift, legacy datum parameters

use crate::error::{MapError, Result};
use crate::types::{Rect, Vector2, Vertex};

use super::block::MapBlock;
use super::constants::{header_offsets, versions, BLOCK_SIZE, MAGIC_COOKIE, OBJECT_LENGTHS};

/// Projection and datum parameters of the file's coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInfo {
    pub proj_id: u8,
    pub ellipsoid_id: u8,
    pub units_id: u8,
    pub proj_params: [f64; 6],
    /// Zero for files older than version 500.
    pub datum_id: i16,
    pub datum_shift_x: f64,
    pub datum_shift_y: f64,
    pub datum_shift_z: f64,
    /// Zero for files of version 200 and older.
    pub datum_params: [f64; 5],
    /// Set only when the affine extension page is present and in use.
    pub affine_flag: bool,
    pub affine_units: u8,
    /// Affine parameters A–F.
    pub affine_params: [f64; 6],
}

impl Default for ProjectionInfo {
    fn default() -> Self {
        Self {
            proj_id: 0,
            ellipsoid_id: 0,
            units_id: 0,
            proj_params: [0.0; 6],
            datum_id: 0,
            datum_shift_x: 0.0,
            datum_shift_y: 0.0,
            datum_shift_z: 0.0,
            datum_params: [0.0; 5],
            affine_flag: false,
            affine_units: 0,
            affine_params: [0.0; 6],
        }
    }
}

/// Decoded header block.
#[derive(Debug, Clone)]
pub struct MapHeader {
    pub magic_number: i32,
    pub version: i16,
    pub block_size: i16,
    pub coordsys_to_dist_units: f64,
    /// Integer bounds of all geometry in the file.
    pub bounds: Rect,

    pub first_index_block: i32,
    pub first_garbage_block: i32,
    pub first_tool_block: i32,

    pub num_point_objects: i32,
    pub num_line_objects: i32,
    pub num_region_objects: i32,
    pub num_text_objects: i32,
    pub max_coord_buf_size: i32,

    /// See MapInfoUnits.db; 7 is meters.
    pub dist_units_code: u8,
    pub max_sp_index_depth: u8,
    pub coord_precision: u8,
    pub coord_origin_quadrant: u8,
    pub reflect_x_axis_coord: u8,
    pub max_obj_len_array_id: u8,
    pub num_pen_defs: u8,
    pub num_brush_defs: u8,
    pub num_symbol_defs: u8,
    pub num_font_defs: u8,
    pub num_map_tool_blocks: i16,

    pub projection: ProjectionInfo,

    pub x_scale: f64,
    pub y_scale: f64,
    pub x_displ: f64,
    pub y_displ: f64,

    /// Raw header pages (the affine extension is appended as a second page).
    block: Option<MapBlock>,
}

impl Default for MapHeader {
    /// Values a freshly created file would carry.
    fn default() -> Self {
        Self {
            magic_number: MAGIC_COOKIE,
            version: versions::AFFINE,
            block_size: BLOCK_SIZE as i16,
            coordsys_to_dist_units: 1.0,
            bounds: Rect::new(-1_000_000_000, -1_000_000_000, 1_000_000_000, 1_000_000_000),
            first_index_block: 0,
            first_garbage_block: 0,
            first_tool_block: 0,
            num_point_objects: 0,
            num_line_objects: 0,
            num_region_objects: 0,
            num_text_objects: 0,
            max_coord_buf_size: 0,
            dist_units_code: 7,
            max_sp_index_depth: 0,
            coord_precision: 3,
            coord_origin_quadrant: 1,
            reflect_x_axis_coord: 0,
            max_obj_len_array_id: (OBJECT_LENGTHS.len() - 1) as u8,
            num_pen_defs: 0,
            num_brush_defs: 0,
            num_symbol_defs: 0,
            num_font_defs: 0,
            num_map_tool_blocks: 0,
            projection: ProjectionInfo::default(),
            x_scale: 1000.0,
            y_scale: 1000.0,
            x_displ: 0.0,
            y_displ: 0.0,
            block: None,
        }
    }
}

impl MapHeader {
    /// Decode the header from the first page of a file.
    pub fn from_page(page: Vec<u8>) -> Result<Self> {
        Self::from_block(MapBlock::new(0, page))
    }

    /// Decode the header from an already wrapped first block.
    ///
    /// Fails with [`MapError::InvalidFormat`] when the magic cookie does not
    /// match; every other field is taken as stored.
    pub fn from_block(mut block: MapBlock) -> Result<Self> {
        let mut header = MapHeader::default();
        let cur = block.cursor_mut();

        cur.seek(header_offsets::MAGIC_COOKIE)?;
        header.magic_number = cur.read_i32()?;
        if header.magic_number != MAGIC_COOKIE {
            return Err(MapError::InvalidFormat(format!(
                "Invalid magic cookie: got {}, expected {}",
                header.magic_number, MAGIC_COOKIE
            )));
        }

        header.version = cur.read_i16()?;
        header.block_size = cur.read_i16()?;
        header.coordsys_to_dist_units = cur.read_f64()?;
        header.bounds = Rect::new(
            cur.read_i32()?,
            cur.read_i32()?,
            cur.read_i32()?,
            cur.read_i32()?,
        );

        // 16 unknown bytes
        cur.seek(header_offsets::BLOCK_POINTERS)?;
        header.first_index_block = cur.read_i32()?;
        header.first_garbage_block = cur.read_i32()?;
        header.first_tool_block = cur.read_i32()?;
        header.num_point_objects = cur.read_i32()?;
        header.num_line_objects = cur.read_i32()?;
        header.num_region_objects = cur.read_i32()?;
        header.num_text_objects = cur.read_i32()?;
        header.max_coord_buf_size = cur.read_i32()?;

        // 14 unknown bytes
        cur.seek(header_offsets::CODES)?;
        header.dist_units_code = cur.read_u8()?;
        header.max_sp_index_depth = cur.read_u8()?;
        header.coord_precision = cur.read_u8()?;
        header.coord_origin_quadrant = cur.read_u8()?;
        header.reflect_x_axis_coord = cur.read_u8()?;
        header.max_obj_len_array_id = cur.read_u8()?;
        header.num_pen_defs = cur.read_u8()?;
        header.num_brush_defs = cur.read_u8()?;
        header.num_symbol_defs = cur.read_u8()?;
        header.num_font_defs = cur.read_u8()?;
        header.num_map_tool_blocks = cur.read_i16()?;

        let mut proj = ProjectionInfo {
            datum_id: cur.read_i16()?,
            ..ProjectionInfo::default()
        };
        // Datum id was not set before version 500.
        if header.version < versions::AFFINE {
            proj.datum_id = 0;
        }

        cur.skip(1)?;
        proj.proj_id = cur.read_u8()?;
        proj.ellipsoid_id = cur.read_u8()?;
        proj.units_id = cur.read_u8()?;

        header.x_scale = cur.read_f64()?;
        header.y_scale = cur.read_f64()?;
        header.x_displ = cur.read_f64()?;
        header.y_displ = cur.read_f64()?;
        if header.version <= versions::NO_SCALE_MAX {
            let scale = 10f64.powi(header.coord_precision as i32);
            header.x_scale = scale;
            header.y_scale = scale;
            header.x_displ = 0.0;
            header.y_displ = 0.0;
        }

        proj.proj_params = cur.read_f64_array::<6>()?;
        proj.datum_shift_x = cur.read_f64()?;
        proj.datum_shift_y = cur.read_f64()?;
        proj.datum_shift_z = cur.read_f64()?;
        proj.datum_params = cur.read_f64_array::<5>()?;
        if header.version <= versions::LEGACY_DATUM_MAX {
            proj.datum_params = [0.0; 5];
        }

        header.projection = proj;
        header.block = Some(block);
        Ok(header)
    }

    /// Whether the file format places an affine extension page right after
    /// the header.
    pub fn has_extension_page(&self) -> bool {
        self.version >= versions::AFFINE
    }

    /// Decode the affine extension carried by the page following the header.
    pub fn append_affine_page(&mut self, page: Vec<u8>) -> Result<()> {
        let block = self.block.get_or_insert_with(|| MapBlock::new(0, Vec::new()));
        block.append(page);
        let cur = block.cursor_mut();

        let proj = &mut self.projection;
        proj.affine_flag = false;
        let in_use = cur.read_u8()?;
        if in_use != 0 {
            proj.affine_flag = true;
            proj.affine_units = cur.read_u8()?;
            // 6 reserved bytes
            cur.skip(6)?;
            proj.affine_params = cur.read_f64_array::<6>()?;
        }
        Ok(())
    }

    /// Number of physical pages the header was decoded from.
    pub fn page_count(&self) -> usize {
        self.block.as_ref().map_or(0, |b| b.page_count())
    }

    /// Total objects over all geometry classes.
    pub fn object_count(&self) -> i64 {
        self.num_point_objects as i64
            + self.num_line_objects as i64
            + self.num_region_objects as i64
            + self.num_text_objects as i64
    }

    /// Convert integer file coordinates to coordinate-system units.
    ///
    /// Quadrants 2, 3 and 0 mirror the X axis; quadrants 3, 4 and 0 mirror
    /// the Y axis (quadrant 0 appears in old files and means quadrant 3).
    pub fn int_to_coordsys(&self, v: Vertex) -> Vector2 {
        let (x, y) = (v.x as f64, v.y as f64);
        let q = self.coord_origin_quadrant;

        let dx = if matches!(q, 0 | 2 | 3) {
            -(x + self.x_displ) / self.x_scale
        } else {
            (x - self.x_displ) / self.x_scale
        };
        let dy = if matches!(q, 0 | 3 | 4) {
            -(y + self.y_displ) / self.y_scale
        } else {
            (y - self.y_displ) / self.y_scale
        };
        Vector2::new(dx, dy)
    }

    /// File bounds in coordinate-system units, as (min, max).
    pub fn coordsys_bounds(&self) -> (Vector2, Vector2) {
        let a = self.int_to_coordsys(Vertex::new(self.bounds.x_min, self.bounds.y_min));
        let b = self.int_to_coordsys(Vertex::new(self.bounds.x_max, self.bounds.y_max));
        (
            Vector2::new(a.x.min(b.x), a.y.min(b.y)),
            Vector2::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_i16(page: &mut [u8], at: usize, v: i16) {
        page[at..at + 2].copy_from_slice(&v.to_le_bytes());
    }

    fn put_i32(page: &mut [u8], at: usize, v: i32) {
        page[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    fn put_f64(page: &mut [u8], at: usize, v: f64) {
        page[at..at + 8].copy_from_slice(&v.to_le_bytes());
    }

    /// Header page with every field set to a recognizable non-zero value.
    fn header_page(version: i16) -> Vec<u8> {
        let mut page = vec![0u8; BLOCK_SIZE];
        put_i32(&mut page, 0x100, MAGIC_COOKIE);
        put_i16(&mut page, 0x104, version);
        put_i16(&mut page, 0x106, 512);
        put_f64(&mut page, 0x108, 0.5);
        put_i32(&mut page, 0x110, -100);
        put_i32(&mut page, 0x114, -200);
        put_i32(&mut page, 0x118, 300);
        put_i32(&mut page, 0x11C, 400);
        put_i32(&mut page, 0x130, 0x400);
        put_i32(&mut page, 0x134, 0);
        put_i32(&mut page, 0x138, 0x600);
        put_i32(&mut page, 0x13C, 11);
        put_i32(&mut page, 0x140, 12);
        put_i32(&mut page, 0x144, 13);
        put_i32(&mut page, 0x148, 14);
        put_i32(&mut page, 0x14C, 4096);
        page[0x15E..0x168].copy_from_slice(&[7, 2, 4, 1, 0, 72, 3, 5, 6, 8]);
        put_i16(&mut page, 0x168, 2);
        put_i16(&mut page, 0x16A, 104);
        page[0x16D] = 9;
        page[0x16E] = 28;
        page[0x16F] = 7;
        put_f64(&mut page, 0x170, 2.0);
        put_f64(&mut page, 0x178, 3.0);
        put_f64(&mut page, 0x180, 10.0);
        put_f64(&mut page, 0x188, 20.0);
        for i in 0..6 {
            put_f64(&mut page, 0x190 + i * 8, i as f64 + 1.0);
        }
        put_f64(&mut page, 0x1C0, -1.5);
        put_f64(&mut page, 0x1C8, -2.5);
        put_f64(&mut page, 0x1D0, -3.5);
        for i in 0..5 {
            put_f64(&mut page, 0x1D8 + i * 8, 0.25 * (i as f64 + 1.0));
        }
        page
    }

    #[test]
    fn test_decode_v500_fields() {
        let h = MapHeader::from_page(header_page(500)).unwrap();
        assert_eq!(h.magic_number, MAGIC_COOKIE);
        assert_eq!(h.version, 500);
        assert_eq!(h.block_size, 512);
        assert_eq!(h.coordsys_to_dist_units, 0.5);
        assert_eq!(h.bounds, Rect::new(-100, -200, 300, 400));
        assert_eq!(h.first_index_block, 0x400);
        assert_eq!(h.first_tool_block, 0x600);
        assert_eq!(h.object_count(), 11 + 12 + 13 + 14);
        assert_eq!(h.max_coord_buf_size, 4096);
        assert_eq!(h.dist_units_code, 7);
        assert_eq!(h.max_sp_index_depth, 2);
        assert_eq!(h.coord_precision, 4);
        assert_eq!(h.coord_origin_quadrant, 1);
        assert_eq!(h.max_obj_len_array_id, 72);
        assert_eq!(h.num_pen_defs, 3);
        assert_eq!(h.num_font_defs, 8);
        assert_eq!(h.num_map_tool_blocks, 2);
        assert_eq!(h.projection.datum_id, 104);
        assert_eq!(h.projection.proj_id, 9);
        assert_eq!(h.projection.ellipsoid_id, 28);
        assert_eq!(h.projection.units_id, 7);
        assert_eq!((h.x_scale, h.y_scale), (2.0, 3.0));
        assert_eq!((h.x_displ, h.y_displ), (10.0, 20.0));
        assert_eq!(h.projection.proj_params, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(h.projection.datum_shift_z, -3.5);
        assert_eq!(h.projection.datum_params, [0.25, 0.5, 0.75, 1.0, 1.25]);
        assert!(!h.projection.affine_flag);
        assert!(h.has_extension_page());
        assert_eq!(h.page_count(), 1);
    }

    #[test]
    fn test_bad_magic_cookie() {
        let mut page = header_page(500);
        put_i32(&mut page, 0x100, 42424243);
        let err = MapHeader::from_page(page).unwrap_err();
        assert!(matches!(err, MapError::InvalidFormat(_)));
    }

    #[test]
    fn test_v100_derives_scale() {
        let h = MapHeader::from_page(header_page(100)).unwrap();
        assert_eq!(h.x_scale, 10_000.0);
        assert_eq!(h.y_scale, 10_000.0);
        assert_eq!(h.x_displ, 0.0);
        assert_eq!(h.y_displ, 0.0);
        assert_eq!(h.projection.datum_id, 0);
        assert_eq!(h.projection.datum_params, [0.0; 5]);
        assert!(!h.has_extension_page());
    }

    #[test]
    fn test_v300_zeroes_datum_id_only() {
        let h = MapHeader::from_page(header_page(300)).unwrap();
        assert_eq!(h.projection.datum_id, 0);
        assert_eq!(h.projection.datum_params, [0.25, 0.5, 0.75, 1.0, 1.25]);
        assert_eq!(h.x_scale, 2.0);
    }

    #[test]
    fn test_truncated_page() {
        let page = header_page(500)[..0x120].to_vec();
        let err = MapHeader::from_page(page).unwrap_err();
        assert!(matches!(err, MapError::BufferUnderrun { .. }));
    }

    #[test]
    fn test_affine_extension() {
        let mut h = MapHeader::from_page(header_page(500)).unwrap();
        let mut ext = vec![0u8; BLOCK_SIZE];
        ext[0] = 1;
        ext[1] = 7;
        ext[2..8].copy_from_slice(&[0xAA; 6]);
        for i in 0..6 {
            put_f64(&mut ext, 8 + i * 8, (i as f64) * 10.0);
        }
        h.append_affine_page(ext).unwrap();

        assert!(h.projection.affine_flag);
        assert_eq!(h.projection.affine_units, 7);
        assert_eq!(
            h.projection.affine_params,
            [0.0, 10.0, 20.0, 30.0, 40.0, 50.0]
        );
        assert_eq!(h.page_count(), 2);
    }

    #[test]
    fn test_affine_extension_not_in_use() {
        let mut h = MapHeader::from_page(header_page(500)).unwrap();
        let mut ext = vec![0u8; BLOCK_SIZE];
        ext[1] = 7;
        h.append_affine_page(ext).unwrap();
        assert!(!h.projection.affine_flag);
        assert_eq!(h.projection.affine_units, 0);
    }

    #[test]
    fn test_int_to_coordsys() {
        let h = MapHeader {
            x_scale: 1000.0,
            y_scale: 100.0,
            x_displ: 500.0,
            y_displ: -50.0,
            ..MapHeader::default()
        };
        let p = h.int_to_coordsys(Vertex::new(1500, 950));
        assert_eq!(p, Vector2::new(1.0, 10.0));

        let mirrored = MapHeader {
            coord_origin_quadrant: 3,
            ..h.clone()
        };
        let q = mirrored.int_to_coordsys(Vertex::new(1500, 950));
        assert_eq!(q, Vector2::new(-2.0, -9.0));
    }

    #[test]
    fn test_coordsys_bounds_are_ordered() {
        let h = MapHeader {
            bounds: Rect::new(0, 0, 2000, 3000),
            coord_origin_quadrant: 2,
            ..MapHeader::default()
        };
        let (min, max) = h.coordsys_bounds();
        assert_eq!(min, Vector2::new(-2.0, 0.0));
        assert_eq!(max, Vector2::new(0.0, 3.0));
    }
}
