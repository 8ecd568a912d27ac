//! Geometry record encodings found in object blocks.
//!
//! Every record starts with a shape tag byte and an int32 object id. The tag
//! selects a fixed layout. Tags come in pairs: the compact variant (tag % 3
//! == 1) stores coordinates as int16 offsets from an origin, the long variant
//! as absolute int32 values. Point, line, polyline, arc, rectangle, ellipse,
//! text, and symbol records resolve compact offsets against the object
//! block's center; region, multi-polyline, multipoint, and collection records
//! carry their own compressed origin.

use crate::error::{MapError, Result};
use crate::types::{Rect, Vertex};

use super::constants::{object_layout, object_record_size};
use super::cursor::ByteCursor;
use super::record::MapFileRecord;

/// Shape tag of a geometry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeometryType {
    None = 0x00,
    SymbolC = 0x01,
    Symbol = 0x02,
    LineC = 0x04,
    Line = 0x05,
    PlineC = 0x07,
    Pline = 0x08,
    ArcC = 0x0a,
    Arc = 0x0b,
    RegionC = 0x0d,
    Region = 0x0e,
    TextC = 0x10,
    Text = 0x11,
    RectC = 0x13,
    Rect = 0x14,
    RoundRectC = 0x16,
    RoundRect = 0x17,
    EllipseC = 0x19,
    Ellipse = 0x1a,
    MultiPlineC = 0x25,
    MultiPline = 0x26,
    FontSymbolC = 0x28,
    FontSymbol = 0x29,
    CustomSymbolC = 0x2b,
    CustomSymbol = 0x2c,
    V450RegionC = 0x2e,
    V450Region = 0x2f,
    V450MultiPlineC = 0x31,
    V450MultiPline = 0x32,
    MultiPointC = 0x34,
    MultiPoint = 0x35,
    CollectionC = 0x37,
    Collection = 0x38,
    Unknown1C = 0x3a,
    Unknown1 = 0x3b,
    V800RegionC = 0x3d,
    V800Region = 0x3e,
    V800MultiPlineC = 0x40,
    V800MultiPline = 0x41,
    V800MultiPointC = 0x43,
    V800MultiPoint = 0x44,
    V800CollectionC = 0x46,
    V800Collection = 0x47,
}

/// Broad geometry class, matching the header's per-class object counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryClass {
    Point,
    Line,
    Region,
    Text,
    Other,
}

impl GeometryType {
    /// Resolve a raw shape tag.
    pub fn from_tag(tag: u8) -> Result<Self> {
        use GeometryType::*;
        Ok(match tag {
            0x00 => None,
            0x01 => SymbolC,
            0x02 => Symbol,
            0x04 => LineC,
            0x05 => Line,
            0x07 => PlineC,
            0x08 => Pline,
            0x0a => ArcC,
            0x0b => Arc,
            0x0d => RegionC,
            0x0e => Region,
            0x10 => TextC,
            0x11 => Text,
            0x13 => RectC,
            0x14 => Rect,
            0x16 => RoundRectC,
            0x17 => RoundRect,
            0x19 => EllipseC,
            0x1a => Ellipse,
            0x25 => MultiPlineC,
            0x26 => MultiPline,
            0x28 => FontSymbolC,
            0x29 => FontSymbol,
            0x2b => CustomSymbolC,
            0x2c => CustomSymbol,
            0x2e => V450RegionC,
            0x2f => V450Region,
            0x31 => V450MultiPlineC,
            0x32 => V450MultiPline,
            0x34 => MultiPointC,
            0x35 => MultiPoint,
            0x37 => CollectionC,
            0x38 => Collection,
            0x3a => Unknown1C,
            0x3b => Unknown1,
            0x3d => V800RegionC,
            0x3e => V800Region,
            0x40 => V800MultiPlineC,
            0x41 => V800MultiPline,
            0x43 => V800MultiPointC,
            0x44 => V800MultiPoint,
            0x46 => V800CollectionC,
            0x47 => V800Collection,
            other => return Err(MapError::UnknownGeometryType(other)),
        })
    }

    /// Raw shape tag.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Compact variants store 16-bit offsets instead of absolute coordinates.
    pub fn is_compressed(self) -> bool {
        self != GeometryType::None && self.tag() % 3 == 1
    }

    /// First .MAP version that can contain this record type.
    pub fn min_version(self) -> i16 {
        match self.tag() {
            0x00..=0x2c => 300,
            0x2d..=0x32 => 450,
            0x33..=0x3b => 650,
            _ => 800,
        }
    }

    /// Class counted in the header for records of this type.
    pub fn class(self) -> GeometryClass {
        use GeometryType::*;
        match self {
            SymbolC | Symbol | FontSymbolC | FontSymbol | CustomSymbolC | CustomSymbol
            | MultiPointC | MultiPoint | V800MultiPointC | V800MultiPoint => GeometryClass::Point,
            LineC | Line | PlineC | Pline | ArcC | Arc | MultiPlineC | MultiPline
            | V450MultiPlineC | V450MultiPline | V800MultiPlineC | V800MultiPline => {
                GeometryClass::Line
            }
            RegionC | Region | V450RegionC | V450Region | V800RegionC | V800Region | RectC
            | Rect | RoundRectC | RoundRect | EllipseC | Ellipse => GeometryClass::Region,
            TextC | Text => GeometryClass::Text,
            None | CollectionC | Collection | Unknown1C | Unknown1 | V800CollectionC
            | V800Collection => GeometryClass::Other,
        }
    }

    fn is_v800(self) -> bool {
        self.min_version() >= 800
    }

    /// Decode the body that follows the type byte and id into `record`.
    pub(crate) fn decode(
        self,
        cur: &mut ByteCursor,
        center: Vertex,
        record: &mut MapFileRecord,
    ) -> Result<()> {
        use GeometryType::*;
        let mut r = CoordReader {
            cur,
            compressed: self.is_compressed(),
            origin: center,
        };
        match self {
            None => Ok(()),
            SymbolC | Symbol => decode_symbol(&mut r, record),
            LineC | Line => decode_line(&mut r, record),
            PlineC | Pline => decode_polyline(&mut r, record),
            ArcC | Arc => decode_arc(&mut r, record),
            RegionC | Region | V450RegionC | V450Region | V800RegionC | V800Region => {
                decode_sections(&mut r, record, self.is_v800(), true)
            }
            MultiPlineC | MultiPline | V450MultiPlineC | V450MultiPline | V800MultiPlineC
            | V800MultiPline => decode_sections(&mut r, record, self.is_v800(), false),
            TextC | Text => decode_text(&mut r, record),
            RectC | Rect | EllipseC | Ellipse => decode_rect(&mut r, record, false),
            RoundRectC | RoundRect => decode_rect(&mut r, record, true),
            FontSymbolC | FontSymbol => decode_font_symbol(&mut r, record),
            CustomSymbolC | CustomSymbol => decode_custom_symbol(&mut r, record),
            MultiPointC | MultiPoint | V800MultiPointC | V800MultiPoint => {
                decode_multipoint(&mut r, record, self.is_v800())
            }
            CollectionC | Collection | V800CollectionC | V800Collection => {
                decode_collection(&mut r, record, self.is_v800())
            }
            Unknown1C | Unknown1 => decode_opaque(&mut r, record, self.tag()),
        }
    }
}

/// Per-type fields that do not fit the shared record shape.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryDetails {
    None,
    /// Polylines, regions, and multi-polylines.
    Sections {
        smooth: bool,
        section_count: i32,
        compressed_origin: Option<Vertex>,
    },
    Arc {
        /// Tenths of a degree.
        start_angle: i16,
        end_angle: i16,
        /// Rectangle of the ellipse the arc is cut from.
        arc_ellipse: Rect,
    },
    RoundedCorners {
        width: i32,
        height: i32,
    },
    Text {
        alignment: i16,
        /// Tenths of a degree.
        angle: i16,
        font_style: i16,
        foreground: [u8; 3],
        background: [u8; 3],
        line_end: Vertex,
        height: i32,
        font_id: u8,
    },
    FontSymbol {
        point_size: u8,
        font_style: i16,
        color: [u8; 3],
        angle: i16,
        font_id: u8,
    },
    CustomSymbol {
        custom_style: u8,
        font_id: u8,
    },
    MultiPoint {
        point_count: i32,
        compressed_origin: Option<Vertex>,
    },
    Collection(CollectionInfo),
    /// Body of a record whose layout is known only by length.
    Opaque(Vec<u8>),
}

/// Sub-geometry bookkeeping of a collection record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionInfo {
    pub multi_point_count: i32,
    pub region_data_size: i32,
    pub polyline_data_size: i32,
    pub region_sections: i32,
    pub polyline_sections: i32,
    pub multi_point_symbol: u8,
    pub region_pen: u8,
    pub polyline_pen: u8,
    pub region_brush: u8,
    pub compressed_origin: Option<Vertex>,
}

/// Coordinate reads for one record.
struct CoordReader<'a> {
    cur: &'a mut ByteCursor,
    compressed: bool,
    /// Origin of compact offsets.
    origin: Vertex,
}

impl CoordReader<'_> {
    fn coord(&mut self) -> Result<Vertex> {
        if self.compressed {
            let dx = self.cur.read_i16()?;
            let dy = self.cur.read_i16()?;
            Ok(self.origin.offset_by(dx, dy))
        } else {
            Ok(Vertex::new(self.cur.read_i32()?, self.cur.read_i32()?))
        }
    }

    fn rect(&mut self) -> Result<Rect> {
        let min = self.coord()?;
        let max = self.coord()?;
        Ok(Rect::new(min.x, min.y, max.x, max.y))
    }

    /// A length stored as int16 in compact records, int32 otherwise.
    fn length(&mut self) -> Result<i32> {
        if self.compressed {
            Ok(self.cur.read_i16()? as i32)
        } else {
            self.cur.read_i32()
        }
    }

    fn rgb(&mut self) -> Result<[u8; 3]> {
        Ok([self.cur.read_u8()?, self.cur.read_u8()?, self.cur.read_u8()?])
    }

    /// Label point followed by the record's own compressed origin (compact
    /// only); the origin then replaces the block center for the MBR.
    fn label_with_origin(&mut self) -> Result<(Vertex, Option<Vertex>)> {
        if !self.compressed {
            return Ok((self.coord()?, None));
        }
        let dx = self.cur.read_i16()?;
        let dy = self.cur.read_i16()?;
        let origin = Vertex::new(self.cur.read_i32()?, self.cur.read_i32()?);
        self.origin = origin;
        Ok((origin.offset_by(dx, dy), Some(origin)))
    }

    /// Coordinate-block size word; bit 31 flags a smoothed line.
    fn coord_size_with_smooth(&mut self) -> Result<(i32, bool)> {
        let raw = self.cur.read_i32()? as u32;
        Ok(((raw & 0x7FFF_FFFF) as i32, raw & 0x8000_0000 != 0))
    }

    fn point_size(&self) -> i32 {
        if self.compressed {
            4
        } else {
            8
        }
    }
}

fn decode_symbol(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    let point = r.coord()?;
    record.push_point(point);
    record.symbol = r.cur.read_u8()?;
    Ok(())
}

fn decode_line(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    let start = r.coord()?;
    let end = r.coord()?;
    record.push_point(start);
    record.push_point(end);
    record.symbol = r.cur.read_u8()?;
    Ok(())
}

/// Polyline: vertices live in the coordinate block. Compact polylines have
/// no origin of their own; label and MBR are offsets from the block center.
fn decode_polyline(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    record.coord_block_ptr = r.cur.read_i32()?;
    let (size, smooth) = r.coord_size_with_smooth()?;
    record.coord_data_size = size;
    record.label_location = Some(r.coord()?);
    record.mbr = r.rect()?;
    record.symbol = r.cur.read_u8()?;
    record.details = GeometryDetails::Sections {
        smooth,
        section_count: 1,
        compressed_origin: None,
    };
    Ok(())
}

/// Regions and multi-polylines.
fn decode_sections(
    r: &mut CoordReader<'_>,
    record: &mut MapFileRecord,
    v800: bool,
    has_brush: bool,
) -> Result<()> {
    record.coord_block_ptr = r.cur.read_i32()?;
    let (size, smooth) = r.coord_size_with_smooth()?;
    record.coord_data_size = size;

    let section_count = if v800 {
        let count = r.cur.read_i32()?;
        r.cur.skip(33)?;
        count
    } else {
        r.cur.read_i16()? as i32
    };

    let (label, compressed_origin) = r.label_with_origin()?;
    record.label_location = Some(label);
    record.mbr = r.rect()?;
    record.symbol = r.cur.read_u8()?;
    if has_brush {
        record.brush = Some(r.cur.read_u8()?);
    }
    record.details = GeometryDetails::Sections {
        smooth,
        section_count,
        compressed_origin,
    };
    Ok(())
}

fn decode_arc(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    let start_angle = r.cur.read_i16()?;
    let end_angle = r.cur.read_i16()?;
    let arc_ellipse = r.rect()?;
    record.mbr = r.rect()?;
    record.symbol = r.cur.read_u8()?;
    record.details = GeometryDetails::Arc {
        start_angle,
        end_angle,
        arc_ellipse,
    };
    Ok(())
}

/// Rectangles, ellipses, and rounded rectangles.
fn decode_rect(r: &mut CoordReader<'_>, record: &mut MapFileRecord, rounded: bool) -> Result<()> {
    if rounded {
        let width = r.length()?;
        let height = r.length()?;
        record.details = GeometryDetails::RoundedCorners { width, height };
    }
    record.mbr = r.rect()?;
    record.symbol = r.cur.read_u8()?;
    record.brush = Some(r.cur.read_u8()?);
    Ok(())
}

/// Text: the string itself lives in the coordinate block.
fn decode_text(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    record.coord_block_ptr = r.cur.read_i32()?;
    record.coord_data_size = r.cur.read_i16()? as i32;
    let alignment = r.cur.read_i16()?;
    let angle = r.cur.read_i16()?;
    let font_style = r.cur.read_i16()?;
    let foreground = r.rgb()?;
    let background = r.rgb()?;
    let line_end = r.coord()?;
    let height = r.length()?;
    let font_id = r.cur.read_u8()?;
    record.mbr = r.rect()?;
    record.symbol = r.cur.read_u8()?;
    record.details = GeometryDetails::Text {
        alignment,
        angle,
        font_style,
        foreground,
        background,
        line_end,
        height,
        font_id,
    };
    Ok(())
}

fn decode_font_symbol(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    record.symbol = r.cur.read_u8()?;
    let point_size = r.cur.read_u8()?;
    let font_style = r.cur.read_i16()?;
    let color = r.rgb()?;
    r.cur.skip(3)?;
    let angle = r.cur.read_i16()?;
    let point = r.coord()?;
    record.push_point(point);
    let font_id = r.cur.read_u8()?;
    record.details = GeometryDetails::FontSymbol {
        point_size,
        font_style,
        color,
        angle,
        font_id,
    };
    Ok(())
}

fn decode_custom_symbol(r: &mut CoordReader<'_>, record: &mut MapFileRecord) -> Result<()> {
    r.cur.skip(1)?;
    let custom_style = r.cur.read_u8()?;
    let point = r.coord()?;
    record.push_point(point);
    record.symbol = r.cur.read_u8()?;
    let font_id = r.cur.read_u8()?;
    record.details = GeometryDetails::CustomSymbol {
        custom_style,
        font_id,
    };
    Ok(())
}

fn decode_multipoint(r: &mut CoordReader<'_>, record: &mut MapFileRecord, v800: bool) -> Result<()> {
    record.coord_block_ptr = r.cur.read_i32()?;
    let point_count = r.cur.read_i32()?;
    record.coord_data_size = point_count.saturating_mul(r.point_size());
    r.cur.skip(if v800 { 15 + 33 } else { 15 })?;
    record.symbol = r.cur.read_u8()?;
    r.cur.skip(1)?;

    let (label, compressed_origin) = r.label_with_origin()?;
    record.label_location = Some(label);
    record.mbr = r.rect()?;
    record.details = GeometryDetails::MultiPoint {
        point_count,
        compressed_origin,
    };
    Ok(())
}

fn decode_collection(r: &mut CoordReader<'_>, record: &mut MapFileRecord, v800: bool) -> Result<()> {
    let mut info = CollectionInfo::default();
    record.coord_block_ptr = r.cur.read_i32()?;
    info.multi_point_count = r.cur.read_i32()?;
    info.region_data_size = r.cur.read_i32()?;
    info.polyline_data_size = r.cur.read_i32()?;
    if v800 {
        info.region_sections = r.cur.read_i32()?;
        info.polyline_sections = r.cur.read_i32()?;
        r.cur.skip(16)?;
    } else {
        info.region_sections = r.cur.read_i16()? as i32;
        info.polyline_sections = r.cur.read_i16()? as i32;
        r.cur.skip(15)?;
    }

    info.multi_point_symbol = r.cur.read_u8()?;
    r.cur.skip(1)?;
    info.region_pen = r.cur.read_u8()?;
    info.polyline_pen = r.cur.read_u8()?;
    info.region_brush = r.cur.read_u8()?;

    if r.compressed {
        let origin = Vertex::new(r.cur.read_i32()?, r.cur.read_i32()?);
        r.origin = origin;
        info.compressed_origin = Some(origin);
    }
    record.mbr = r.rect()?;

    record.coord_data_size = info
        .region_data_size
        .saturating_add(info.polyline_data_size)
        .saturating_add(info.multi_point_count.saturating_mul(r.point_size()));
    record.symbol = info.multi_point_symbol;
    record.brush = Some(info.region_brush);
    record.details = GeometryDetails::Collection(info);
    Ok(())
}

/// Keep the body of a record known only through the length table.
fn decode_opaque(r: &mut CoordReader<'_>, record: &mut MapFileRecord, tag: u8) -> Result<()> {
    let size = object_record_size(tag)
        .unwrap_or(object_layout::RECORD_HEADER_SIZE)
        .saturating_sub(object_layout::RECORD_HEADER_SIZE);
    record.details = GeometryDetails::Opaque(r.cur.read_bytes(size)?);
    Ok(())
}
