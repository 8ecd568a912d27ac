//! Decoded geometry record.

use indexmap::IndexMap;

use crate::types::{Rect, Vertex};

use super::constants::object_uses_coord_block;
use super::geometry::{GeometryClass, GeometryDetails, GeometryType};

/// Attribute row attached to a record by the table reader, column name to
/// value in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeRow {
    values: IndexMap<String, String>,
}

impl AttributeRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, keeping the first-insertion column order.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Columns and values in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = AttributeRow::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

/// One geometry record of an object block.
///
/// Records hold up to two vertices decoded straight from the object block;
/// geometries whose vertices live in the coordinate block expose the
/// pointer and byte size instead.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFileRecord {
    pub shape_type: GeometryType,
    /// Object id (row number in the attribute table).
    pub id: i32,
    pub mbr: Rect,
    /// Symbol or pen index, depending on the geometry.
    pub symbol: u8,
    /// Brush index of filled geometries.
    pub brush: Option<u8>,
    pub coord_block_ptr: i32,
    pub coord_data_size: i32,
    pub label_location: Option<Vertex>,
    pub details: GeometryDetails,
    points: Vec<Vertex>,
    parts: Vec<usize>,
    content_length: usize,
    data_row: Option<AttributeRow>,
}

impl MapFileRecord {
    /// Empty record of the given type; the MBR stays empty until a decoder
    /// sets it.
    pub fn new(shape_type: GeometryType, id: i32) -> Self {
        Self {
            shape_type,
            id,
            mbr: Rect::empty(),
            symbol: 0,
            brush: None,
            coord_block_ptr: 0,
            coord_data_size: 0,
            label_location: None,
            details: GeometryDetails::None,
            points: Vec::new(),
            parts: Vec::new(),
            content_length: 0,
            data_row: None,
        }
    }

    /// Append a vertex; the MBR follows the vertices.
    pub(crate) fn push_point(&mut self, point: Vertex) {
        if self.points.is_empty() {
            self.mbr = Rect::from_vertex(point);
        } else {
            self.mbr.expand_to_include(point);
        }
        self.points.push(point);
    }

    pub(crate) fn set_content_length(&mut self, length: usize) {
        self.content_length = length;
    }

    /// Raw shape tag.
    pub fn tag(&self) -> u8 {
        self.shape_type.tag()
    }

    pub fn is_compressed(&self) -> bool {
        self.shape_type.is_compressed()
    }

    pub fn geometry_class(&self) -> GeometryClass {
        self.shape_type.class()
    }

    /// Bytes the record occupied in its object block (type byte and id
    /// included).
    pub fn content_length(&self) -> usize {
        self.content_length
    }

    pub fn number_of_parts(&self) -> usize {
        self.parts.len()
    }

    pub fn number_of_points(&self) -> usize {
        self.points.len()
    }

    /// Start index of each part in [`points`](Self::points).
    pub fn parts(&self) -> &[usize] {
        &self.parts
    }

    pub fn points(&self) -> &[Vertex] {
        &self.points
    }

    /// Whether the length table places this type's vertices in the
    /// coordinate block.
    pub fn uses_coord_block(&self) -> bool {
        object_uses_coord_block(self.tag())
    }

    pub fn data_row(&self) -> Option<&AttributeRow> {
        self.data_row.as_ref()
    }

    pub fn set_data_row(&mut self, row: AttributeRow) {
        self.data_row = Some(row);
    }

    pub fn take_data_row(&mut self) -> Option<AttributeRow> {
        self.data_row.take()
    }
}
