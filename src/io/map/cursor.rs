//! Sequential little-endian reader over one in-memory page.
//!
//! Every fixed-width read checks the remaining bytes first and fails with
//! [`MapError::BufferUnderrun`] instead of a bare EOF, so decoders can report
//! exactly where a block ran short.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{MapError, Result};

/// Byte cursor with an optional read limit.
#[derive(Debug, Clone)]
pub struct ByteCursor {
    stream: Cursor<Vec<u8>>,
    /// Reads may not cross this position. Never above the buffer length.
    limit: usize,
}

impl ByteCursor {
    /// Create a cursor positioned at the start of `data`.
    pub fn new(data: Vec<u8>) -> Self {
        let limit = data.len();
        Self {
            stream: Cursor::new(data),
            limit,
        }
    }

    /// Current read position.
    pub fn position(&self) -> usize {
        self.stream.position() as usize
    }

    /// Length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.stream.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes left before the read limit.
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.position())
    }

    /// Current read limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Restrict reads to `[.., end)`. Clamped to the buffer length.
    pub fn set_limit(&mut self, end: usize) {
        self.limit = end.min(self.len());
    }

    /// Lift any limit set with [`set_limit`](Self::set_limit).
    pub fn clear_limit(&mut self) {
        self.limit = self.len();
    }

    /// Raw page bytes.
    pub fn get_ref(&self) -> &[u8] {
        self.stream.get_ref()
    }

    /// Reposition without reading.
    pub fn seek(&mut self, offset: usize) -> Result<()> {
        if offset > self.len() {
            return Err(MapError::BufferUnderrun {
                position: offset,
                requested: 0,
                available: 0,
            });
        }
        self.stream.set_position(offset as u64);
        Ok(())
    }

    /// Advance over `count` bytes without decoding them.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.stream.set_position((self.position() + count) as u64);
        Ok(())
    }

    fn ensure(&self, width: usize) -> Result<()> {
        let available = self.remaining();
        if available < width {
            return Err(MapError::BufferUnderrun {
                position: self.position(),
                requested: width,
                available,
            });
        }
        Ok(())
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.stream.get_ref()[self.position()])
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.stream.read_u8()?)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.stream.read_i8()?)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.stream.read_i16::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.stream.read_i32::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.stream.read_i64::<LittleEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.stream.read_f64::<LittleEndian>()?)
    }

    /// Read `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        self.ensure(count)?;
        let start = self.position();
        let bytes = self.stream.get_ref()[start..start + count].to_vec();
        self.stream.set_position((start + count) as u64);
        Ok(bytes)
    }

    /// Read `N` consecutive doubles.
    pub fn read_f64_array<const N: usize>(&mut self) -> Result<[f64; N]> {
        let mut values = [0.0; N];
        for value in values.iter_mut() {
            *value = self.read_f64()?;
        }
        Ok(values)
    }
}
