use byteorder::{ByteOrder, LittleEndian};

use crate::error::{AdvError, Result};

/// Bounds-checked little-endian reader over a file's bytes.
///
/// Reads either consume exactly the requested number of bytes or fail with
/// [`AdvError::TruncatedData`] without moving. The only way to move backward
/// is an explicit [`BinaryCursor::seek`].
#[derive(Clone, Debug)]
pub struct BinaryCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> u64 {
        self.pos as u64
    }

    pub fn len(&self) -> u64 {
        self.buf.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> u64 {
        (self.buf.len() - self.pos) as u64
    }

    /// Move to an absolute offset. Offsets equal to the length are allowed
    /// (end of data); anything beyond fails.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.len() {
            return Err(AdvError::TruncatedData {
                offset,
                requested: 0,
                available: 0,
            });
        }
        self.pos = offset as usize;
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.buf.len() - self.pos;
        if n > available {
            return Err(AdvError::TruncatedData {
                offset: self.pos as u64,
                requested: n as u64,
                available: available as u64,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    /// Borrow the next `n` bytes without copying.
    pub fn read_fixed_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Read a `u16` byte length followed by that many bytes of UTF-8 text.
    /// Invalid sequences are replaced rather than rejected.
    pub fn read_length_prefixed_string(&mut self) -> Result<String> {
        let start = self.pos;
        let len = self.read_u16()? as usize;
        match self.take(len) {
            Ok(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Err(e) => {
                self.pos = start;
                Err(e)
            }
        }
    }
}
